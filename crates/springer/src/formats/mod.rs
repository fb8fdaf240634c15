// ABOUTME: Output serializers for extracted publication records.
// ABOUTME: Renders records as BibTeX entries or JSON.

//! Output format conversion module.
//!
//! BibTeX entries take their type from `ENTRYTYPE` verbatim and their key from
//! `ID`. Empty fields are left out of BibTeX output but kept in JSON.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::options::OutputFormat;
use crate::record::PublicationRecord;

/// Characters that may not appear in a BibTeX citation key.
static KEY_FORBIDDEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r##"[\s,{}()"#%'=~\\]"##).unwrap());

/// Makes a record ID usable as a BibTeX citation key.
pub fn citation_key(id: &str) -> String {
    KEY_FORBIDDEN_RE.replace_all(id, "").into_owned()
}

/// Drops unmatched braces so a value cannot close its `{...}` delimiter.
///
/// BibTeX counts braces even after a backslash, so escaping is not enough.
fn balance_braces(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut keep = vec![true; chars.len()];
    let mut open = Vec::new();

    for (i, c) in chars.iter().enumerate() {
        match c {
            '{' => open.push(i),
            '}' => {
                if open.pop().is_none() {
                    keep[i] = false;
                }
            }
            _ => {}
        }
    }
    for i in open {
        keep[i] = false;
    }

    chars
        .into_iter()
        .zip(keep)
        .filter_map(|(c, k)| k.then_some(c))
        .collect()
}

/// Renders one record as a BibTeX entry.
pub fn to_bibtex(record: &PublicationRecord) -> String {
    let mut out = format!("@{}{{{},\n", record.entry_type(), citation_key(record.id()));
    for (name, value) in record.fields() {
        if value.is_empty() {
            continue;
        }
        out.push_str(&format!("  {} = {{{}}},\n", name, balance_braces(value)));
    }
    out.push('}');
    out
}

/// Renders several records as a bibliography, entries separated by a blank line.
pub fn to_bibliography(records: &[PublicationRecord]) -> String {
    records
        .iter()
        .map(to_bibtex)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Renders records as pretty JSON: an object for one record, an array otherwise.
pub fn to_json(records: &[PublicationRecord]) -> serde_json::Result<String> {
    if records.len() == 1 {
        serde_json::to_string_pretty(&records[0])
    } else {
        serde_json::to_string_pretty(records)
    }
}

/// Renders records in the requested format.
pub fn render(records: &[PublicationRecord], format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Bibtex => Ok(to_bibliography(records)),
        OutputFormat::Json => to_json(records),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Article, Book};
    use pretty_assertions::assert_eq;

    fn book() -> PublicationRecord {
        Book {
            entry_type: "Book".to_string(),
            id: "Jane".to_string(),
            title: "Machine Learning".to_string(),
            author: "Jane Doe".to_string(),
            publisher: "Springer".to_string(),
            isbn: "978-3-030-00000-0".to_string(),
            url: "https://link.springer.com/book/10.1007/978-3-030-00000-0".to_string(),
            ..Default::default()
        }
        .into()
    }

    fn article() -> PublicationRecord {
        Article {
            entry_type: "Article".to_string(),
            id: "John2019 2019".to_string(),
            author: "John Smith".to_string(),
            title: "Sets {and} Maps".to_string(),
            year: "2019 2019".to_string(),
            ..Default::default()
        }
        .into()
    }

    #[test]
    fn test_to_bibtex_book() {
        let expected = "@Book{Jane,\n\
                        \x20 title = {Machine Learning},\n\
                        \x20 author = {Jane Doe},\n\
                        \x20 publisher = {Springer},\n\
                        \x20 ISBN = {978-3-030-00000-0},\n\
                        \x20 url = {https://link.springer.com/book/10.1007/978-3-030-00000-0},\n\
                        }";
        assert_eq!(to_bibtex(&book()), expected);
    }

    #[test]
    fn test_to_bibtex_keeps_balanced_braces_and_sanitizes_key() {
        let bib = to_bibtex(&article());
        assert!(bib.starts_with("@Article{John20192019,\n"));
        assert!(bib.contains("  title = {Sets {and} Maps},\n"));
        assert!(!bib.contains("journal"));
    }

    #[test]
    fn test_balance_braces_drops_unmatched() {
        assert_eq!(balance_braces("a} b"), "a b");
        assert_eq!(balance_braces("{a {b} c"), "a {b} c");
        assert_eq!(balance_braces("x}{y"), "xy");
        assert_eq!(balance_braces("\\}"), "\\");
        assert_eq!(balance_braces("{{ok}}"), "{{ok}}");
    }

    #[test]
    fn test_to_bibtex_unbalanced_value_stays_inside_field() {
        let record: PublicationRecord = Book {
            entry_type: "Book".to_string(),
            id: "Jane".to_string(),
            title: "Closing } early".to_string(),
            ..Default::default()
        }
        .into();
        assert_eq!(to_bibtex(&record), "@Book{Jane,\n  title = {Closing  early},\n}");
    }

    #[test]
    fn test_citation_key() {
        assert_eq!(citation_key("Smith2020"), "Smith2020");
        assert_eq!(citation_key("O'Neil, J.2020"), "ONeilJ.2020");
        assert_eq!(citation_key("a b\tc"), "abc");
    }

    #[test]
    fn test_to_bibliography_separates_entries() {
        let bib = to_bibliography(&[book(), article()]);
        assert_eq!(bib.matches("\n}\n\n@").count(), 1);
        assert!(bib.ends_with('}'));
    }

    #[test]
    fn test_to_json_single_is_object() {
        let json = to_json(&[book()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.is_object());
        assert_eq!(value["ID"], "Jane");
        assert_eq!(value["chapters"], "");
    }

    #[test]
    fn test_to_json_many_is_array() {
        let json = to_json(&[book(), article()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().map(|a| a.len()), Some(2));
    }

    #[test]
    fn test_render_dispatches_on_format() {
        let records = [book()];
        assert!(render(&records, OutputFormat::Bibtex).unwrap().starts_with("@Book{"));
        assert!(render(&records, OutputFormat::Json).unwrap().starts_with('{'));
    }
}
