// ABOUTME: Selector-based document querying and the join policy for multi-valued fields.
// ABOUTME: Defines the ParsedDocument trait, its scraper-backed HtmlDocument, and extract_field.

//! Selector-based field extraction.
//!
//! Key behaviors:
//! - A [`SelectorSpec::Text`] yields the direct text children of each match,
//!   one value per text node, whitespace-normalized.
//! - A [`SelectorSpec::Attr`] yields the trimmed attribute of each match.
//! - Blank values are dropped. Values keep document order.
//! - [`extract_field`] runs every selector of a field and joins all values
//!   with the caller's [`JoinPolicy`].

use scraper::Html;
use serde::{Deserialize, Serialize};

use crate::extractors::compiled::get_or_compile;
use crate::extractors::site::{FieldExtractor, SelectorSpec};

/// Normalizes whitespace in a string by collapsing runs of whitespace into single spaces.
fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A parsed page that can answer selector queries.
pub trait ParsedDocument {
    /// Returns every non-blank value the selector finds, in document order.
    fn query(&self, spec: &SelectorSpec) -> Vec<String>;

    /// Returns the first value the selector finds.
    fn query_first(&self, spec: &SelectorSpec) -> Option<String> {
        self.query(spec).into_iter().next()
    }

    /// Returns true if the selector finds at least one value.
    fn exists(&self, spec: &SelectorSpec) -> bool {
        !self.query(spec).is_empty()
    }

    /// Returns true if the selector reaches any text node or attribute,
    /// blank ones included.
    fn matches(&self, spec: &SelectorSpec) -> bool {
        self.exists(spec)
    }
}

/// [`ParsedDocument`] over a `scraper` HTML tree.
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    /// Parses a full HTML document.
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    fn text_values(&self, css: &str) -> Vec<String> {
        let Some(selector) = get_or_compile(css) else {
            return vec![];
        };

        self.html
            .select(&selector)
            .flat_map(|el| el.children().filter_map(|node| node.value().as_text()))
            .map(|text| normalize_whitespace(text))
            .filter(|value| !value.is_empty())
            .collect()
    }

    fn attr_values(&self, css: &str, attr: &str) -> Vec<String> {
        let Some(selector) = get_or_compile(css) else {
            return vec![];
        };

        self.html
            .select(&selector)
            .filter_map(|el| el.value().attr(attr))
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .collect()
    }
}

impl ParsedDocument for HtmlDocument {
    fn query(&self, spec: &SelectorSpec) -> Vec<String> {
        match spec {
            SelectorSpec::Text(css) => self.text_values(css),
            SelectorSpec::Attr(css, attr) => self.attr_values(css, attr),
        }
    }

    fn matches(&self, spec: &SelectorSpec) -> bool {
        let Some(selector) = get_or_compile(spec.css()) else {
            return false;
        };

        let mut found = self.html.select(&selector);
        match spec {
            SelectorSpec::Text(_) => {
                found.any(|el| el.children().any(|node| node.value().is_text()))
            }
            SelectorSpec::Attr(_, attr) => found.any(|el| el.value().attr(attr).is_some()),
        }
    }
}

/// How the values of a multi-valued field are combined into one string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinPolicy {
    pub separator: String,
}

impl JoinPolicy {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }

    /// Joins values with the separator. No values gives an empty string.
    pub fn join<I, S>(&self, values: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = String::new();
        for (i, value) in values.into_iter().enumerate() {
            if i > 0 {
                out.push_str(&self.separator);
            }
            out.push_str(value.as_ref());
        }
        out
    }
}

impl Default for JoinPolicy {
    /// A single space.
    fn default() -> Self {
        Self::new(" ")
    }
}

/// Runs every selector of `fe` in order and joins all values found.
///
/// Returns an empty string when nothing matches.
pub fn extract_field<D>(doc: &D, fe: &FieldExtractor, join: &JoinPolicy) -> String
where
    D: ParsedDocument + ?Sized,
{
    let values: Vec<String> = fe
        .selectors
        .iter()
        .flat_map(|spec| doc.query(spec))
        .collect();
    join.join(values)
}
