// ABOUTME: Site-specific selector definitions for link.springer.com pages.
// ABOUTME: Defines SelectorSpec, FieldExtractor and the per-variant selector sets as serde data.

//! Selector sets for the targeted publisher.
//!
//! Every field of every record variant is described by a [`FieldExtractor`]: an
//! ordered list of [`SelectorSpec`]s. The built-in set lives in
//! `data/springer_selectors.json` (see [`crate::extractors::loader`]); an
//! override file with the same shape can replace it at runtime.

use serde::{Deserialize, Serialize};

/// Specifies how to pull string values out of the DOM.
///
/// In JSON a plain string is a [`SelectorSpec::Text`] and a two-element array
/// `["css", "attr"]` is a [`SelectorSpec::Attr`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectorSpec {
    /// Direct text-node children of every element matching the CSS selector.
    Text(String),
    /// The named attribute of every element matching the CSS selector.
    Attr(String, String),
}

impl SelectorSpec {
    /// Shorthand for a text selector.
    pub fn text(css: impl Into<String>) -> Self {
        SelectorSpec::Text(css.into())
    }

    /// Shorthand for an attribute selector.
    pub fn attr(css: impl Into<String>, attr: impl Into<String>) -> Self {
        SelectorSpec::Attr(css.into(), attr.into())
    }

    /// The CSS part of the selector.
    pub fn css(&self) -> &str {
        match self {
            SelectorSpec::Text(css) | SelectorSpec::Attr(css, _) => css,
        }
    }
}

/// Ordered selectors for one record field.
///
/// Every selector is run and all of their values are joined, so listing two
/// selectors that hit the same node yields that value twice.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldExtractor {
    pub selectors: Vec<SelectorSpec>,
}

impl FieldExtractor {
    pub fn new(selectors: Vec<SelectorSpec>) -> Self {
        Self { selectors }
    }
}

impl From<SelectorSpec> for FieldExtractor {
    fn from(spec: SelectorSpec) -> Self {
        Self {
            selectors: vec![spec],
        }
    }
}

/// Selectors for book landing pages. `url` is not queried; it is the page URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSelectors {
    pub title: FieldExtractor,
    pub author: FieldExtractor,
    pub publisher: FieldExtractor,
    pub chapters: FieldExtractor,
    #[serde(rename = "abstract")]
    pub abstract_text: FieldExtractor,
    pub doi: FieldExtractor,
    #[serde(rename = "ISBN")]
    pub isbn: FieldExtractor,
}

/// Selectors for conference paper pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperSelectors {
    pub title: FieldExtractor,
    pub author: FieldExtractor,
    pub booktitle: FieldExtractor,
    pub publisher: FieldExtractor,
    pub year: FieldExtractor,
    #[serde(rename = "abstract")]
    pub abstract_text: FieldExtractor,
    pub doi: FieldExtractor,
    pub timestamp: FieldExtractor,
    pub url: FieldExtractor,
}

/// Selectors for journal article pages, also used for any unknown type tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSelectors {
    pub author: FieldExtractor,
    pub title: FieldExtractor,
    pub journal: FieldExtractor,
    pub publisher: FieldExtractor,
    #[serde(rename = "abstract")]
    pub abstract_text: FieldExtractor,
    pub year: FieldExtractor,
    pub timestamp: FieldExtractor,
    pub doi: FieldExtractor,
    pub url: FieldExtractor,
}

/// The complete selector set for one site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSelectors {
    /// Declared publication type, e.g. `og:type`. Only the first value is used.
    pub entry_type: SelectorSpec,
    /// Content-type label whose presence marks a book page.
    pub content_type_label: SelectorSpec,
    pub book: BookSelectors,
    pub paper: PaperSelectors,
    pub article: ArticleSelectors,
}

impl SiteSelectors {
    /// All CSS selector strings in the set, for cache warm-up.
    pub fn css_selectors(&self) -> Vec<&str> {
        let b = &self.book;
        let p = &self.paper;
        let a = &self.article;
        let fields = [
            &b.title,
            &b.author,
            &b.publisher,
            &b.chapters,
            &b.abstract_text,
            &b.doi,
            &b.isbn,
            &p.title,
            &p.author,
            &p.booktitle,
            &p.publisher,
            &p.year,
            &p.abstract_text,
            &p.doi,
            &p.timestamp,
            &p.url,
            &a.author,
            &a.title,
            &a.journal,
            &a.publisher,
            &a.abstract_text,
            &a.year,
            &a.timestamp,
            &a.doi,
            &a.url,
        ];

        let mut out = vec![self.entry_type.css(), self.content_type_label.css()];
        for fe in fields {
            out.extend(fe.selectors.iter().map(SelectorSpec::css));
        }
        out
    }
}
