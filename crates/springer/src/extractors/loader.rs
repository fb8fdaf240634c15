// ABOUTME: Loader for site selector sets from embedded JSON data or an override file.
// ABOUTME: Provides load_builtin_selectors() and SiteSelectors::from_json_str / from_json_file.

//! Selector set loader.
//!
//! The built-in link.springer.com selectors are embedded at compile time. An
//! override file with the same shape can be read at runtime.

use std::fs;
use std::path::Path;

use crate::error::ParseError;
use crate::extractors::compiled::precompile_selectors;
use crate::extractors::site::SiteSelectors;

/// Embedded JSON containing the link.springer.com selector set.
const BUILTIN_SELECTORS_JSON: &str = include_str!("../../data/springer_selectors.json");

/// Loads the built-in selector set and warms the selector cache with it.
///
/// # Panics
///
/// Panics if the embedded JSON is malformed or cannot be deserialized.
pub fn load_builtin_selectors() -> SiteSelectors {
    let selectors: SiteSelectors =
        serde_json::from_str(BUILTIN_SELECTORS_JSON).expect("failed to parse builtin selectors");
    precompile_selectors(selectors.css_selectors());
    selectors
}

impl SiteSelectors {
    /// Parses a selector set from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ParseError> {
        let selectors: SiteSelectors = serde_json::from_str(json).map_err(|e| {
            ParseError::config("<inline>", "LoadSelectors", Some(anyhow::Error::new(e)))
        })?;
        precompile_selectors(selectors.css_selectors());
        Ok(selectors)
    }

    /// Reads and parses a selector set from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        let json = fs::read_to_string(path).map_err(|e| {
            ParseError::config(&shown, "LoadSelectors", Some(anyhow::Error::new(e)))
        })?;
        let selectors: SiteSelectors = serde_json::from_str(&json).map_err(|e| {
            ParseError::config(&shown, "LoadSelectors", Some(anyhow::Error::new(e)))
        })?;
        tracing::debug!(path = %shown, "loaded selector override");
        precompile_selectors(selectors.css_selectors());
        Ok(selectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::compiled::get_or_compile;
    use crate::extractors::site::SelectorSpec;

    #[test]
    fn load_builtin_selectors_succeeds() {
        let selectors = load_builtin_selectors();
        assert_eq!(
            selectors.entry_type,
            SelectorSpec::attr("meta[property='og:type']", "content")
        );
        assert_eq!(
            selectors.content_type_label,
            SelectorSpec::text("span[class='test-content-type']")
        );
    }

    #[test]
    fn builtin_article_timestamp_has_two_candidates() {
        let selectors = load_builtin_selectors();
        assert_eq!(
            selectors.article.timestamp.selectors,
            vec![
                SelectorSpec::attr("meta[name='dc.date']", "content"),
                SelectorSpec::attr("meta[name='citation_publication_date']", "content"),
            ]
        );
    }

    #[test]
    fn builtin_selectors_all_compile() {
        let selectors = load_builtin_selectors();
        for css in selectors.css_selectors() {
            assert!(get_or_compile(css).is_some(), "selector failed to compile: {}", css);
        }
    }

    #[test]
    fn from_json_str_rejects_incomplete_set() {
        let err = SiteSelectors::from_json_str(r#"{"entry_type": "meta"}"#)
            .expect_err("missing sections should fail");
        assert!(err.is_config());
    }

    #[test]
    fn from_json_str_roundtrips_builtin() {
        let builtin = load_builtin_selectors();
        let json = serde_json::to_string(&builtin).unwrap();
        let parsed = SiteSelectors::from_json_str(&json).unwrap();
        assert_eq!(parsed, builtin);
    }

    #[test]
    fn from_json_file_missing_is_config_error() {
        let err = SiteSelectors::from_json_file("/nonexistent/selectors.json")
            .expect_err("missing file should fail");
        assert!(err.is_config());
        assert!(err.url.contains("selectors.json"));
    }

    #[test]
    fn from_json_file_reads_override() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("selectors.json");
        let mut custom = load_builtin_selectors();
        custom.content_type_label = SelectorSpec::text("span[class='content-type']");
        fs::write(&path, serde_json::to_string_pretty(&custom).unwrap()).unwrap();

        let loaded = SiteSelectors::from_json_file(&path).unwrap();
        assert_eq!(loaded, custom);
    }
}
