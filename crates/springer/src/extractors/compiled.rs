// ABOUTME: Pre-compiled CSS selector cache keyed by selector string.
// ABOUTME: Every document query goes through here so each selector is parsed once per process.

//! Selector caching for repeated DOM queries.
//!
//! The same few dozen selectors run against every page. Parsing them is more
//! expensive than matching, so compiled selectors are kept in a process-wide
//! cache. Invalid selectors are cached too, as `None`.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use scraper::Selector;

static SELECTOR_CACHE: Lazy<RwLock<HashMap<String, Option<Selector>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

fn compile(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(err) => {
            tracing::warn!(selector = css, error = %err, "invalid CSS selector");
            None
        }
    }
}

/// Gets or compiles a CSS selector, caching the result.
///
/// Returns `None` for an invalid selector. A poisoned lock is recovered, since
/// the map only ever holds fully built entries.
pub fn get_or_compile(css: &str) -> Option<Selector> {
    {
        let cache = SELECTOR_CACHE.read().unwrap_or_else(|e| e.into_inner());
        if let Some(cached) = cache.get(css) {
            return cached.clone();
        }
    }

    let compiled = compile(css);
    let mut cache = SELECTOR_CACHE.write().unwrap_or_else(|e| e.into_inner());
    cache
        .entry(css.to_string())
        .or_insert(compiled)
        .clone()
}

/// Precompiles a batch of selectors into the cache.
pub fn precompile_selectors<I, S>(selectors: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut cache = SELECTOR_CACHE.write().unwrap_or_else(|e| e.into_inner());
    for css in selectors {
        let css = css.as_ref();
        if !cache.contains_key(css) {
            cache.insert(css.to_string(), compile(css));
        }
    }
}
