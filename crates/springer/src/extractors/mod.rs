// ABOUTME: Extraction of publication records from parsed pages.
// ABOUTME: Groups selector data, document querying, selector caching, and record building.

//! Record extraction module.
//!
//! Submodules:
//! - `site`: selector sets as serde data.
//! - `loader`: built-in and file-based selector sets.
//! - `compiled`: process-wide compiled selector cache.
//! - `select`: the `ParsedDocument` query trait and join policy.
//! - `publication`: classification and per-variant record building.

pub mod compiled;
pub mod loader;
pub mod publication;
pub mod select;
pub mod site;
