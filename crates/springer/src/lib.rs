// ABOUTME: Library entry point for the link.springer.com bibliographic record scraper.
// ABOUTME: Re-exports the public API: Client, RecordExtractor, PublicationRecord, ParseError, Options.

//! Springer DOI - bibliographic record extraction for link.springer.com pages.
//!
//! A page is classified as a book, a conference paper or an article, and a
//! fixed set of fields is pulled from its meta tags and markup into a
//! [`PublicationRecord`] with a citation-style ID.
//!
//! # Example
//!
//! ```no_run
//! use springer_doi::{formats, Client, ParseError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ParseError> {
//!     let client = Client::builder().build();
//!     if let Some(record) = client
//!         .parse("https://link.springer.com/chapter/10.1007/978-3-030-00000-0_1")
//!         .await?
//!     {
//!         println!("{}", formats::to_bibtex(&record));
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod extractors;
pub mod formats;
pub mod options;
pub mod record;
pub mod resource;

pub use crate::client::Client;
pub use crate::error::{ErrorCode, ParseError};
pub use crate::extractors::loader::load_builtin_selectors;
pub use crate::extractors::publication::{load_id, RecordExtractor};
pub use crate::extractors::select::{HtmlDocument, JoinPolicy, ParsedDocument};
pub use crate::extractors::site::{FieldExtractor, SelectorSpec, SiteSelectors};
pub use crate::options::{ClientBuilder, OutputFormat, Options};
pub use crate::record::{Article, Book, ConferencePaper, PublicationRecord};
