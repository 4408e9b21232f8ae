//! secparse extractor - currency-bearing prose from HTML financial filings.
//!
//! Each filing is flattened into a canonical plain-text rendering, and every
//! paragraph-like block that mentions a currency amount outside of a table is
//! located inside that text. The result is one `.txt` file per filing plus a
//! single fragment file listing `text`, `start` and `end` for every block.
//!
//! # Example
//!
//! ```
//! use secparse_extractor::config::ExtractionConfig;
//! use secparse_extractor::extract::{Document, ExtractionPipeline};
//! use secparse_extractor::types::{DocumentId, ExtractionResult};
//!
//! let config = ExtractionConfig::default();
//! let pipeline = ExtractionPipeline::new(&config);
//! let document = pipeline
//!     .prepare(Document::new(
//!         DocumentId::new("acme"),
//!         b"<html><body><div>Revenue was $500</div></body></html>".to_vec(),
//!     ))
//!     .unwrap();
//!
//! let fragments: Vec<_> = pipeline
//!     .scan(&document)
//!     .filter_map(|result| match result {
//!         Ok(ExtractionResult::QualifyingFragment(fragment)) => Some(fragment),
//!         _ => None,
//!     })
//!     .collect();
//!
//! assert_eq!(fragments.len(), 1);
//! assert_eq!(fragments[0].start, 0);
//! assert_eq!(fragments[0].end, 16);
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Configuration constants and validation
//! - [`types`]: Core data types (DocumentId, CanonicalText, Fragment, ...)
//! - [`error`]: Error types and Result alias
//! - [`html`]: HTML parsing and tree navigation
//! - [`extract`]: Flattening, qualification, locating, dedup and the per-document pipeline
//! - [`discovery`]: Input directory enumeration
//! - [`output`]: Text artifacts and the cumulative fragment file
//! - [`runner`]: Run orchestration across documents
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod extract;
pub mod html;
pub mod output;
pub mod runner;
pub mod types;

// Re-export main functions
pub use runner::{run_extraction, run_extraction_with, ExtractionRun, RunEvent, RunSummary};

// Re-export commonly used items
pub use config::ExtractionConfig;
pub use error::{ExtractorError, Result};
pub use output::OutputFormat;
pub use types::{CanonicalText, DocumentId, ExtractionResult, Fragment, FragmentRecord};
