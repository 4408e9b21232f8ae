//! Extraction of canonical text and qualifying fragments from a document.
//!
//! - [`flatten`]: canonical text of a whole tree
//! - [`ParagraphQualifier`]: which blocks are currency-bearing narrative
//! - [`locate`]: offsets of a block's text in the canonical text
//! - [`SeenOffsets`]: within-document dedup
//! - [`ExtractionPipeline`]: orchestration over one document

mod dedup;
mod flatten;
mod locator;
mod pipeline;
mod qualifier;

pub use dedup::SeenOffsets;
pub use flatten::flatten;
pub use locator::{locate, preview};
pub use pipeline::{Document, Extraction, ExtractionPipeline, FlattenedDocument, ParsedDocument};
pub use qualifier::ParagraphQualifier;
