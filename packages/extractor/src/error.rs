//! Error types for the extractor.
//!
//! Errors fall into two groups: failures scoped to a single document, which
//! the runner records and skips past, and run-level failures (bad
//! configuration, unusable directories, the cumulative artifact not being
//! written) which abort the run.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::DocumentId;

/// Main error type for the extractor library.
#[derive(Debug, Error)]
pub enum ExtractorError {
    /// The document file could not be opened or read.
    #[error("Cannot read document {document}: {source}")]
    DocumentUnreadable {
        document: DocumentId,
        #[source]
        source: std::io::Error,
    },

    /// The document bytes could not be turned into a parse tree.
    #[error("Failed to parse document {document}: {reason}")]
    ParseFailure { document: DocumentId, reason: String },

    /// The parse tree contains no text-bearing node to flatten.
    #[error("Document {document} has no text content")]
    EmptyDocument { document: DocumentId },

    /// A qualifying fragment's text does not occur in the canonical text.
    #[error("Fragment not found in canonical text of {document}: \"{preview}\"")]
    FragmentNotLocated { document: DocumentId, preview: String },

    /// Writing the per-document text artifact failed.
    #[error("Failed to write text artifact for {document}: {source}")]
    TextArtifact {
        document: DocumentId,
        #[source]
        source: std::io::Error,
    },

    /// Another document of the run already uses this identifier.
    #[error("Document {} has the same identifier as {}, already processed", .path.display(), .document)]
    DuplicateDocument { document: DocumentId, path: PathBuf },

    /// Input or output directory is missing or unusable.
    #[error("Invalid directory {}: {reason}", .path.display())]
    InvalidDirectory { path: PathBuf, reason: String },

    /// Extraction configuration was rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error.
    #[error("YAML serialization failed: {0}")]
    YamlSerialization(#[from] serde_yaml_ng::Error),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    JsonSerialization(#[from] serde_json::Error),
}

impl ExtractorError {
    /// Whether the failure only affects one document.
    ///
    /// Document-scoped failures are reported and the run continues with the
    /// next document. Everything else terminates the run.
    #[must_use]
    pub fn is_document_scoped(&self) -> bool {
        matches!(
            self,
            Self::DocumentUnreadable { .. }
                | Self::ParseFailure { .. }
                | Self::EmptyDocument { .. }
                | Self::FragmentNotLocated { .. }
                | Self::TextArtifact { .. }
                | Self::DuplicateDocument { .. }
        )
    }

    /// The document the failure belongs to, if any.
    #[must_use]
    pub fn document(&self) -> Option<&DocumentId> {
        match self {
            Self::DocumentUnreadable { document, .. }
            | Self::ParseFailure { document, .. }
            | Self::EmptyDocument { document }
            | Self::FragmentNotLocated { document, .. }
            | Self::TextArtifact { document, .. }
            | Self::DuplicateDocument { document, .. } => Some(document),
            _ => None,
        }
    }
}

/// Result type alias for extractor operations.
pub type Result<T> = std::result::Result<T, ExtractorError>;
