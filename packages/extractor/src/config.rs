//! Configuration constants and validation for the extractor.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{ExtractorError, Result};

/// Literal marker a block must contain to qualify.
pub const CURRENCY_MARKER: &str = "$";

/// Tag name of paragraph-like candidate blocks.
///
/// `div` stands in for paragraph-level blocks.
pub const CANDIDATE_TAG: &str = "div";

/// Blocks with an ancestor of this tag name never qualify.
pub const EXCLUDED_ANCESTOR_TAG: &str = "table";

/// Separator inserted between text nodes when flattening a document.
pub const NODE_SEPARATOR: &str = "\n";

/// Extension of the per-document text artifact.
pub const TEXT_ARTIFACT_EXTENSION: &str = "txt";

/// File stem of the cumulative fragment artifact.
pub const DEFAULT_FRAGMENTS_STEM: &str = "fragments";

/// Elements whose text content is not rendered.
pub const NON_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// HTML tag name pattern.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static TAG_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9-]*$").expect("valid regex"));

/// Validate an HTML tag name and normalise it to lower case.
///
/// # Examples
/// ```
/// use secparse_extractor::config::validate_tag_name;
///
/// assert_eq!(validate_tag_name("DIV").unwrap(), "div");
/// assert!(validate_tag_name("div p").is_err());
/// ```
pub fn validate_tag_name(tag: &str) -> Result<String> {
    if TAG_NAME_PATTERN.is_match(tag) {
        Ok(tag.to_ascii_lowercase())
    } else {
        Err(ExtractorError::InvalidConfig(format!(
            "'{tag}' is not a valid tag name"
        )))
    }
}

/// Settings that drive qualification and text extraction for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionConfig {
    /// Substring a block's text must contain.
    pub currency_marker: String,

    /// Tag name of candidate blocks.
    pub candidate_tag: String,

    /// Tag name whose presence among a block's ancestors disqualifies it.
    pub excluded_ancestor_tag: String,

    /// Separator used when rendering a single block's text.
    ///
    /// Defaults to [`NODE_SEPARATOR`], which makes every block's text a
    /// verbatim substring of the canonical text. An empty separator
    /// concatenates text nodes instead, and nested blocks may then fail to
    /// locate.
    pub fragment_separator: String,

    /// Replace invalid UTF-8 sequences instead of rejecting the document.
    pub lossy_decoding: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            currency_marker: CURRENCY_MARKER.to_string(),
            candidate_tag: CANDIDATE_TAG.to_string(),
            excluded_ancestor_tag: EXCLUDED_ANCESTOR_TAG.to_string(),
            fragment_separator: NODE_SEPARATOR.to_string(),
            lossy_decoding: false,
        }
    }
}

impl ExtractionConfig {
    /// Check the configuration and return it with tag names lower-cased.
    pub fn validate(self) -> Result<Self> {
        if self.currency_marker.is_empty() {
            return Err(ExtractorError::InvalidConfig(
                "currency marker must not be empty".to_string(),
            ));
        }

        Ok(Self {
            candidate_tag: validate_tag_name(&self.candidate_tag)?,
            excluded_ancestor_tag: validate_tag_name(&self.excluded_ancestor_tag)?,
            ..self
        })
    }
}
