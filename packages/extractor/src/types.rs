//! Core data types for the extractor.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Identifier of one input document, derived from its file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Create an identifier from any string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive the identifier from a document path.
    ///
    /// Uses the file stem, so `filings/acme-10k.htm` becomes `acme-10k`.
    /// Paths without a usable stem fall back to the full file name, and
    /// finally to the whole path.
    ///
    /// # Examples
    /// ```
    /// use std::path::Path;
    /// use secparse_extractor::types::DocumentId;
    ///
    /// let id = DocumentId::from_path(Path::new("filings/acme-10k.htm"));
    /// assert_eq!(id.as_str(), "acme-10k");
    /// ```
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let stem = path
            .file_stem()
            .or_else(|| path.file_name())
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self(stem)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The flattened text rendering of a whole document.
///
/// Computed once per document; every fragment offset refers to this exact
/// string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalText(String);

impl CanonicalText {
    pub(crate) fn new(text: String) -> Self {
        Self(text)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters, the unit fragment offsets are expressed in.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A located qualifying fragment.
///
/// `start` is inclusive and `end` exclusive, both counted in characters
/// of the canonical text. `end == start + text.chars().count()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl Fragment {
    /// Create a fragment starting at `start`; `end` follows from the text.
    #[must_use]
    pub fn new(text: impl Into<String>, start: usize) -> Self {
        let text = text.into();
        let end = start + text.chars().count();
        Self { text, start, end }
    }

    /// Check `start <= end <= len(canonical)`.
    #[must_use]
    pub fn is_within(&self, canonical: &CanonicalText) -> bool {
        self.start <= self.end && self.end <= canonical.char_len()
    }
}

/// One item produced by the extraction pipeline for a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionResult<'a> {
    /// The canonical text of the whole document, emitted once before any fragment.
    WholeText(&'a CanonicalText),

    /// An accepted currency-bearing fragment.
    QualifyingFragment(Fragment),
}

/// Fragment record as stored in the cumulative output artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentRecord {
    pub document: DocumentId,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl FragmentRecord {
    #[must_use]
    pub fn new(document: DocumentId, fragment: Fragment) -> Self {
        let Fragment { text, start, end } = fragment;
        Self {
            document,
            text,
            start,
            end,
        }
    }
}

/// Outcome of processing one document to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentReport {
    pub document: DocumentId,

    /// Number of fragments accepted.
    pub fragments: usize,

    /// Number of fragments suppressed as repeats of an earlier start offset.
    pub duplicates: usize,

    /// Non-fatal problems, such as fragments that could not be located.
    pub warnings: Vec<String>,
}

impl DocumentReport {
    #[must_use]
    pub fn new(document: DocumentId) -> Self {
        Self {
            document,
            fragments: 0,
            duplicates: 0,
            warnings: Vec::new(),
        }
    }
}
