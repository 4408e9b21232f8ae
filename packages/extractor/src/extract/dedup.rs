//! Suppression of repeated fragments within one document.

use std::collections::HashSet;

use crate::types::Fragment;

/// Start offsets of the fragments already accepted for the current document.
///
/// Scoped to one document; a fresh set is used for every scan.
#[derive(Debug, Default, Clone)]
pub struct SeenOffsets {
    starts: HashSet<usize>,
}

impl SeenOffsets {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a fragment unless its start offset was seen before.
    ///
    /// The key is the start offset alone: a later fragment with the same
    /// start but a different length is dropped as well. Nested blocks whose
    /// text begins at the same position therefore yield only the first one
    /// encountered, which is the outermost.
    pub fn accept(&mut self, fragment: &Fragment) -> bool {
        self.starts.insert(fragment.start)
    }

    #[must_use]
    pub fn contains(&self, start: usize) -> bool {
        self.starts.contains(&start)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }
}
