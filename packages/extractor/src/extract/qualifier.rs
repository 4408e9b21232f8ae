//! Predicate deciding whether a candidate block is a qualifying fragment.

use scraper::ElementRef;

use crate::config::ExtractionConfig;
use crate::html::{has_ancestor, text_content};

/// Decides whether a block qualifies as a currency-bearing narrative fragment.
///
/// A block qualifies when its text contains the currency marker and no
/// ancestor, up to the document root, carries the excluded tag.
#[derive(Debug, Clone, Copy)]
pub struct ParagraphQualifier<'a> {
    marker: &'a str,
    excluded_ancestor: &'a str,
    separator: &'a str,
}

impl<'a> ParagraphQualifier<'a> {
    #[must_use]
    pub fn new(config: &'a ExtractionConfig) -> Self {
        Self {
            marker: &config.currency_marker,
            excluded_ancestor: &config.excluded_ancestor_tag,
            separator: &config.fragment_separator,
        }
    }

    /// Evaluate a block, returning its text if it qualifies.
    ///
    /// The ancestor check runs first so blocks inside tables are never
    /// rendered.
    #[must_use]
    pub fn evaluate(&self, element: ElementRef<'_>) -> Option<String> {
        if has_ancestor(element, self.excluded_ancestor) {
            return None;
        }
        let text = text_content(element, self.separator);
        text.contains(self.marker).then_some(text)
    }

    #[must_use]
    pub fn qualifies(&self, element: ElementRef<'_>) -> bool {
        self.evaluate(element).is_some()
    }
}
