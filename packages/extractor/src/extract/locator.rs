//! Locating fragment text inside the canonical text.

use crate::types::{CanonicalText, Fragment};

/// Maximum number of characters shown when reporting a fragment.
const PREVIEW_CHARS: usize = 60;

/// Locate `text` in the canonical text.
///
/// Uses the leftmost verbatim occurrence: case-sensitive, with no whitespace
/// or entity normalisation. Offsets are counted in characters.
///
/// # Returns
/// The located fragment, or `None` when the text does not occur.
///
/// # Examples
/// ```
/// use secparse_extractor::extract::{flatten, locate};
/// use secparse_extractor::types::DocumentId;
/// use scraper::Html;
///
/// let html = Html::parse_document("<div>Revenue was $500</div>");
/// let canonical = flatten(&DocumentId::new("doc"), &html).unwrap();
/// let fragment = locate("$500", &canonical).unwrap();
/// assert_eq!((fragment.start, fragment.end), (12, 16));
/// ```
#[must_use]
pub fn locate(text: &str, canonical: &CanonicalText) -> Option<Fragment> {
    let haystack = canonical.as_str();
    let byte_offset = haystack.find(text)?;
    let start = haystack[..byte_offset].chars().count();
    Some(Fragment::new(text, start))
}

/// Shorten fragment text for log and error output.
#[must_use]
pub fn preview(text: &str) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= PREVIEW_CHARS {
        return flat;
    }
    let mut short: String = flat.chars().take(PREVIEW_CHARS).collect();
    short.push('…');
    short
}
