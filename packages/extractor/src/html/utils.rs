//! HTML utility functions for parsing documents and navigating their trees.

use std::borrow::Cow;

use scraper::{ElementRef, Html};

use crate::config::NON_TEXT_ELEMENTS;
use crate::error::{ExtractorError, Result};
use crate::types::DocumentId;

/// Decode raw document bytes as UTF-8.
///
/// With `lossy` set, invalid sequences are replaced by U+FFFD instead of
/// failing the document.
///
/// # Returns
/// The decoded text, or a description of the first invalid sequence
pub fn decode_document(bytes: &[u8], lossy: bool) -> std::result::Result<Cow<'_, str>, String> {
    if lossy {
        return Ok(String::from_utf8_lossy(bytes));
    }
    std::str::from_utf8(bytes)
        .map(Cow::Borrowed)
        .map_err(|e| format!("invalid UTF-8: {e}"))
}

/// Parse raw document bytes into an HTML tree.
///
/// The parser recovers from malformed markup; recoverable errors are only
/// logged. Empty input and undecodable bytes are parse failures.
///
/// # Arguments
/// * `document` - Identifier used in errors and log output
/// * `bytes` - Raw document content
/// * `lossy` - Accept invalid UTF-8 by replacing it
pub fn parse_document(document: &DocumentId, bytes: &[u8], lossy: bool) -> Result<Html> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ExtractorError::ParseFailure {
            document: document.clone(),
            reason: "document is empty".to_string(),
        });
    }

    let source = decode_document(bytes, lossy).map_err(|reason| ExtractorError::ParseFailure {
        document: document.clone(),
        reason,
    })?;

    let html = Html::parse_document(&source);
    if !html.errors.is_empty() {
        tracing::debug!(
            document = %document,
            count = html.errors.len(),
            first = %html.errors[0],
            "Recovered from markup errors"
        );
    }

    Ok(html)
}

/// Get the local tag name of an element (always lower case for HTML).
pub fn tag_name<'a>(element: ElementRef<'a>) -> &'a str {
    element.value().name()
}

/// Check if an element has a specific tag name.
pub fn has_tag(element: ElementRef<'_>, tag: &str) -> bool {
    tag_name(element) == tag
}

/// Find all elements with the given tag name, in document order.
///
/// The root element itself is included when it matches.
///
/// # Examples
/// ```
/// use scraper::Html;
/// use secparse_extractor::html::find_all;
///
/// let html = Html::parse_document("<div>a</div><p>b</p><div>c</div>");
/// assert_eq!(find_all(&html, "div").count(), 2);
/// ```
pub fn find_all<'a>(html: &'a Html, tag: &'a str) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    html.root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(move |element| has_tag(*element, tag))
}

/// Find all ancestors of an element with the given tag name.
///
/// Walks all the way to the document root, nearest ancestor first.
pub fn ancestors_named<'a>(
    element: ElementRef<'a>,
    tag: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .filter(move |ancestor| has_tag(*ancestor, tag))
}

/// Check if any ancestor of an element has the given tag name.
pub fn has_ancestor(element: ElementRef<'_>, tag: &str) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| has_tag(ancestor, tag))
}

/// Iterate over the text-bearing nodes below an element, in document order.
///
/// Text directly inside `script` and `style` elements is skipped.
pub fn text_nodes<'a>(element: ElementRef<'a>) -> impl Iterator<Item = &'a str> + 'a {
    element.descendants().filter_map(|node| {
        let text = node.value().as_text()?;
        let rendered = node
            .parent()
            .and_then(ElementRef::wrap)
            .is_none_or(|parent| !NON_TEXT_ELEMENTS.contains(&tag_name(parent)));
        rendered.then_some(&**text)
    })
}

/// Get the text content of an element, text nodes joined by `separator`.
///
/// Text nodes are taken verbatim; nothing is trimmed or collapsed.
pub fn text_content(element: ElementRef<'_>, separator: &str) -> String {
    let mut text = String::new();
    for (i, node_text) in text_nodes(element).enumerate() {
        if i > 0 {
            text.push_str(separator);
        }
        text.push_str(node_text);
    }
    text
}
