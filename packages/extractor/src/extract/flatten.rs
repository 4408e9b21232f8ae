//! Flattening of a whole parse tree into its canonical text.

use scraper::Html;

use crate::config::NODE_SEPARATOR;
use crate::error::{ExtractorError, Result};
use crate::html::text_nodes;
use crate::types::{CanonicalText, DocumentId};

/// Flatten a parsed document into its canonical text.
///
/// Every text-bearing node is taken in document order and the nodes are
/// joined by [`NODE_SEPARATOR`]. No trimming or whitespace collapsing is
/// applied, so the result is deterministic for a given tree.
///
/// # Errors
/// `ExtractorError::EmptyDocument` if the tree holds no text node at all.
pub fn flatten(document: &DocumentId, html: &Html) -> Result<CanonicalText> {
    let mut nodes = text_nodes(html.root_element()).peekable();
    if nodes.peek().is_none() {
        return Err(ExtractorError::EmptyDocument {
            document: document.clone(),
        });
    }

    let text = nodes.collect::<Vec<_>>().join(NODE_SEPARATOR);
    Ok(CanonicalText::new(text))
}
