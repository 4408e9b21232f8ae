//! Boundary to the HTML parser: parsing, tree navigation and text access.

mod utils;

pub use utils::{
    ancestors_named, decode_document, find_all, has_ancestor, has_tag, parse_document, tag_name,
    text_content, text_nodes,
};
