//! Output artifacts: per-document text files and the cumulative fragment file.

mod writer;

pub use writer::{
    fragments_path, generate_fragments, load_fragments, parse_fragments, save_fragments,
    text_artifact_path, write_text_artifact, OutputFormat,
};
