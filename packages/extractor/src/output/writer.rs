//! Writers for the per-document text artifact and the cumulative fragment file.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::ValueEnum;

use crate::config::{DEFAULT_FRAGMENTS_STEM, TEXT_ARTIFACT_EXTENSION};
use crate::error::{ExtractorError, Result};
use crate::types::{CanonicalText, DocumentId, FragmentRecord};

/// Serialization format of the cumulative fragment file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// YAML sequence of records.
    #[default]
    Yaml,

    /// JSON array of records.
    Json,
}

impl OutputFormat {
    /// File extension for this format.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
        }
    }

    /// Guess the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Path of the text artifact for a document.
#[must_use]
pub fn text_artifact_path(output_dir: &Path, document: &DocumentId) -> PathBuf {
    output_dir.join(format!("{document}.{TEXT_ARTIFACT_EXTENSION}"))
}

/// Write a document's canonical text verbatim to `<output_dir>/<id>.txt`.
///
/// # Errors
/// `ExtractorError::TextArtifact` if the file cannot be written.
pub fn write_text_artifact(
    output_dir: &Path,
    document: &DocumentId,
    canonical: &CanonicalText,
) -> Result<PathBuf> {
    let path = text_artifact_path(output_dir, document);
    fs::write(&path, canonical.as_str()).map_err(|source| ExtractorError::TextArtifact {
        document: document.clone(),
        source,
    })?;
    Ok(path)
}

/// Serialize fragment records in the given format.
pub fn generate_fragments(records: &[FragmentRecord], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(records)?;
            Ok(format!("---\n{yaml}"))
        }
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(records)?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Parse fragment records back from their serialized form.
pub fn parse_fragments(content: &str, format: OutputFormat) -> Result<Vec<FragmentRecord>> {
    let records = match format {
        OutputFormat::Yaml => serde_yaml_ng::from_str(content)?,
        OutputFormat::Json => serde_json::from_str(content)?,
    };
    Ok(records)
}

/// Path of the cumulative fragment file.
#[must_use]
pub fn fragments_path(output_dir: &Path, format: OutputFormat) -> PathBuf {
    output_dir.join(format!("{DEFAULT_FRAGMENTS_STEM}.{}", format.extension()))
}

/// Save all accepted fragment records of a run.
///
/// Uses atomic write pattern: writes to temp file, syncs to disk, then renames.
/// A crash never leaves a truncated fragment file behind.
///
/// # Returns
/// Path to the saved file
pub fn save_fragments(
    records: &[FragmentRecord],
    output_dir: &Path,
    format: OutputFormat,
) -> Result<PathBuf> {
    let output_file = fragments_path(output_dir, format);
    let temp_file = output_dir.join(format!(
        ".{DEFAULT_FRAGMENTS_STEM}.{}.tmp",
        format.extension()
    ));

    let content = generate_fragments(records, format)?;

    {
        let mut file = File::create(&temp_file)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    // On Windows, rename fails if the destination already exists
    #[cfg(target_os = "windows")]
    if output_file.exists() {
        fs::remove_file(&output_file)?;
    }

    fs::rename(&temp_file, &output_file)?;

    Ok(output_file)
}

/// Load a cumulative fragment file, picking the format from its extension.
pub fn load_fragments(path: &Path) -> Result<Vec<FragmentRecord>> {
    let format = OutputFormat::from_path(path).ok_or_else(|| {
        ExtractorError::InvalidConfig(format!(
            "cannot tell fragment file format from {}",
            path.display()
        ))
    })?;
    let content = fs::read_to_string(path)?;
    parse_fragments(&content, format)
}
