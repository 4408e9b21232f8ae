//! Command-line interface for the extractor.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{
    ExtractionConfig, CANDIDATE_TAG, CURRENCY_MARKER, EXCLUDED_ANCESTOR_TAG, NODE_SEPARATOR,
};
use crate::error::Result;
use crate::output::OutputFormat;
use crate::runner::{run_extraction_with, RunEvent, RunSummary};

/// Extract currency-bearing narrative fragments and flattened text from HTML filings.
#[derive(Parser)]
#[command(name = "secparse-extractor")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory containing the HTML filings
    pub input_dir: PathBuf,

    /// Directory receiving the text files and the fragment file (must exist)
    pub output_dir: PathBuf,

    /// Format of the cumulative fragment file
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,

    /// Marker a block must contain to qualify
    #[arg(long, default_value = CURRENCY_MARKER)]
    pub marker: String,

    /// Tag name of candidate blocks
    #[arg(long, default_value = CANDIDATE_TAG)]
    pub candidate_tag: String,

    /// Blocks below an element with this tag name never qualify
    #[arg(long, default_value = EXCLUDED_ANCESTOR_TAG)]
    pub exclude_ancestor: String,

    /// Separator between text nodes of a single block
    #[arg(long, default_value = NODE_SEPARATOR)]
    pub fragment_separator: String,

    /// Replace invalid UTF-8 instead of skipping the document
    #[arg(long)]
    pub lossy: bool,
}

impl Cli {
    /// Build the extraction configuration from the command-line flags.
    #[must_use]
    pub fn extraction_config(&self) -> ExtractionConfig {
        ExtractionConfig {
            currency_marker: self.marker.clone(),
            candidate_tag: self.candidate_tag.clone(),
            excluded_ancestor_tag: self.exclude_ancestor.clone(),
            fragment_separator: self.fragment_separator.clone(),
            lossy_decoding: self.lossy,
        }
    }
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let summary = extract_command(
        &cli.input_dir,
        &cli.output_dir,
        cli.extraction_config(),
        cli.format,
    )?;
    print_summary(&summary);
    Ok(())
}

/// Execute the extraction over all documents in `input_dir`.
fn extract_command(
    input_dir: &Path,
    output_dir: &Path,
    config: ExtractionConfig,
    format: OutputFormat,
) -> Result<RunSummary> {
    let mut bar: Option<ProgressBar> = None;

    let result = run_extraction_with(input_dir, output_dir, config, format, |event| match event {
        RunEvent::Discovered { count } => {
            println!(
                "{} {} documents from {}",
                style("Extracting").bold(),
                style(count).cyan(),
                style(input_dir.display()).green()
            );
            println!();
            bar = Some(progress_bar(count));
        }
        RunEvent::Processing { path } => {
            if let Some(pb) = &bar {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                pb.set_message(name);
            }
        }
        RunEvent::Processed { outcome, .. } => {
            if let Some(pb) = &bar {
                if let Err(e) = outcome {
                    if e.is_document_scoped() {
                        pb.println(format!("  {} {e}", style("Skipped:").yellow().bold()));
                    }
                }
                pb.inc(1);
            }
        }
        RunEvent::Saving => {
            if let Some(pb) = &bar {
                pb.set_message("Saving fragments...");
            }
        }
    });

    if let Some(pb) = bar {
        pb.finish_and_clear();
    }
    result
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .expect("valid template"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn print_summary(summary: &RunSummary) {
    println!("  Documents: {}", style(summary.processed).green());
    if !summary.skipped.is_empty() {
        println!("  Skipped: {}", style(summary.skipped.len()).yellow().bold());
    }
    println!("  Fragments: {}", summary.fragments);
    if !summary.warnings.is_empty() {
        println!("  Warnings: {}", style(summary.warnings.len()).yellow().bold());
    }

    if let Some(path) = &summary.fragments_path {
        println!();
        println!("{} {}", style("Saved to:").green().bold(), path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_positional() {
        let cli = Cli::parse_from(["secparse-extractor", "filings", "out"]);

        assert_eq!(cli.input_dir, PathBuf::from("filings"));
        assert_eq!(cli.output_dir, PathBuf::from("out"));
        assert_eq!(cli.format, OutputFormat::Yaml);
        assert_eq!(cli.extraction_config(), ExtractionConfig::default());
    }

    #[test]
    fn test_cli_parse_options() {
        let cli = Cli::parse_from([
            "secparse-extractor",
            "filings",
            "out",
            "--format",
            "json",
            "--marker",
            "€",
            "--exclude-ancestor",
            "ul",
            "--fragment-separator",
            "",
            "--lossy",
        ]);

        assert_eq!(cli.format, OutputFormat::Json);
        let config = cli.extraction_config();
        assert_eq!(config.currency_marker, "€");
        assert_eq!(config.candidate_tag, "div");
        assert_eq!(config.excluded_ancestor_tag, "ul");
        assert_eq!(config.fragment_separator, "");
        assert!(config.lossy_decoding);
    }

    #[test]
    fn test_cli_requires_both_directories() {
        assert!(Cli::try_parse_from(["secparse-extractor", "filings"]).is_err());
    }
}
