//! Run orchestration: drives every document of an input directory through
//! the pipeline and writes the output artifacts.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::ExtractionConfig;
use crate::discovery::{discover_documents, ensure_directory};
use crate::error::{ExtractorError, Result};
use crate::extract::ExtractionPipeline;
use crate::output::{save_fragments, write_text_artifact, OutputFormat};
use crate::types::{DocumentId, DocumentReport, ExtractionResult, FragmentRecord};

/// A document that was skipped, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDocument {
    pub document: DocumentId,
    pub reason: String,
}

/// Totals for a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Documents that were processed to completion.
    pub processed: usize,

    /// Documents skipped because of a document-scoped failure.
    pub skipped: Vec<SkippedDocument>,

    /// Fragments accepted across all documents.
    pub fragments: usize,

    /// Fragment-level warnings across all documents.
    pub warnings: Vec<String>,

    /// Location of the cumulative fragment file, once written.
    pub fragments_path: Option<PathBuf>,
}

impl RunSummary {
    /// True once the cumulative fragment file has been written.
    ///
    /// Every document is then either processed or recorded as skipped.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.fragments_path.is_some()
    }
}

/// State of one extraction run over many documents.
///
/// Documents are processed strictly one after another. Fragment records
/// are kept in emission order and written together by [`ExtractionRun::finish`].
#[derive(Debug)]
pub struct ExtractionRun {
    output_dir: PathBuf,
    config: ExtractionConfig,
    records: Vec<FragmentRecord>,
    issued: HashSet<DocumentId>,
    summary: RunSummary,
}

impl ExtractionRun {
    /// Start a run writing into `output_dir`, which must exist.
    pub fn new(output_dir: &Path, config: ExtractionConfig) -> Result<Self> {
        let config = config.validate()?;
        ensure_directory(output_dir)?;

        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            config,
            records: Vec::new(),
            issued: HashSet::new(),
            summary: RunSummary::default(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Fragment records accepted so far.
    #[must_use]
    pub fn records(&self) -> &[FragmentRecord] {
        &self.records
    }

    #[must_use]
    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Process the document at `path`.
    ///
    /// On success the document's text artifact is written and its fragments
    /// join the run's records. A document-scoped failure is recorded as a
    /// skip and returned, leaving the run usable for the next document.
    ///
    /// Identifiers are file stems, so `a.htm` and `a.html` collide; only the
    /// first of them is extracted and later ones are skipped untouched.
    pub fn process(&mut self, path: &Path) -> Result<DocumentReport> {
        let id = DocumentId::from_path(path);
        let outcome = if self.issued.contains(&id) {
            Err(ExtractorError::DuplicateDocument {
                document: id,
                path: path.to_path_buf(),
            })
        } else {
            self.extract_document(path)
        };

        match outcome {
            Ok((report, records)) => {
                self.issued.insert(report.document.clone());
                tracing::info!(
                    document = %report.document,
                    fragments = report.fragments,
                    duplicates = report.duplicates,
                    "Processed document"
                );
                self.summary.processed += 1;
                self.summary.fragments += records.len();
                self.summary.warnings.extend(report.warnings.iter().cloned());
                self.records.extend(records);
                Ok(report)
            }
            Err(e) => {
                if let Some(document) = e.document().filter(|_| e.is_document_scoped()) {
                    tracing::warn!(document = %document, error = %e, "Skipping document");
                    self.summary.skipped.push(SkippedDocument {
                        document: document.clone(),
                        reason: e.to_string(),
                    });
                }
                Err(e)
            }
        }
    }

    /// Run one document to completion without touching the run's records.
    fn extract_document(&self, path: &Path) -> Result<(DocumentReport, Vec<FragmentRecord>)> {
        let pipeline = ExtractionPipeline::new(&self.config);
        let document = pipeline.load(path)?;

        let mut report = DocumentReport::new(document.id().clone());
        let mut records = Vec::new();

        let mut scan = pipeline.scan(&document);
        for result in scan.by_ref() {
            match result {
                Ok(ExtractionResult::WholeText(text)) => {
                    write_text_artifact(&self.output_dir, document.id(), text)?;
                }
                Ok(ExtractionResult::QualifyingFragment(fragment)) => {
                    debug_assert!(
                        fragment.is_within(document.canonical()),
                        "located fragment must lie inside the canonical text"
                    );
                    records.push(FragmentRecord::new(document.id().clone(), fragment));
                }
                Err(e @ ExtractorError::FragmentNotLocated { .. }) => {
                    tracing::warn!(document = %document.id(), error = %e, "Fragment not located");
                    report.warnings.push(e.to_string());
                }
                Err(e) => return Err(e),
            }
        }

        report.fragments = records.len();
        report.duplicates = scan.duplicates();
        Ok((report, records))
    }

    /// Write the cumulative fragment file and close the run.
    ///
    /// Failing to write it fails the run.
    pub fn finish(mut self, format: OutputFormat) -> Result<RunSummary> {
        let path = save_fragments(&self.records, &self.output_dir, format)?;
        tracing::info!(
            path = %path.display(),
            fragments = self.records.len(),
            "Wrote fragment file"
        );
        self.summary.fragments_path = Some(path);
        Ok(self.summary)
    }
}

/// Progress of a run, reported to the observer of [`run_extraction_with`].
#[derive(Debug)]
pub enum RunEvent<'a> {
    /// The input directory was listed.
    Discovered { count: usize },

    /// A document is about to be processed.
    Processing { path: &'a Path },

    /// A document finished, successfully or not.
    Processed {
        path: &'a Path,
        outcome: &'a Result<DocumentReport>,
    },

    /// All documents are done and the fragment file is being written.
    Saving,
}

/// Extract every document in `input_dir` into `output_dir`.
///
/// Document-scoped failures are skipped and listed in the summary; any
/// other failure aborts the run.
pub fn run_extraction(
    input_dir: &Path,
    output_dir: &Path,
    config: ExtractionConfig,
    format: OutputFormat,
) -> Result<RunSummary> {
    run_extraction_with(input_dir, output_dir, config, format, |_| {})
}

/// Like [`run_extraction`], calling `observe` as the run progresses.
pub fn run_extraction_with(
    input_dir: &Path,
    output_dir: &Path,
    config: ExtractionConfig,
    format: OutputFormat,
    mut observe: impl FnMut(RunEvent<'_>),
) -> Result<RunSummary> {
    // Both directories and the config are checked before any document is read
    let mut run = ExtractionRun::new(output_dir, config)?;
    let documents = discover_documents(input_dir)?;
    observe(RunEvent::Discovered {
        count: documents.len(),
    });

    for path in &documents {
        observe(RunEvent::Processing { path });
        let outcome = run.process(path);
        observe(RunEvent::Processed {
            path,
            outcome: &outcome,
        });

        if let Err(e) = outcome {
            if !e.is_document_scoped() {
                return Err(e);
            }
        }
    }

    observe(RunEvent::Saving);
    run.finish(format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_process_records_fragments() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        let path = input.path().join("acme.htm");
        fs::write(&path, "<div>Revenue was $500</div><div>Costs rose</div>").unwrap();

        let mut run = ExtractionRun::new(output.path(), ExtractionConfig::default()).unwrap();
        let report = run.process(&path).unwrap();

        assert_eq!(report.document.as_str(), "acme");
        assert_eq!(report.fragments, 1);
        assert_eq!(run.records().len(), 1);
        assert_eq!(
            fs::read_to_string(output.path().join("acme.txt")).unwrap(),
            "Revenue was $500\nCosts rose"
        );
    }

    #[test]
    fn test_process_skips_empty_document() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        let path = input.path().join("blank.htm");
        fs::write(&path, "").unwrap();

        let mut run = ExtractionRun::new(output.path(), ExtractionConfig::default()).unwrap();
        let err = run.process(&path).unwrap_err();

        assert!(err.is_document_scoped());
        assert_eq!(run.summary().skipped.len(), 1);
        assert_eq!(run.summary().skipped[0].document.as_str(), "blank");
        assert_eq!(run.summary().processed, 0);
        assert!(!output.path().join("blank.txt").exists());
    }

    #[test]
    fn test_not_located_fragment_becomes_warning() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        let path = input.path().join("nested.htm");
        fs::write(&path, "<div>Total $5 <div>sub $5</div></div>").unwrap();

        let config = ExtractionConfig {
            fragment_separator: String::new(),
            ..ExtractionConfig::default()
        };
        let mut run = ExtractionRun::new(output.path(), config).unwrap();
        let report = run.process(&path).unwrap();

        assert_eq!(report.fragments, 1);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("nested"));
        assert!(run.records().iter().all(|r| r.end >= r.start));
    }

    #[test]
    fn test_process_skips_colliding_identifier() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        let first = input.path().join("a.htm");
        let second = input.path().join("a.html");
        fs::write(&first, "<div>First $1</div>").unwrap();
        fs::write(&second, "<div>Second $2</div>").unwrap();

        let mut run = ExtractionRun::new(output.path(), ExtractionConfig::default()).unwrap();
        run.process(&first).unwrap();
        let err = run.process(&second).unwrap_err();

        assert!(matches!(err, ExtractorError::DuplicateDocument { .. }));
        assert_eq!(run.summary().processed, 1);
        assert_eq!(run.summary().skipped.len(), 1);
        assert_eq!(run.summary().skipped[0].document.as_str(), "a");
        assert_eq!(run.records().len(), 1);
        assert_eq!(run.records()[0].text, "First $1");
        assert_eq!(
            fs::read_to_string(output.path().join("a.txt")).unwrap(),
            "First $1"
        );
    }

    #[test]
    fn test_skipped_identifier_stays_available() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        let broken = input.path().join("a.htm");
        let good = input.path().join("a.html");
        fs::write(&broken, "").unwrap();
        fs::write(&good, "<div>Second $2</div>").unwrap();

        let mut run = ExtractionRun::new(output.path(), ExtractionConfig::default()).unwrap();
        assert!(run.process(&broken).is_err());
        run.process(&good).unwrap();

        assert_eq!(run.summary().processed, 1);
        assert_eq!(run.records()[0].text, "Second $2");
    }

    #[test]
    fn test_run_extraction_with_reports_events() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        fs::write(input.path().join("a.htm"), "<div>First $1</div>").unwrap();
        fs::write(input.path().join("b.htm"), "").unwrap();

        let mut events = Vec::new();
        let summary = run_extraction_with(
            input.path(),
            output.path(),
            ExtractionConfig::default(),
            OutputFormat::Yaml,
            |event| {
                events.push(match event {
                    RunEvent::Discovered { count } => format!("discovered {count}"),
                    RunEvent::Processing { path } => {
                        format!("processing {}", DocumentId::from_path(path))
                    }
                    RunEvent::Processed { path, outcome } => format!(
                        "processed {} ok={}",
                        DocumentId::from_path(path),
                        outcome.is_ok()
                    ),
                    RunEvent::Saving => "saving".to_string(),
                });
            },
        )
        .unwrap();

        assert_eq!(
            events,
            vec![
                "discovered 2",
                "processing a",
                "processed a ok=true",
                "processing b",
                "processed b ok=false",
                "saving",
            ]
        );
        assert!(summary.is_complete());
        assert_eq!(summary.processed, 1);
    }

    #[test]
    fn test_new_rejects_missing_output_directory() {
        let dir = tempdir().unwrap();
        let result = ExtractionRun::new(&dir.path().join("out"), ExtractionConfig::default());
        assert!(matches!(result, Err(ExtractorError::InvalidDirectory { .. })));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let dir = tempdir().unwrap();
        let config = ExtractionConfig {
            candidate_tag: "div p".to_string(),
            ..ExtractionConfig::default()
        };
        let result = ExtractionRun::new(dir.path(), config);
        assert!(matches!(result, Err(ExtractorError::InvalidConfig(_))));
    }

    #[test]
    fn test_finish_writes_fragment_file() {
        let output = tempdir().unwrap();
        let run = ExtractionRun::new(output.path(), ExtractionConfig::default()).unwrap();
        let summary = run.finish(OutputFormat::Json).unwrap();

        assert!(summary.is_complete());
        assert_eq!(
            summary.fragments_path,
            Some(output.path().join("fragments.json"))
        );
        assert_eq!(
            fs::read_to_string(output.path().join("fragments.json")).unwrap(),
            "[]\n"
        );
    }
}
