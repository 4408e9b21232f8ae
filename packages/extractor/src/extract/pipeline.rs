//! Per-document extraction pipeline.
//!
//! A document moves through typed stages, each produced by the previous one:
//!
//! ```text
//! Document (unopened) -> ParsedDocument -> FlattenedDocument -> Extraction (scanning) -> done
//! ```
//!
//! Reading, parsing and flattening return `Result`; an `Err` at any of these
//! steps is the failed state and nothing is emitted for the document. The
//! scan is a lazy iterator that yields the whole text once, then every
//! accepted fragment in document order, and ends when the candidate blocks
//! are exhausted. Calling [`ExtractionPipeline::scan`] again restarts it with
//! fresh dedup state.

use std::fs;
use std::path::Path;

use scraper::{ElementRef, Html};

use super::dedup::SeenOffsets;
use super::flatten::flatten;
use super::locator::{locate, preview};
use super::qualifier::ParagraphQualifier;
use crate::config::ExtractionConfig;
use crate::error::{ExtractorError, Result};
use crate::html::{find_all, parse_document};
use crate::types::{CanonicalText, DocumentId, ExtractionResult};

/// One input document: identifier plus raw content.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: DocumentId,
    pub content: Vec<u8>,
}

impl Document {
    #[must_use]
    pub fn new(id: DocumentId, content: Vec<u8>) -> Self {
        Self { id, content }
    }

    /// Read a document from disk, deriving its identifier from the file name.
    pub fn read(path: &Path) -> Result<Self> {
        let id = DocumentId::from_path(path);
        match fs::read(path) {
            Ok(content) => Ok(Self { id, content }),
            Err(source) => Err(ExtractorError::DocumentUnreadable { document: id, source }),
        }
    }
}

/// A document whose markup has been parsed.
#[derive(Debug)]
pub struct ParsedDocument {
    id: DocumentId,
    tree: Html,
}

impl ParsedDocument {
    #[must_use]
    pub fn id(&self) -> &DocumentId {
        &self.id
    }
}

/// A parsed document together with its canonical text.
#[derive(Debug)]
pub struct FlattenedDocument {
    id: DocumentId,
    tree: Html,
    canonical: CanonicalText,
}

impl FlattenedDocument {
    #[must_use]
    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    #[must_use]
    pub fn canonical(&self) -> &CanonicalText {
        &self.canonical
    }

    #[must_use]
    pub fn tree(&self) -> &Html {
        &self.tree
    }
}

/// Drives documents through parsing, flattening and scanning.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionPipeline<'c> {
    config: &'c ExtractionConfig,
}

impl<'c> ExtractionPipeline<'c> {
    /// Create a pipeline. The configuration is expected to be validated.
    #[must_use]
    pub fn new(config: &'c ExtractionConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &'c ExtractionConfig {
        self.config
    }

    /// Parse a document's raw bytes into a tree.
    pub fn parse(&self, document: Document) -> Result<ParsedDocument> {
        let tree = parse_document(&document.id, &document.content, self.config.lossy_decoding)?;
        Ok(ParsedDocument {
            id: document.id,
            tree,
        })
    }

    /// Compute the canonical text of a parsed document.
    pub fn flatten(&self, parsed: ParsedDocument) -> Result<FlattenedDocument> {
        let canonical = flatten(&parsed.id, &parsed.tree)?;
        Ok(FlattenedDocument {
            id: parsed.id,
            tree: parsed.tree,
            canonical,
        })
    }

    /// Parse and flatten in one step.
    pub fn prepare(&self, document: Document) -> Result<FlattenedDocument> {
        self.flatten(self.parse(document)?)
    }

    /// Read, parse and flatten the document at `path`.
    pub fn load(&self, path: &Path) -> Result<FlattenedDocument> {
        self.prepare(Document::read(path)?)
    }

    /// Start scanning a flattened document.
    pub fn scan<'a>(&self, document: &'a FlattenedDocument) -> Extraction<'a>
    where
        'c: 'a,
    {
        let config: &'c ExtractionConfig = self.config;
        let candidates = find_all(&document.tree, &config.candidate_tag);
        Extraction {
            document,
            qualifier: ParagraphQualifier::new(config),
            candidates: Box::new(candidates),
            whole_text_emitted: false,
            seen: SeenOffsets::new(),
            duplicates: 0,
        }
    }
}

/// Lazy sequence of results for one document.
///
/// Yields `WholeText` first, then one `QualifyingFragment` per accepted
/// block. A qualifying block whose text cannot be located yields
/// `Err(ExtractorError::FragmentNotLocated)` and the scan continues.
pub struct Extraction<'a> {
    document: &'a FlattenedDocument,
    qualifier: ParagraphQualifier<'a>,
    candidates: Box<dyn Iterator<Item = ElementRef<'a>> + 'a>,
    whole_text_emitted: bool,
    seen: SeenOffsets,
    duplicates: usize,
}

impl Extraction<'_> {
    /// Number of fragments suppressed so far as repeated start offsets.
    #[must_use]
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Start offsets accepted so far.
    #[must_use]
    pub fn seen(&self) -> &SeenOffsets {
        &self.seen
    }
}

impl<'a> Iterator for Extraction<'a> {
    type Item = Result<ExtractionResult<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        let document = self.document;

        if !self.whole_text_emitted {
            self.whole_text_emitted = true;
            return Some(Ok(ExtractionResult::WholeText(&document.canonical)));
        }

        for element in self.candidates.by_ref() {
            let Some(text) = self.qualifier.evaluate(element) else {
                continue;
            };

            let Some(fragment) = locate(&text, &document.canonical) else {
                return Some(Err(ExtractorError::FragmentNotLocated {
                    document: document.id.clone(),
                    preview: preview(&text),
                }));
            };

            if self.seen.accept(&fragment) {
                return Some(Ok(ExtractionResult::QualifyingFragment(fragment)));
            }

            self.duplicates += 1;
            tracing::debug!(
                document = %document.id,
                start = fragment.start,
                end = fragment.end,
                "Suppressed fragment with repeated start offset"
            );
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Fragment;

    fn prepare(config: &ExtractionConfig, source: &str) -> FlattenedDocument {
        let pipeline = ExtractionPipeline::new(config);
        pipeline
            .prepare(Document::new(DocumentId::new("test"), source.as_bytes().to_vec()))
            .unwrap()
    }

    fn fragments(config: &ExtractionConfig, document: &FlattenedDocument) -> Vec<Fragment> {
        ExtractionPipeline::new(config)
            .scan(document)
            .filter_map(|result| match result {
                Ok(ExtractionResult::QualifyingFragment(fragment)) => Some(fragment),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_whole_text_emitted_first_and_once() {
        let config = ExtractionConfig::default();
        let document = prepare(&config, "<div>a $1</div><div>b $2</div>");
        let results: Vec<_> = ExtractionPipeline::new(&config)
            .scan(&document)
            .map(|r| r.unwrap())
            .collect();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0], ExtractionResult::WholeText(document.canonical()));
        let whole_texts = results
            .iter()
            .filter(|r| matches!(r, ExtractionResult::WholeText(_)))
            .count();
        assert_eq!(whole_texts, 1);
    }

    #[test]
    fn test_whole_text_without_fragments() {
        let config = ExtractionConfig::default();
        let document = prepare(&config, "<div>No amounts here</div>");
        let results: Vec<_> = ExtractionPipeline::new(&config)
            .scan(&document)
            .map(|r| r.unwrap())
            .collect();

        assert_eq!(results, vec![ExtractionResult::WholeText(document.canonical())]);
    }

    #[test]
    fn test_nested_identical_blocks_emitted_once() {
        let config = ExtractionConfig::default();
        let document = prepare(&config, "<div><div><div>Net $9</div></div></div>");
        let mut scan = ExtractionPipeline::new(&config).scan(&document);
        let found: Vec<_> = scan.by_ref().filter_map(|r| r.ok()).collect();

        assert_eq!(found.len(), 2);
        assert_eq!(
            found[1],
            ExtractionResult::QualifyingFragment(Fragment::new("Net $9", 0))
        );
        assert_eq!(scan.duplicates(), 2);
        assert_eq!(scan.seen().len(), 1);
    }

    #[test]
    fn test_nested_blocks_with_distinct_offsets() {
        let config = ExtractionConfig::default();
        let document = prepare(&config, "<div>Total $5 <div>sub $5</div></div>");
        let found = fragments(&config, &document);

        assert_eq!(
            found,
            vec![
                Fragment::new("Total $5 \nsub $5", 0),
                Fragment::new("sub $5", 10),
            ]
        );
    }

    #[test]
    fn test_sibling_repeat_collapses_to_first_occurrence() {
        let config = ExtractionConfig::default();
        let document = prepare(&config, "<div>Fee $3</div><div>Fee $3</div>");
        let found = fragments(&config, &document);

        assert_eq!(found, vec![Fragment::new("Fee $3", 0)]);
    }

    #[test]
    fn test_concatenated_fragment_text_not_located() {
        let config = ExtractionConfig {
            fragment_separator: String::new(),
            ..ExtractionConfig::default()
        };
        let document = prepare(&config, "<div>Total $5 <div>sub $5</div></div>");
        let results: Vec<_> = ExtractionPipeline::new(&config).scan(&document).collect();

        assert_eq!(results.len(), 3);
        assert!(matches!(
            &results[1],
            Err(ExtractorError::FragmentNotLocated { preview, .. }) if preview == "Total $5 sub $5"
        ));
        assert!(matches!(
            &results[2],
            Ok(ExtractionResult::QualifyingFragment(f)) if f.start == 10
        ));
    }

    #[test]
    fn test_scan_is_restartable() {
        let config = ExtractionConfig::default();
        let document = prepare(&config, "<div>a $1</div><div><div>a $1</div></div>");
        let pipeline = ExtractionPipeline::new(&config);

        let first: Vec<_> = pipeline.scan(&document).filter_map(|r| r.ok()).collect();
        let second: Vec<_> = pipeline.scan(&document).filter_map(|r| r.ok()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_parse_failure_for_empty_document() {
        let config = ExtractionConfig::default();
        let pipeline = ExtractionPipeline::new(&config);
        let result = pipeline.prepare(Document::new(DocumentId::new("blank"), Vec::new()));
        assert!(matches!(result, Err(ExtractorError::ParseFailure { .. })));
    }

    #[test]
    fn test_read_missing_document() {
        let result = Document::read(Path::new("/nonexistent/filing.htm"));
        match result {
            Err(ExtractorError::DocumentUnreadable { document, .. }) => {
                assert_eq!(document.as_str(), "filing");
            }
            other => panic!("expected DocumentUnreadable, got {other:?}"),
        }
    }
}
