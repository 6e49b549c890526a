use std::thread;

use serde::Serialize;

use crate::extract::extract_segments;
use crate::assemble::VerseAssembler;
use crate::file_map::FileMap;
use crate::types::{CanonicalVerse, ConfigError, ExtractionFailure, Fragment, ParseWarning};
use crate::verify::{self, CountTable, VerificationReport};

/// Everything a caller needs to decide commit vs. abort: the finalized
/// records, the verification report, and the audit trail.
#[derive(Debug)]
pub struct IngestOutput {
    pub verses: Vec<CanonicalVerse>,
    pub report: VerificationReport,
    pub warnings: Vec<ParseWarning>,
    pub failures: Vec<ExtractionFailure>,
}

/// Summary counts for logging and audit output.
#[derive(Debug, Clone, Serialize)]
pub struct IngestSummary {
    pub fragments: usize,
    pub verses: usize,
    pub warnings: usize,
    pub failures: usize,
    pub passed: bool,
}

impl IngestOutput {
    pub fn summary(&self, fragments: usize) -> IngestSummary {
        IngestSummary {
            fragments,
            verses: self.verses.len(),
            warnings: self.warnings.len(),
            failures: self.failures.len(),
            passed: self.report.passed,
        }
    }
}

/// Run the full ingestion pipeline over an ordered corpus.
///
/// Extraction of distinct fragments shares no state and runs on scoped
/// threads; assembly is strictly sequential over the per-fragment
/// segment streams in corpus order, because every segment's
/// interpretation depends on the chapter cursor mutated by all prior
/// segments. Nothing here touches external storage; committing the
/// result is a separate step at the store boundary.
pub fn run_ingest(
    book_code: &str,
    corpus: &[Fragment],
    file_map: &FileMap,
    counts: &CountTable,
) -> Result<IngestOutput, ConfigError> {
    if corpus.is_empty() {
        return Err(ConfigError::EmptyCorpus);
    }
    if file_map.is_empty() {
        return Err(ConfigError::EmptyFileMap);
    }

    let mut ordered: Vec<&Fragment> = corpus.iter().collect();
    ordered.sort_by_key(|f| f.ordinal);

    tracing::info!("ingesting {} fragments for {}", ordered.len(), book_code);

    // Fan out extraction; join handles in corpus order so the segment
    // lists line up with the fragments.
    let segment_lists: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = ordered
            .iter()
            .map(|fragment| s.spawn(move || extract_segments(&fragment.raw)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("extraction thread panicked"))
            .collect()
    });

    let mut assembler = VerseAssembler::new(book_code);
    for (fragment, segments) in ordered.iter().zip(segment_lists.iter()) {
        tracing::debug!("{}: {} segments", fragment.id, segments.len());
        assembler.process_fragment(&fragment.id, segments, file_map);
    }
    let assembled = assembler.finish();

    let report = verify::verify(&assembled.verses, counts);

    let output = IngestOutput {
        verses: assembled.verses,
        report,
        warnings: assembled.warnings,
        failures: assembled.failures,
    };
    tracing::info!(
        "ingest finished: {} verses, {} warnings, {} failures, verification {}",
        output.verses.len(),
        output.warnings.len(),
        output.failures.len(),
        if output.report.passed { "passed" } else { "failed" }
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_map::FileMapEntry;

    #[test]
    fn test_empty_corpus_aborts() {
        let file_map = FileMap::new(vec![FileMapEntry {
            fragment_id: "a.html".to_string(),
            chapter: 1,
            note: None,
        }]);
        let err = run_ingest("BG", &[], &file_map, &CountTable::gita()).unwrap_err();
        assert_eq!(err, ConfigError::EmptyCorpus);
    }

    #[test]
    fn test_empty_file_map_aborts() {
        let corpus = vec![Fragment::new("a.html", 0, "<div></div>")];
        let err = run_ingest("BG", &corpus, &FileMap::default(), &CountTable::gita()).unwrap_err();
        assert_eq!(err, ConfigError::EmptyFileMap);
    }
}
