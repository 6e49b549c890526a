use serde::{Serialize, Deserialize};
use thiserror::Error;

/// One document unit of the source corpus. Fragments are processed in
/// ordinal order; the raw markup is read-only for the whole run.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub id: String,
    pub ordinal: usize,
    pub raw: String,
}

impl Fragment {
    pub fn new(id: &str, ordinal: usize, raw: &str) -> Self {
        Fragment {
            id: id.to_string(),
            ordinal,
            raw: raw.to_string(),
        }
    }
}

/// A structurally tagged span within one fragment, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    /// Resolved chapter marker, e.g. "CHAPTER ELEVEN" or "CHAPTER 11".
    ChapterHeader(u32),
    /// A chapter marker whose payload could not be resolved to a number.
    /// The tracker logs it and keeps the previous chapter value.
    UnresolvedChapterHeader,
    /// Verse number label, carrying the parsed designator ("7" or "16-18").
    VerseLabel,
    Sanskrit,
    Glosses,
    Translation,
    Commentary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub text: String,
}

impl Segment {
    pub fn new(kind: SegmentKind, text: String) -> Self {
        Segment { kind, text }
    }
}

/// One finalized scripture record. Immutable once assembled; the
/// fingerprint is the identity used by the store and the verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalVerse {
    pub book_code: String,
    pub chapter: u32,
    /// Single number or inclusive range, e.g. "2-3". A range is one record.
    pub designator: String,
    pub sanskrit: Option<String>,
    pub glosses: Option<String>,
    pub translation: String,
    pub commentary: Option<String>,
    pub fingerprint: String,
}

impl CanonicalVerse {
    /// Reference label such as "BG 2.13" or "BG 1.16-18".
    pub fn verse_ref(&self) -> String {
        format!("{} {}.{}", self.book_code, self.chapter, self.designator)
    }
}

/// Non-fatal problem noticed during extraction or chapter tracking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseWarning {
    pub fragment_id: String,
    pub reason: String,
}

/// A verse-in-progress that could not be finalized. The record is dropped;
/// only this entry remains for the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionFailure {
    pub fragment_id: String,
    pub chapter: Option<u32>,
    pub designator: Option<String>,
    pub reason: String,
}

/// Fatal before-run configuration problems. Everything downstream of these
/// degrades to partial results plus a report instead of aborting.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("corpus is empty, there is nothing to ingest")]
    EmptyCorpus,
    #[error("file map has no entries, chapter attribution has no fallback")]
    EmptyFileMap,
}
