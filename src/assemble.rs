use std::collections::HashMap;

use crate::file_map::FileMap;
use crate::fingerprint::CanonicalPayload;
use crate::helpers::designator_numbers;
use crate::types::{CanonicalVerse, ExtractionFailure, ParseWarning, Segment, SegmentKind};

/// The running state of chapter attribution, threaded across the whole
/// corpus in fragment order. One context per book run; never shared.
#[derive(Debug, Default)]
pub struct ParserContext {
    pub current_chapter: Option<u32>,
    pub warnings: Vec<ParseWarning>,
}

impl ParserContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fragment-entry transition. The file-map fallback only fires here,
    /// before any header of the new fragment has been seen, so an
    /// explicit header observed later always overrides it.
    pub fn enter_fragment(&mut self, fragment_id: &str, file_map: &FileMap) {
        if let Some(entry) = file_map.get(fragment_id) {
            if self.current_chapter != Some(entry.chapter) {
                tracing::debug!(
                    "file map: {} starts in chapter {}",
                    fragment_id,
                    entry.chapter
                );
            }
            self.current_chapter = Some(entry.chapter);
        }
    }

    /// Explicit headers always win, first or later within the fragment.
    pub fn observe_header(&mut self, chapter: u32) {
        if self.current_chapter != Some(chapter) {
            tracing::debug!(
                "chapter cursor: {:?} -> {}",
                self.current_chapter,
                chapter
            );
        }
        self.current_chapter = Some(chapter);
    }

    /// Unrecognized header text: warn, keep the previous chapter value.
    pub fn observe_unresolved_header(&mut self, fragment_id: &str, text: &str) {
        tracing::warn!("{}: unrecognized chapter header: {}", fragment_id, text);
        self.warnings.push(ParseWarning {
            fragment_id: fragment_id.to_string(),
            reason: format!("unrecognized chapter header: {}", text),
        });
    }
}

/// A verse being accumulated. The chapter is frozen at open time and is
/// not re-evaluated even if the cursor moves before the verse closes.
#[derive(Debug)]
struct VerseInProgress {
    fragment_id: String,
    chapter: Option<u32>,
    designator: Option<String>,
    sanskrit: Vec<String>,
    glosses: Vec<String>,
    translation: Vec<String>,
    commentary: Vec<String>,
}

impl VerseInProgress {
    fn open(fragment_id: &str, chapter: Option<u32>, designator: Option<String>) -> Self {
        VerseInProgress {
            fragment_id: fragment_id.to_string(),
            chapter,
            designator,
            sanskrit: Vec::new(),
            glosses: Vec::new(),
            translation: Vec::new(),
            commentary: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct AssemblyOutput {
    pub verses: Vec<CanonicalVerse>,
    pub warnings: Vec<ParseWarning>,
    pub failures: Vec<ExtractionFailure>,
}

/// Merges per-fragment segment streams with the chapter cursor into
/// finalized records. Strictly sequential; segments must arrive in
/// document order, fragments in corpus order.
pub struct VerseAssembler {
    book_code: String,
    ctx: ParserContext,
    fragment_id: String,
    open: Option<VerseInProgress>,
    verses: Vec<CanonicalVerse>,
    failures: Vec<ExtractionFailure>,
    // Fallback numbering for verses that carry no label, kept in sync
    // with explicit designators as they pass.
    verse_counter: HashMap<u32, u32>,
}

impl VerseAssembler {
    pub fn new(book_code: &str) -> Self {
        VerseAssembler {
            book_code: book_code.to_string(),
            ctx: ParserContext::new(),
            fragment_id: String::new(),
            open: None,
            verses: Vec::new(),
            failures: Vec::new(),
            verse_counter: HashMap::new(),
        }
    }

    /// Consume one fragment's segments. Closes any verse still open at
    /// the fragment boundary.
    pub fn process_fragment(
        &mut self,
        fragment_id: &str,
        segments: &[Segment],
        file_map: &FileMap,
    ) {
        self.fragment_id = fragment_id.to_string();
        self.ctx.enter_fragment(fragment_id, file_map);

        for segment in segments {
            match &segment.kind {
                SegmentKind::ChapterHeader(n) => self.ctx.observe_header(*n),
                SegmentKind::UnresolvedChapterHeader => {
                    self.ctx
                        .observe_unresolved_header(fragment_id, &segment.text);
                }
                SegmentKind::VerseLabel => {
                    self.open_verse(Some(segment.text.clone()));
                }
                SegmentKind::Sanskrit => {
                    // Sanskrit after a completed translation starts the
                    // next verse; otherwise it accumulates.
                    let start_new = match &self.open {
                        Some(v) => !v.translation.is_empty(),
                        None => true,
                    };
                    if start_new {
                        self.open_verse(None);
                    }
                    if let Some(v) = self.open.as_mut() {
                        v.sanskrit.push(segment.text.clone());
                    }
                }
                SegmentKind::Glosses => {
                    if let Some(v) = self.open.as_mut() {
                        v.glosses.push(segment.text.clone());
                    }
                }
                SegmentKind::Translation => {
                    let start_new = match &self.open {
                        Some(v) => !v.translation.is_empty(),
                        None => true,
                    };
                    if start_new {
                        self.open_verse(None);
                    }
                    if let Some(v) = self.open.as_mut() {
                        v.translation.push(segment.text.clone());
                    }
                }
                SegmentKind::Commentary => {
                    if let Some(v) = self.open.as_mut() {
                        v.commentary.push(segment.text.clone());
                    }
                }
            }
        }

        self.close_open();
    }

    pub fn finish(mut self) -> AssemblyOutput {
        self.close_open();
        AssemblyOutput {
            verses: self.verses,
            warnings: self.ctx.warnings,
            failures: self.failures,
        }
    }

    /// Open a verse-in-progress, stamping it with the chapter the
    /// cursor holds at this exact moment.
    fn open_verse(&mut self, designator: Option<String>) {
        self.close_open();
        self.open = Some(VerseInProgress::open(
            &self.fragment_id,
            self.ctx.current_chapter,
            designator,
        ));
    }

    fn close_open(&mut self) {
        let Some(v) = self.open.take() else {
            return;
        };

        let translation = v.translation.join(" ");
        if translation.trim().is_empty() {
            tracing::warn!(
                "{}: dropping verse {:?} without translation",
                v.fragment_id,
                v.designator
            );
            self.failures.push(ExtractionFailure {
                fragment_id: v.fragment_id,
                chapter: v.chapter,
                designator: v.designator,
                reason: "no translation before next verse".to_string(),
            });
            return;
        }

        let Some(chapter) = v.chapter else {
            tracing::warn!(
                "{}: dropping verse {:?}, chapter could not be attributed",
                v.fragment_id,
                v.designator
            );
            self.failures.push(ExtractionFailure {
                fragment_id: v.fragment_id,
                chapter: None,
                designator: v.designator,
                reason: "chapter unresolved at verse open".to_string(),
            });
            return;
        };

        let designator = match v.designator {
            Some(d) => {
                // Keep the fallback counter in step with explicit labels.
                if let Some(&last) = designator_numbers(&d).last() {
                    self.verse_counter.insert(chapter, last);
                }
                d
            }
            None => {
                let counter = self.verse_counter.entry(chapter).or_insert(0);
                *counter += 1;
                counter.to_string()
            }
        };

        let sanskrit = v.sanskrit.join("\n");
        let glosses = v.glosses.join(" ");
        let commentary = v.commentary.join("\n");

        let payload = CanonicalPayload::new(
            &self.book_code,
            chapter,
            &designator,
            Some(&sanskrit),
            Some(&glosses),
            &translation,
            Some(&commentary),
        );
        let fingerprint = payload.fingerprint();

        let verse = CanonicalVerse {
            book_code: payload.book_code.clone(),
            chapter,
            designator,
            sanskrit: if sanskrit.is_empty() { None } else { Some(sanskrit) },
            glosses: if glosses.is_empty() { None } else { Some(glosses) },
            translation,
            commentary: if commentary.is_empty() { None } else { Some(commentary) },
            fingerprint,
        };
        tracing::debug!("finalized {}", verse.verse_ref());
        self.verses.push(verse);
    }
}
