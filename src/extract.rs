use lazy_static::lazy_static;
use regex::Regex;

use crate::helpers::{chapter_markers, parse_designator, strip_markup};
use crate::types::{Segment, SegmentKind};

lazy_static! {
    // The corpus markup is flat inside verse blocks; the non-greedy body
    // stops at the first closing div, which is the block's own.
    static ref RE_CLASS_DIV: Regex =
        Regex::new(r#"(?is)<div[^>]*class="([^"]*)"[^>]*>(.*?)</div>"#).unwrap();

    static ref RE_BOLD: Regex = Regex::new(r"(?is)<b[^>]*>(.*?)</b>").unwrap();
}

/// Marker classes for the verse block kinds found in the corpus markup.
/// Class names carry styling suffixes (verse-trs1, verse-trs4, purport2),
/// so recognition is by prefix match within the class attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Sanskrit,    // verse-trs*
    Glosses,     // word-mean*
    Translation, // data-trs*
    Commentary,  // purport*
    VerseLabel,  // verse-text*
    Heading,     // verse-hed* (TRANSLATION / PURPORT section headings)
}

fn classify_block(class_attr: &str) -> Option<BlockKind> {
    if class_attr.contains("verse-trs") {
        Some(BlockKind::Sanskrit)
    } else if class_attr.contains("word-mean") {
        Some(BlockKind::Glosses)
    } else if class_attr.contains("data-trs") {
        Some(BlockKind::Translation)
    } else if class_attr.contains("verse-text") {
        Some(BlockKind::VerseLabel)
    } else if class_attr.contains("verse-hed") {
        Some(BlockKind::Heading)
    } else if class_attr.contains("purport") {
        Some(BlockKind::Commentary)
    } else {
        None
    }
}

#[derive(Debug)]
enum Event {
    Block { kind: BlockKind, inner: String },
    Chapter { payload: String, number: Option<u32> },
}

/// Scan one fragment's raw markup and produce its ordered segment stream.
///
/// Chapter markers are bare text like "CHAPTER ELEVEN" or "Chapter 11"
/// outside any recognized verse block; markers inside a block are prose
/// mentioning another chapter and must not move the chapter cursor.
/// Unrecognized markup is ignored.
pub fn extract_segments(raw: &str) -> Vec<Segment> {
    let mut events: Vec<(usize, Event)> = Vec::new();
    let mut recognized_spans: Vec<(usize, usize)> = Vec::new();

    for caps in RE_CLASS_DIV.captures_iter(raw) {
        let whole = caps.get(0).expect("capture 0 always present");
        let class_attr = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let Some(kind) = classify_block(class_attr) else {
            continue;
        };
        recognized_spans.push((whole.start(), whole.end()));
        events.push((
            whole.start(),
            Event::Block {
                kind,
                inner: caps.get(2).map(|m| m.as_str()).unwrap_or("").to_string(),
            },
        ));
    }

    for (pos, payload, number) in chapter_markers(raw) {
        let inside_block = recognized_spans
            .iter()
            .any(|&(start, end)| pos >= start && pos < end);
        if !inside_block {
            events.push((pos, Event::Chapter { payload, number }));
        }
    }

    // Document order decides everything downstream; sort by byte offset.
    events.sort_by_key(|&(pos, _)| pos);

    let mut segments: Vec<Segment> = Vec::new();
    // Set when a TRANSLATION section heading announces that the next
    // commentary block carries the translation in its bold run.
    let mut expecting_translation = false;

    for (_, event) in events {
        match event {
            Event::Chapter { payload, number } => match number {
                Some(n) => segments.push(Segment::new(SegmentKind::ChapterHeader(n), payload)),
                None => segments.push(Segment::new(SegmentKind::UnresolvedChapterHeader, payload)),
            },
            Event::Block { kind, inner } => match kind {
                BlockKind::Heading => {
                    let text = strip_markup(&inner);
                    if text.to_uppercase().contains("TRANSLATION") {
                        expecting_translation = true;
                    }
                }
                BlockKind::Commentary if expecting_translation => {
                    expecting_translation = false;
                    let (translation, rest) = split_bold_translation(&inner);
                    if !translation.is_empty() {
                        segments.push(Segment::new(SegmentKind::Translation, translation));
                    }
                    if !rest.is_empty() {
                        segments.push(Segment::new(SegmentKind::Commentary, rest));
                    }
                }
                BlockKind::Commentary => {
                    let text = strip_markup(&inner);
                    if !text.is_empty() {
                        segments.push(Segment::new(SegmentKind::Commentary, text));
                    }
                }
                BlockKind::VerseLabel => {
                    let text = strip_markup(&inner);
                    if let Some(designator) = parse_designator(&text) {
                        segments.push(Segment::new(SegmentKind::VerseLabel, designator));
                    }
                }
                BlockKind::Sanskrit => {
                    let text = strip_markup(&inner);
                    if !text.is_empty() {
                        segments.push(Segment::new(SegmentKind::Sanskrit, text));
                    }
                }
                BlockKind::Glosses => {
                    let text = strip_markup(&inner);
                    if !text.is_empty() {
                        segments.push(Segment::new(SegmentKind::Glosses, text));
                    }
                }
                BlockKind::Translation => {
                    // A regular translation block satisfies a pending
                    // TRANSLATION heading.
                    expecting_translation = false;
                    let text = strip_markup(&inner);
                    if !text.is_empty() {
                        segments.push(Segment::new(SegmentKind::Translation, text));
                    }
                }
            },
        }
    }

    segments
}

/// Some verses carry the translation as the bold run of a commentary
/// block that follows a TRANSLATION heading. Returns (translation, rest).
fn split_bold_translation(inner: &str) -> (String, String) {
    let bold_parts: Vec<String> = RE_BOLD
        .captures_iter(inner)
        .filter_map(|caps| {
            let text = strip_markup(caps.get(1)?.as_str());
            if text.is_empty() { None } else { Some(text) }
        })
        .collect();

    let rest = strip_markup(&RE_BOLD.replace_all(inner, " "));
    (bold_parts.join(" "), rest)
}
