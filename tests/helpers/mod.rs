use std::collections::BTreeMap;

use vedabase::file_map::{FileMap, FileMapEntry};
use vedabase::types::Fragment;
use vedabase::verify::CountTable;

/// Markup for one verse in the corpus layout: number label, Sanskrit
/// couplet, word glosses, translation, commentary.
#[allow(dead_code)]
pub fn verse_html(designator: &str, translation: &str) -> String {
    format!(
        r#"
        <div class="verse-text">TEXT {designator}</div>
        <div class="verse-trs4">sanskrit line one {designator}</div>
        <div class="verse-trs5">sanskrit line two {designator}</div>
        <div class="word-mean">word—meaning; another—gloss</div>
        <div class="data-trs">{translation}</div>
        <div class="purport">Commentary for text {designator}.</div>
        "#
    )
}

#[allow(dead_code)]
pub fn chapter_heading(payload: &str) -> String {
    format!(r#"<div class="chapter-title">CHAPTER {payload}</div>"#)
}

#[allow(dead_code)]
pub fn fragment(id: &str, ordinal: usize, body: &str) -> Fragment {
    let raw = format!("<html><body>{}</body></html>", body);
    Fragment::new(id, ordinal, &raw)
}

#[allow(dead_code)]
pub fn file_map(entries: &[(&str, u32)]) -> FileMap {
    FileMap::new(
        entries
            .iter()
            .map(|&(id, chapter)| FileMapEntry {
                fragment_id: id.to_string(),
                chapter,
                note: None,
            })
            .collect(),
    )
}

#[allow(dead_code)]
pub fn count_table(entries: &[(u32, u32)]) -> CountTable {
    let per_chapter: BTreeMap<u32, u32> = entries.iter().copied().collect();
    CountTable {
        expected_total: per_chapter.values().sum(),
        per_chapter,
    }
}

/// A two-fragment corpus: chapter 1 with three verses, chapter 2 with
/// two, the second fragment relying on the file map (it has no header).
#[allow(dead_code)]
pub fn two_chapter_corpus() -> (Vec<Fragment>, FileMap, CountTable) {
    let mut first = chapter_heading("ONE");
    first.push_str(&verse_html("1", "First verse of chapter one."));
    first.push_str(&verse_html("2", "Second verse of chapter one."));
    first.push_str(&verse_html("3", "Third verse of chapter one."));

    let mut second = String::new();
    second.push_str(&verse_html("1", "First verse of chapter two."));
    second.push_str(&verse_html("2", "Second verse of chapter two."));

    let corpus = vec![
        fragment("text/part0001.html", 0, &first),
        fragment("text/part0002.html", 1, &second),
    ];
    let map = file_map(&[("text/part0001.html", 1), ("text/part0002.html", 2)]);
    let table = count_table(&[(1, 3), (2, 2)]);
    (corpus, map, table)
}
