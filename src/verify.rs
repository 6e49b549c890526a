use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Serialize, Deserialize};

use crate::helpers::designator_numbers;
use crate::types::CanonicalVerse;

/// Ground-truth expected verse counts, per chapter and in total.
/// Immutable run configuration; passed by reference, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountTable {
    pub expected_total: u32,
    pub per_chapter: BTreeMap<u32, u32>,
}

impl CountTable {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse count table JSON")
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read count table: {:?}", path))?;
        Self::from_json(&json)
    }

    /// The standard Gita structure: 700 verses across 18 chapters.
    pub fn gita() -> Self {
        let counts: [(u32, u32); 18] = [
            (1, 46),
            (2, 72),
            (3, 43),
            (4, 42),
            (5, 29),
            (6, 47),
            (7, 30),
            (8, 28),
            (9, 34),
            (10, 42),
            (11, 55),
            (12, 20),
            (13, 35),
            (14, 27),
            (15, 20),
            (16, 24),
            (17, 28),
            (18, 78),
        ];
        CountTable {
            expected_total: counts.iter().map(|&(_, n)| n).sum(),
            per_chapter: counts.into_iter().collect(),
        }
    }
}

/// One per-chapter count mismatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountDelta {
    pub chapter: u32,
    pub expected: u32,
    pub found: u32,
}

/// Outcome of a run, computed once after assembly. Always returned,
/// never thrown; acting on a failing report is the caller's policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    pub total: u32,
    pub expected_total: u32,
    pub per_chapter: BTreeMap<u32, u32>,
    pub deltas: Vec<CountDelta>,
    pub duplicate_fingerprints: Vec<String>,
    /// Verse numbers not covered by any designator, per chapter.
    /// Ranged designators cover every number in the range.
    pub missing: BTreeMap<u32, Vec<u32>>,
    pub passed: bool,
}

/// Compare assembled records against the canonical count table.
/// A ranged designator counts once; a duplicate fingerprint means a
/// semantic duplicate slipped through assembly.
pub fn verify(verses: &[CanonicalVerse], table: &CountTable) -> VerificationReport {
    let mut per_chapter: BTreeMap<u32, u32> = BTreeMap::new();
    let mut covered: BTreeMap<u32, HashSet<u32>> = BTreeMap::new();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut duplicate_fingerprints: Vec<String> = Vec::new();

    for verse in verses {
        *per_chapter.entry(verse.chapter).or_insert(0) += 1;
        covered
            .entry(verse.chapter)
            .or_default()
            .extend(designator_numbers(&verse.designator));
        if !seen.insert(&verse.fingerprint) {
            duplicate_fingerprints.push(verse.fingerprint.clone());
        }
    }

    let total = verses.len() as u32;

    let mut deltas: Vec<CountDelta> = Vec::new();
    for (&chapter, &expected) in &table.per_chapter {
        let found = per_chapter.get(&chapter).copied().unwrap_or(0);
        if found != expected {
            deltas.push(CountDelta { chapter, expected, found });
        }
    }
    // Chapters present in the data but absent from the table are also
    // mismatches.
    for (&chapter, &found) in &per_chapter {
        if !table.per_chapter.contains_key(&chapter) {
            deltas.push(CountDelta { chapter, expected: 0, found });
        }
    }
    deltas.sort_by_key(|d| d.chapter);

    let mut missing: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
    for (&chapter, &expected) in &table.per_chapter {
        let chapter_covered = covered.get(&chapter);
        let absent: Vec<u32> = (1..=expected)
            .filter(|n| chapter_covered.map_or(true, |c| !c.contains(n)))
            .collect();
        if !absent.is_empty() {
            missing.insert(chapter, absent);
        }
    }

    let passed =
        total == table.expected_total && deltas.is_empty() && duplicate_fingerprints.is_empty();

    if passed {
        tracing::info!("verification passed: {} verses", total);
    } else {
        tracing::warn!(
            "verification failed: {}/{} verses, {} chapter deltas, {} duplicates",
            total,
            table.expected_total,
            deltas.len(),
            duplicate_fingerprints.len()
        );
    }

    VerificationReport {
        total,
        expected_total: table.expected_total,
        per_chapter,
        deltas,
        duplicate_fingerprints,
        missing,
        passed,
    }
}
