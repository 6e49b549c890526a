use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Serialize, Deserialize};

/// Static hint: which chapter a fragment is expected to start in.
/// Fallback data only; an explicit chapter header always wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMapEntry {
    pub fragment_id: String,
    pub chapter: u32,
    #[serde(default)]
    pub note: Option<String>,
}

impl FileMapEntry {
    fn new(fragment_id: &str, chapter: u32, note: &str) -> Self {
        FileMapEntry {
            fragment_id: fragment_id.to_string(),
            chapter,
            note: if note.is_empty() { None } else { Some(note.to_string()) },
        }
    }
}

/// Immutable fragment-id lookup, loaded once per run. Absence of an
/// entry is not an error; it only disables the fallback transition for
/// that fragment.
#[derive(Debug, Clone, Default)]
pub struct FileMap {
    entries: HashMap<String, FileMapEntry>,
}

impl FileMap {
    pub fn new(entries: Vec<FileMapEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|e| (e.fragment_id.clone(), e))
            .collect();
        FileMap { entries }
    }

    pub fn get(&self, fragment_id: &str) -> Option<&FileMapEntry> {
        self.entries.get(fragment_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<FileMapEntry> =
            serde_json::from_str(json).context("Failed to parse file map JSON")?;
        Ok(Self::new(entries))
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file map: {:?}", path))?;
        Self::from_json(&json)
    }

    /// Fragment map for the 1972-edition Bhagavad-gita container. Several
    /// fragments span chapter boundaries; the entry gives the chapter the
    /// fragment starts in, and in-fragment headers take over from there.
    pub fn gita_1972() -> Self {
        let entries = vec![
            FileMapEntry::new("text/part0005.html", 1, "Chapter 1 title page"),
            FileMapEntry::new("text/part0013.html", 1, ""),
            FileMapEntry::new("text/part0014.html", 2, ""),
            FileMapEntry::new("text/part0015.html", 2, "contains 2.35 onwards"),
            FileMapEntry::new("text/part0016.html", 3, ""),
            FileMapEntry::new("text/part0017.html", 4, ""),
            FileMapEntry::new("text/part0018.html", 5, ""),
            FileMapEntry::new("text/part0019.html", 6, ""),
            FileMapEntry::new("text/part0020.html", 7, ""),
            FileMapEntry::new("text/part0021.html", 7, ""),
            FileMapEntry::new("text/part0022.html", 7, ""),
            FileMapEntry::new("text/part0023.html", 8, ""),
            FileMapEntry::new("text/part0024.html", 9, ""),
            FileMapEntry::new("text/part0025.html", 10, ""),
            FileMapEntry::new("text/part0026.html", 11, "chapter 11 title page has no header text"),
            FileMapEntry::new("text/part0027.html", 12, ""),
            FileMapEntry::new("text/part0028.html", 13, ""),
            FileMapEntry::new("text/part0029.html", 14, ""),
            FileMapEntry::new("text/part0030.html", 15, ""),
            FileMapEntry::new("text/part0031.html", 16, "chapter 16 title page"),
            FileMapEntry::new("text/part0032.html", 15, "tail of chapter 15, verse 20"),
            FileMapEntry::new("text/part0033.html", 16, "contains chapters 16 and 18"),
            FileMapEntry::new("text/part0034.html", 17, ""),
            FileMapEntry::new("text/part0035.html", 11, "contains chapters 11 and 18"),
            FileMapEntry::new("text/part0036.html", 18, ""),
        ];
        Self::new(entries)
    }
}
