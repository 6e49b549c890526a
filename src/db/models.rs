use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::db::schema::verses;
use crate::types::CanonicalVerse;

// Queryable struct for reading records. QueryableByName is needed for
// the raw FTS join queries.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable, Identifiable, PartialEq)]
#[diesel(table_name = verses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct VerseRecord {
    pub id: i32,
    pub book_code: String,
    pub chapter: i32,
    pub verse: String,
    pub sanskrit: Option<String>,
    pub synonyms: Option<String>,
    pub translation: String,
    pub purport: Option<String>,
    pub content_hash: String,
    pub created_at: NaiveDateTime,
}

impl VerseRecord {
    /// True when the stored row carries the same logical content as the
    /// assembled record. A false result under an equal content_hash is a
    /// write conflict.
    pub fn same_payload(&self, v: &CanonicalVerse) -> bool {
        self.book_code == v.book_code
            && self.chapter == v.chapter as i32
            && self.verse == v.designator
            && self.sanskrit.as_deref() == v.sanskrit.as_deref()
            && self.synonyms.as_deref() == v.glosses.as_deref()
            && self.translation == v.translation
            && self.purport.as_deref() == v.commentary.as_deref()
    }
}

// Insertable struct for creating new records
#[derive(Insertable)]
#[diesel(table_name = verses)]
pub struct NewVerseRecord<'a> {
    pub book_code: &'a str,
    pub chapter: i32,
    pub verse: &'a str,
    pub sanskrit: Option<&'a str>,
    pub synonyms: Option<&'a str>,
    pub translation: &'a str,
    pub purport: Option<&'a str>,
    pub content_hash: &'a str,
}

impl<'a> NewVerseRecord<'a> {
    pub fn from_canonical(v: &'a CanonicalVerse) -> Self {
        NewVerseRecord {
            book_code: &v.book_code,
            chapter: v.chapter as i32,
            verse: &v.designator,
            sanskrit: v.sanskrit.as_deref(),
            synonyms: v.glosses.as_deref(),
            translation: &v.translation,
            purport: v.commentary.as_deref(),
            content_hash: &v.fingerprint,
        }
    }
}
