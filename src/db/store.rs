use anyhow::Result;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Integer, Nullable, Text};
use serde::Serialize;

use crate::db::DatabaseHandle;
use crate::db::models::{NewVerseRecord, VerseRecord};
use crate::db::schema::verses;
use crate::types::CanonicalVerse;
use crate::verify::VerificationReport;

/// Whether a batch may be committed when verification failed. Rejecting
/// or forcing a failed run is the caller's decision, not the store's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitPolicy {
    RequireVerified,
    Force,
}

/// Same fingerprint, different payload: the write for that record is
/// rejected, the rest of the batch proceeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteConflict {
    pub fingerprint: String,
    pub verse_ref: String,
}

#[derive(Debug, Default, Serialize)]
pub struct CommitOutcome {
    pub committed: bool,
    pub inserted: usize,
    /// Records already present with an identical payload (idempotent rerun).
    pub unchanged: usize,
    pub conflicts: Vec<WriteConflict>,
}

/// Commit a verified batch to the store and its search index.
///
/// The whole batch runs in one transaction: either every accepted
/// record lands in both `verses` and `verses_fts`, or nothing does.
/// Inserts are keyed by content fingerprint, so re-running an identical
/// ingestion is a no-op.
pub fn commit_verses(
    handle: &DatabaseHandle,
    batch: &[CanonicalVerse],
    report: &VerificationReport,
    policy: CommitPolicy,
) -> Result<CommitOutcome> {
    if policy == CommitPolicy::RequireVerified && !report.passed {
        tracing::warn!(
            "commit rejected: verification failed ({} deltas, {} duplicates)",
            report.deltas.len(),
            report.duplicate_fingerprints.len()
        );
        return Ok(CommitOutcome::default());
    }

    let outcome = handle.do_write(|conn| {
        conn.transaction::<CommitOutcome, diesel::result::Error, _>(|conn| {
            let mut outcome = CommitOutcome {
                committed: true,
                ..Default::default()
            };

            for verse in batch {
                let existing: Option<VerseRecord> = verses::table
                    .filter(verses::content_hash.eq(&verse.fingerprint))
                    .first(conn)
                    .optional()?;

                match existing {
                    Some(record) if record.same_payload(verse) => {
                        outcome.unchanged += 1;
                    }
                    Some(_) => {
                        tracing::warn!("store conflict for {}", verse.verse_ref());
                        outcome.conflicts.push(WriteConflict {
                            fingerprint: verse.fingerprint.clone(),
                            verse_ref: verse.verse_ref(),
                        });
                    }
                    None => {
                        let id: i32 = diesel::insert_into(verses::table)
                            .values(NewVerseRecord::from_canonical(verse))
                            .returning(verses::id)
                            .get_result(conn)?;
                        index_verse(conn, id, verse)?;
                        outcome.inserted += 1;
                    }
                }
            }

            Ok(outcome)
        })
    })?;

    tracing::info!(
        "commit: {} inserted, {} unchanged, {} conflicts",
        outcome.inserted,
        outcome.unchanged,
        outcome.conflicts.len()
    );
    Ok(outcome)
}

/// Mirror one committed row into the FTS index, inside the caller's
/// transaction, so the index can never diverge from the primary table.
fn index_verse(
    conn: &mut SqliteConnection,
    verse_id: i32,
    verse: &CanonicalVerse,
) -> Result<usize, diesel::result::Error> {
    sql_query(
        r#"
        INSERT INTO verses_fts (verse_id, book_code, chapter, verse, sanskrit, translation, purport)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind::<Integer, _>(verse_id)
    .bind::<Text, _>(&verse.book_code)
    .bind::<Integer, _>(verse.chapter as i32)
    .bind::<Text, _>(&verse.designator)
    .bind::<Nullable<Text>, _>(verse.sanskrit.as_deref())
    .bind::<Text, _>(&verse.translation)
    .bind::<Nullable<Text>, _>(verse.commentary.as_deref())
    .execute(conn)
}

/// Keyword search over the committed verses.
pub fn search_verses(
    handle: &DatabaseHandle,
    query: &str,
    limit: usize,
) -> Result<Vec<VerseRecord>> {
    // NOTE: 'ORDER BY rank' is very slow. Ordering by id gives
    // predictable results for the same query.
    handle.do_read(|conn| {
        sql_query(
            r#"
            SELECT s.*
            FROM verses_fts f
            JOIN verses s ON f.verse_id = s.id
            WHERE verses_fts MATCH ?
            ORDER BY s.id
            LIMIT ?
            "#,
        )
        .bind::<Text, _>(query)
        .bind::<BigInt, _>(limit as i64)
        .load(conn)
    })
}

/// All rows for one book in chapter and rowid order.
pub fn load_book(handle: &DatabaseHandle, book_code: &str) -> Result<Vec<VerseRecord>> {
    handle.do_read(|conn| {
        verses::table
            .filter(verses::book_code.eq(book_code))
            .order((verses::chapter.asc(), verses::id.asc()))
            .load(conn)
    })
}
