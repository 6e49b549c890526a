mod helpers;
use helpers as h;

use serial_test::serial;
use tempfile::TempDir;

use vedabase::db::DatabaseHandle;
use vedabase::db::store::{self, CommitPolicy};
use vedabase::ingest::run_ingest;
use vedabase::ingest::IngestOutput;
use vedabase::verify;

fn open_temp_store() -> (TempDir, DatabaseHandle) {
    vedabase::logger::init();
    let dir = TempDir::new().expect("create temp dir");
    let handle = DatabaseHandle::open(&dir.path().join("vedabase.sqlite3"))
        .expect("open verse store");
    (dir, handle)
}

fn ingest_fixture() -> IngestOutput {
    let (corpus, map, table) = h::two_chapter_corpus();
    run_ingest(vedabase::GITA_BOOK_CODE, &corpus, &map, &table).unwrap()
}

#[test]
#[serial]
fn test_commit_writes_store_and_index_together() {
    let (_dir, handle) = open_temp_store();
    let out = ingest_fixture();

    let outcome =
        store::commit_verses(&handle, &out.verses, &out.report, CommitPolicy::RequireVerified)
            .unwrap();
    assert!(outcome.committed);
    assert_eq!(outcome.inserted, 5);
    assert_eq!(outcome.unchanged, 0);
    assert!(outcome.conflicts.is_empty());

    let rows = store::load_book(&handle, "BG").unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0].chapter, 1);
    assert_eq!(rows[0].verse, "1");

    // The index is in lockstep: every committed row is searchable.
    let hits = store::search_verses(&handle, "\"chapter two\"", 10).unwrap();
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|r| r.chapter == 2));
}

#[test]
#[serial]
fn test_recommit_is_idempotent() {
    let (_dir, handle) = open_temp_store();
    let out = ingest_fixture();

    store::commit_verses(&handle, &out.verses, &out.report, CommitPolicy::RequireVerified)
        .unwrap();
    let second =
        store::commit_verses(&handle, &out.verses, &out.report, CommitPolicy::RequireVerified)
            .unwrap();

    assert!(second.committed);
    assert_eq!(second.inserted, 0);
    assert_eq!(second.unchanged, 5);
    assert!(second.conflicts.is_empty());

    assert_eq!(store::load_book(&handle, "BG").unwrap().len(), 5);
}

#[test]
#[serial]
fn test_conflicting_payload_is_rejected_without_overwrite() {
    let (_dir, handle) = open_temp_store();
    let out = ingest_fixture();

    store::commit_verses(&handle, &out.verses, &out.report, CommitPolicy::RequireVerified)
        .unwrap();

    // Same fingerprint, tampered payload: must be reported, not written.
    let mut tampered = out.verses.clone();
    tampered[0].translation = "A different translation entirely.".to_string();

    let outcome =
        store::commit_verses(&handle, &tampered, &out.report, CommitPolicy::RequireVerified)
            .unwrap();
    assert_eq!(outcome.conflicts.len(), 1);
    assert_eq!(outcome.conflicts[0].fingerprint, out.verses[0].fingerprint);
    assert_eq!(outcome.unchanged, 4);

    // The stored row keeps the original translation.
    let rows = store::load_book(&handle, "BG").unwrap();
    assert_eq!(rows[0].translation, out.verses[0].translation);
}

#[test]
#[serial]
fn test_failed_verification_blocks_commit_unless_forced() {
    let (_dir, handle) = open_temp_store();
    let out = ingest_fixture();

    // Verify against a table the corpus cannot satisfy.
    let bad_table = h::count_table(&[(1, 10)]);
    let failing_report = verify::verify(&out.verses, &bad_table);
    assert!(!failing_report.passed);

    let rejected =
        store::commit_verses(&handle, &out.verses, &failing_report, CommitPolicy::RequireVerified)
            .unwrap();
    assert!(!rejected.committed);
    assert_eq!(rejected.inserted, 0);
    assert!(store::load_book(&handle, "BG").unwrap().is_empty());

    // The caller can explicitly override.
    let forced =
        store::commit_verses(&handle, &out.verses, &failing_report, CommitPolicy::Force).unwrap();
    assert!(forced.committed);
    assert_eq!(forced.inserted, 5);
    assert_eq!(store::load_book(&handle, "BG").unwrap().len(), 5);
}
