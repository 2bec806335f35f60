//! Integration tests for the SQLite stores against in-memory databases.

use std::sync::Arc;

use chrono::{TimeZone as _, Utc};
use tashih_core::{
  Resolution, Resolver,
  correction::{ArchivedCorrection, Correction},
  store::{ArchiveStore, CanonicalStore, PendingStore},
};

use crate::{SqliteArchiveStore, SqliteCanonicalStore, SqlitePendingStore};

fn correction(id: &str, urn: i64) -> Correction {
  Correction {
    id:           id.into(),
    urn,
    attr:         "hadithText".into(),
    val:          "old".into(),
    comment:      "".into(),
    submitted_by: "submitter".into(),
  }
}

// ─── Pending ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn pending_insert_and_get() {
  let s = SqlitePendingStore::open_in_memory().await.unwrap();
  s.insert(correction("1", 10)).await.unwrap();

  assert_eq!(s.get("1").await.unwrap(), Some(correction("1", 10)));
  assert!(s.get("2").await.unwrap().is_none());
}

#[tokio::test]
async fn pending_scan_respects_limit() {
  let s = SqlitePendingStore::open_in_memory().await.unwrap();
  for i in 0..5 {
    s.insert(correction(&i.to_string(), i)).await.unwrap();
  }

  assert_eq!(s.scan(1).await.unwrap().len(), 1);
  assert_eq!(s.scan(3).await.unwrap().len(), 3);
  assert_eq!(s.scan(100).await.unwrap().len(), 5);
  assert!(s.scan(0).await.unwrap().is_empty());
}

#[tokio::test]
async fn pending_delete_is_idempotent() {
  let s = SqlitePendingStore::open_in_memory().await.unwrap();
  s.insert(correction("1", 10)).await.unwrap();

  s.delete("1").await.unwrap();
  s.delete("1").await.unwrap();
  s.delete("never-existed").await.unwrap();
  assert!(s.get("1").await.unwrap().is_none());
}

// ─── Archive ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn archive_put_and_get_preserves_fields() {
  let s = SqliteArchiveStore::open_in_memory().await.unwrap();
  let record = ArchivedCorrection::from_pending(
    correction("1", 10),
    Some("fixed"),
    "reviewer",
    Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
    true,
  );

  s.put(&record).await.unwrap();
  assert_eq!(s.get("1").await.unwrap(), Some(record));
  assert!(s.get("2").await.unwrap().is_none());
}

#[tokio::test]
async fn archive_put_replaces_same_id() {
  let s  = SqliteArchiveStore::open_in_memory().await.unwrap();
  let at = Utc::now();

  let first = ArchivedCorrection::from_pending(correction("1", 10), None, "a", at, false);
  let second = ArchivedCorrection::from_pending(correction("1", 10), Some("x"), "b", at, true);
  s.put(&first).await.unwrap();
  s.put(&second).await.unwrap();

  let stored = s.get("1").await.unwrap().unwrap();
  assert_eq!(stored.modified_by, "b");
  assert!(stored.approved);
}

// ─── Canonical ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn canonical_update_reports_rows_affected() {
  let s = SqliteCanonicalStore::open_in_memory().await.unwrap();
  s.insert_row(7, "before").await.unwrap();

  assert_eq!(s.update_if_exists(7, "after").await.unwrap(), 1);
  assert_eq!(s.text_for(7).await.unwrap().as_deref(), Some("after"));

  assert_eq!(s.update_if_exists(8, "nothing").await.unwrap(), 0);
  assert!(s.text_for(8).await.unwrap().is_none());
}

#[tokio::test]
async fn canonical_update_to_same_text_still_counts() {
  let s = SqliteCanonicalStore::open_in_memory().await.unwrap();
  s.insert_row(7, "same").await.unwrap();
  assert_eq!(s.update_if_exists(7, "same").await.unwrap(), 1);
}

// ─── Resolution end to end ───────────────────────────────────────────────────

struct Stores {
  pending:   Arc<SqlitePendingStore>,
  archive:   Arc<SqliteArchiveStore>,
  canonical: Arc<SqliteCanonicalStore>,
}

async fn stores() -> Stores {
  Stores {
    pending:   Arc::new(SqlitePendingStore::open_in_memory().await.unwrap()),
    archive:   Arc::new(SqliteArchiveStore::open_in_memory().await.unwrap()),
    canonical: Arc::new(SqliteCanonicalStore::open_in_memory().await.unwrap()),
  }
}

fn resolver(s: &Stores) -> Resolver<SqlitePendingStore, SqliteArchiveStore, SqliteCanonicalStore> {
  Resolver::new(s.pending.clone(), s.archive.clone(), s.canonical.clone())
}

#[tokio::test]
async fn approve_moves_correction_and_rewrites_text() {
  let s = stores().await;
  s.pending.insert(correction("42", 7)).await.unwrap();
  s.canonical.insert_row(7, "old text").await.unwrap();

  let outcome = resolver(&s)
    .resolve("42", "reviewer", Some("approve"), Some("new text"))
    .await;
  assert!(outcome.is_success(), "{outcome:?}");

  assert_eq!(s.canonical.text_for(7).await.unwrap().as_deref(), Some("new text"));
  assert!(s.pending.get("42").await.unwrap().is_none());

  let archived = s.archive.get("42").await.unwrap().unwrap();
  assert!(archived.approved);
  assert_eq!(archived.val, "new text");
  assert_eq!(archived.modified_by, "reviewer");
}

#[tokio::test]
async fn reject_moves_correction_without_touching_text() {
  let s = stores().await;
  s.pending.insert(correction("42", 7)).await.unwrap();
  s.canonical.insert_row(7, "old text").await.unwrap();

  let outcome = resolver(&s).resolve("42", "reviewer", Some("delete"), None).await;
  assert_eq!(outcome, Resolution::Success("Success".into()));

  assert_eq!(s.canonical.text_for(7).await.unwrap().as_deref(), Some("old text"));
  assert!(s.pending.get("42").await.unwrap().is_none());

  let archived = s.archive.get("42").await.unwrap().unwrap();
  assert!(!archived.approved);
  assert_eq!(archived.val, "old");
}

#[tokio::test]
async fn approve_with_stale_urn_keeps_correction_pending() {
  let s = stores().await;
  s.pending.insert(correction("42", 404)).await.unwrap();

  let outcome = resolver(&s).resolve("42", "reviewer", Some("approve"), Some("x")).await;
  assert_eq!(outcome, Resolution::Failure("Failed to update hadith text".into()));

  assert_eq!(s.pending.get("42").await.unwrap(), Some(correction("42", 404)));
  assert!(s.archive.get("42").await.unwrap().is_none());
}
