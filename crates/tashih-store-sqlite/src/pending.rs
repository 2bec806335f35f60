//! [`SqlitePendingStore`] — pending corrections in SQLite.

use std::path::Path;

use rusqlite::OptionalExtension as _;
use tashih_core::{correction::Correction, store::PendingStore};

use crate::{
  Error, Result, connect,
  encode::{CORRECTION_COLUMNS, correction_from_row},
  schema,
};

/// The queue of corrections awaiting review.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqlitePendingStore {
  conn: tokio_rusqlite::Connection,
}

impl SqlitePendingStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    Ok(Self { conn: connect::open(path, schema::PENDING).await? })
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    Ok(Self { conn: connect::open_in_memory(schema::PENDING).await? })
  }

  /// Add (or replace) a pending correction.
  ///
  /// Submission happens outside this system; this exists for seeding and
  /// tests.
  pub async fn insert(&self, correction: Correction) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR REPLACE INTO corrections (id, urn, attr, val, comment, submitted_by)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            correction.id,
            correction.urn,
            correction.attr,
            correction.val,
            correction.comment,
            correction.submitted_by,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

impl PendingStore for SqlitePendingStore {
  type Error = Error;

  async fn scan(&self, limit: usize) -> Result<Vec<Correction>> {
    let limit_val = i64::try_from(limit).unwrap_or(i64::MAX);

    let rows = self
      .conn
      .call(move |conn| {
        // No ORDER BY: enumeration order is whatever SQLite yields.
        let mut stmt = conn
          .prepare(&format!("SELECT {CORRECTION_COLUMNS} FROM corrections LIMIT ?1"))?;
        let rows = stmt
          .query_map(rusqlite::params![limit_val], correction_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(rows)
  }

  async fn get(&self, id: &str) -> Result<Option<Correction>> {
    let id = id.to_owned();

    let row = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {CORRECTION_COLUMNS} FROM corrections WHERE id = ?1"),
            rusqlite::params![id],
            correction_from_row,
          )
          .optional()?)
      })
      .await?;

    Ok(row)
  }

  async fn delete(&self, id: &str) -> Result<()> {
    let key = id.to_owned();

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM corrections WHERE id = ?1", rusqlite::params![key])?)
      })
      .await?;

    if removed == 0 {
      tracing::debug!(id, "delete of absent pending correction");
    }
    Ok(())
  }
}
