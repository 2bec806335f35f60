//! [`SqliteArchiveStore`] — resolved corrections in SQLite.

use std::path::Path;

use rusqlite::OptionalExtension as _;
use tashih_core::{correction::ArchivedCorrection, store::ArchiveStore};

use crate::{
  Error, Result, connect,
  encode::{RawArchived, encode_dt},
  schema,
};

/// The audit log of approved and rejected corrections.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteArchiveStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteArchiveStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    Ok(Self { conn: connect::open(path, schema::ARCHIVE).await? })
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    Ok(Self { conn: connect::open_in_memory(schema::ARCHIVE).await? })
  }

  /// Retrieve the archived record for `id`, if any.
  pub async fn get(&self, id: &str) -> Result<Option<ArchivedCorrection>> {
    let id = id.to_owned();

    let raw: Option<RawArchived> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT id, urn, attr, val, comment, submitted_by,
                    modified_on, modified_by, approved
             FROM archived_corrections WHERE id = ?1",
            rusqlite::params![id],
            RawArchived::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawArchived::into_archived).transpose()
  }
}

impl ArchiveStore for SqliteArchiveStore {
  type Error = Error;

  async fn put(&self, record: &ArchivedCorrection) -> Result<()> {
    let record      = record.clone();
    let modified_on = encode_dt(record.modified_on);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR REPLACE INTO archived_corrections (
             id, urn, attr, val, comment, submitted_by,
             modified_on, modified_by, approved
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            record.id,
            record.urn,
            record.attr,
            record.val,
            record.comment,
            record.submitted_by,
            modified_on,
            record.modified_by,
            record.approved,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
