//! [`SqliteCanonicalStore`] — the canonical text table in SQLite.

use std::path::Path;

use rusqlite::OptionalExtension as _;
use tashih_core::store::CanonicalStore;

use crate::{Error, Result, connect, schema};

/// The `bukhari_english` system-of-record table.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteCanonicalStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteCanonicalStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    Ok(Self { conn: connect::open(path, schema::CANONICAL).await? })
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    Ok(Self { conn: connect::open_in_memory(schema::CANONICAL).await? })
  }

  /// Add (or replace) a canonical row. Used for seeding and tests.
  pub async fn insert_row(&self, urn: i64, text: impl Into<String>) -> Result<()> {
    let text = text.into();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR REPLACE INTO bukhari_english (englishURN, hadithText) VALUES (?1, ?2)",
          rusqlite::params![urn, text],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Current text of the row keyed by `urn`.
  pub async fn text_for(&self, urn: i64) -> Result<Option<String>> {
    let text = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT hadithText FROM bukhari_english WHERE englishURN = ?1",
            rusqlite::params![urn],
            |row| row.get(0),
          )
          .optional()?)
      })
      .await?;
    Ok(text)
  }
}

impl CanonicalStore for SqliteCanonicalStore {
  type Error = Error;

  async fn update_if_exists(&self, urn: i64, text: &str) -> Result<u64> {
    let text = text.to_owned();

    let rows = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE bukhari_english SET hadithText = ?1 WHERE englishURN = ?2",
          rusqlite::params![text, urn],
        )?)
      })
      .await?;

    Ok(rows as u64)
  }
}
