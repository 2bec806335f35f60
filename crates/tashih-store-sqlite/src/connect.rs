//! Shared connection setup.

use std::path::Path;

use crate::Result;

/// Open (or create) the database at `path` and apply `schema`.
pub async fn open(path: impl AsRef<Path>, schema: &'static str) -> Result<tokio_rusqlite::Connection> {
  let conn = tokio_rusqlite::Connection::open(path).await?;
  init(conn, schema).await
}

/// Open a private in-memory database and apply `schema`.
pub async fn open_in_memory(schema: &'static str) -> Result<tokio_rusqlite::Connection> {
  let conn = tokio_rusqlite::Connection::open_in_memory().await?;
  init(conn, schema).await
}

async fn init(conn: tokio_rusqlite::Connection, schema: &'static str) -> Result<tokio_rusqlite::Connection> {
  conn
    .call(move |conn| {
      conn.execute_batch(schema)?;
      Ok(())
    })
    .await?;
  Ok(conn)
}
