//! The three storage traits the resolution workflow coordinates.
//!
//! Each store is independent: there is no transaction spanning two of them.
//! Implementations live in backend crates (e.g. `tashih-store-sqlite`).

use std::future::Future;

use crate::correction::{ArchivedCorrection, Correction};

/// Pending corrections, keyed by correction id.
pub trait PendingStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Return up to `limit` pending corrections in store-defined order.
  ///
  /// Callers must not assume recency or insertion order.
  fn scan(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Correction>, Self::Error>> + Send + '_;

  /// Retrieve a pending correction by id. Returns `None` if not found.
  fn get<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Correction>, Self::Error>> + Send + 'a;

  /// Remove a pending correction. Deleting an absent id is not an error.
  fn delete<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

/// Append-only log of resolved corrections, keyed by correction id.
pub trait ArchiveStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Write `record`, replacing any existing record with the same id.
  fn put<'a>(
    &'a self,
    record: &'a ArchivedCorrection,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

/// The canonical text table that approved corrections overwrite.
pub trait CanonicalStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Set the text of the row keyed by `urn`, if such a row exists.
  ///
  /// Returns the number of rows affected: `1` if the row was updated, `0` if
  /// no row matched.
  fn update_if_exists<'a>(
    &'a self,
    urn: i64,
    text: &'a str,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;
}
