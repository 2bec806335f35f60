//! Error taxonomy for the resolution workflow.
//!
//! None of these escape [`Resolver::resolve`](crate::Resolver::resolve): they
//! are converted into a [`Resolution`](crate::Resolution) carrying the
//! display message.

use thiserror::Error;

/// Boxed error from any store backend.
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum ResolveError {
  #[error("correction with id {0} not found")]
  NotFound(String),

  /// The canonical update matched no row for the correction's `urn`.
  #[error("Failed to update hadith text")]
  NoRowsAffected { urn: i64 },

  #[error("{0}")]
  Backend(#[source] BackendError),

  /// The archive write succeeded but the pending record could not be
  /// removed. The correction is now present in both stores.
  #[error("correction {id} was archived but is still pending: {source}")]
  NotRemoved {
    id:     String,
    #[source]
    source: BackendError,
  },

  #[error("{0}")]
  InvalidRequest(String),
}

impl ResolveError {
  pub(crate) fn backend<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Backend(Box::new(e))
  }
}

pub type Result<T, E = ResolveError> = std::result::Result<T, E>;
