//! JSON HTTP API for reviewing corrections.
//!
//! Exposes an axum [`Router`] backed by a [`Resolver`]. Authentication is the
//! caller's responsibility: some outer layer must insert an [`Actor`]
//! extension into every request.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = tashih_api::api_router(state).layer(auth_layer);
//! ```

pub mod corrections;
pub mod error;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use tashih_core::{
  Resolver,
  clock::Clock,
  store::{ArchiveStore, CanonicalStore, PendingStore},
};

pub use error::ApiError;

/// The authenticated reviewer making the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor(pub String);

/// Shared state threaded through all API handlers.
pub struct ApiState<P, A, C, K> {
  pub resolver:            Arc<Resolver<P, A, C, K>>,
  /// Maximum number of corrections returned by `GET /corrections`.
  pub scan_limit:          usize,
  /// Answer every resolution with `200 OK`, leaving the outcome to the
  /// message body.
  pub legacy_status_codes: bool,
}

impl<P, A, C, K> Clone for ApiState<P, A, C, K> {
  fn clone(&self) -> Self {
    Self {
      resolver:            self.resolver.clone(),
      scan_limit:          self.scan_limit,
      legacy_status_codes: self.legacy_status_codes,
    }
  }
}

/// Build the API router for `state`.
///
/// The returned `Router<()>` can be nested or layered regardless of the
/// parent's state type.
pub fn api_router<P, A, C, K>(state: ApiState<P, A, C, K>) -> Router<()>
where
  P: PendingStore + 'static,
  A: ArchiveStore + 'static,
  C: CanonicalStore + 'static,
  K: Clock + 'static,
{
  Router::new()
    .route("/corrections", get(corrections::list::<P, A, C, K>))
    .route("/corrections/{id}", post(corrections::resolve::<P, A, C, K>))
    .with_state(state)
}
