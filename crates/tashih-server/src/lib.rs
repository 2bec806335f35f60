//! HTTP server for the Tashih correction review workflow.
//!
//! Wraps the [`tashih_api`] router with session authentication and request
//! tracing, and owns the runtime configuration.

pub mod auth;
pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{Router, middleware};
use serde::Deserialize;
use tashih_api::{ApiState, api_router};
use tashih_core::{
  ResolverConfig,
  clock::Clock,
  store::{ArchiveStore, CanonicalStore, PendingStore},
};
use tower_http::trace::TraceLayer;

use auth::{TokenVerifier, require_auth};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `TASHIH_*` environment variables.
#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  /// SQLite file holding pending corrections.
  pub pending_path:        PathBuf,
  /// SQLite file holding the resolution archive.
  pub archive_path:        PathBuf,
  /// SQLite file holding the canonical `bukhari_english` table.
  pub canonical_path:      PathBuf,
  /// argon2 PHC hash of the accepted `access_token` cookie value.
  pub access_token_hash:   String,
  #[serde(default = "default_scan_limit")]
  pub scan_limit:          usize,
  #[serde(default = "default_delete_attempts")]
  pub delete_attempts:     u32,
  #[serde(default)]
  pub legacy_status_codes: bool,
}

fn default_scan_limit() -> usize { 1 }

fn default_delete_attempts() -> u32 { 3 }

impl ServerConfig {
  pub fn resolver_config(&self) -> ResolverConfig {
    ResolverConfig {
      delete_attempts: self.delete_attempts,
      delete_backoff:  Duration::from_millis(50),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router: API handlers behind authentication.
pub fn router<P, A, C, K>(
  state:    ApiState<P, A, C, K>,
  verifier: Arc<dyn TokenVerifier>,
) -> Router
where
  P: PendingStore + 'static,
  A: ArchiveStore + 'static,
  C: CanonicalStore + 'static,
  K: Clock + 'static,
{
  api_router(state)
    .layer(middleware::from_fn_with_state(verifier, require_auth))
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use rand_core::OsRng;
  use tashih_core::{Resolver, correction::Correction};
  use tashih_store_sqlite::{SqliteArchiveStore, SqliteCanonicalStore, SqlitePendingStore};
  use tower::ServiceExt as _;

  use crate::auth::Argon2Verifier;

  struct Harness {
    app:       Router,
    pending:   Arc<SqlitePendingStore>,
    archive:   Arc<SqliteArchiveStore>,
    canonical: Arc<SqliteCanonicalStore>,
  }

  async fn harness(token: &str) -> Harness {
    let pending   = Arc::new(SqlitePendingStore::open_in_memory().await.unwrap());
    let archive   = Arc::new(SqliteArchiveStore::open_in_memory().await.unwrap());
    let canonical = Arc::new(SqliteCanonicalStore::open_in_memory().await.unwrap());

    pending
      .insert(Correction {
        id:           "42".into(),
        urn:          7,
        attr:         "hadithText".into(),
        val:          "old".into(),
        comment:      "".into(),
        submitted_by: "submitter".into(),
      })
      .await
      .unwrap();
    canonical.insert_row(7, "old text").await.unwrap();

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(token.as_bytes(), &salt)
      .unwrap()
      .to_string();

    let resolver = Resolver::new(pending.clone(), archive.clone(), canonical.clone());
    let state = ApiState {
      resolver:            Arc::new(resolver),
      scan_limit:          1,
      legacy_status_codes: false,
    };
    let app = router(state, Arc::new(Argon2Verifier { token_hash: hash }));

    Harness { app, pending, archive, canonical }
  }

  fn session(token: &str, user: &str) -> String {
    format!("access_token={token}; username={user}")
  }

  #[tokio::test]
  async fn unauthenticated_requests_return_401() {
    let h = harness("secret").await;

    let req  = Request::builder().uri("/corrections").body(Body::empty()).unwrap();
    let resp = h.app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = Request::builder()
      .method("POST")
      .uri("/corrections/42")
      .header(header::COOKIE, session("wrong", "mallory"))
      .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
      .body(Body::from("action=delete"))
      .unwrap();
    let resp = h.app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(h.pending.get("42").await.unwrap().is_some());
  }

  #[tokio::test]
  async fn authenticated_list_returns_pending() {
    let h = harness("secret").await;

    let req = Request::builder()
      .uri("/corrections")
      .header(header::COOKIE, session("secret", "alice"))
      .body(Body::empty())
      .unwrap();
    let resp = h.app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let items: Vec<Correction> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "42");
  }

  #[tokio::test]
  async fn approval_is_attributed_to_cookie_username() {
    let h = harness("secret").await;

    let req = Request::builder()
      .method("POST")
      .uri("/corrections/42")
      .header(header::COOKIE, session("secret", "alice"))
      .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
      .body(Body::from("action=approve&corrected_hadith=new+text"))
      .unwrap();
    let resp = h.app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(h.canonical.text_for(7).await.unwrap().as_deref(), Some("new text"));
    let archived = h.archive.get("42").await.unwrap().unwrap();
    assert_eq!(archived.modified_by, "alice");
    assert!(archived.approved);
    assert_eq!(archived.val, "new text");
  }

  #[test]
  fn config_defaults_apply() {
    let cfg: ServerConfig = serde_json::from_value(serde_json::json!({
      "host": "127.0.0.1",
      "port": 5000,
      "pending_path": "pending.db",
      "archive_path": "archive.db",
      "canonical_path": "canonical.db",
      "access_token_hash": "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA",
    }))
    .unwrap();

    assert_eq!(cfg.scan_limit, 1);
    assert_eq!(cfg.resolver_config().delete_attempts, 3);
    assert!(!cfg.legacy_status_codes);
  }
}
