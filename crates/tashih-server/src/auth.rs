//! Session-cookie authentication middleware.
//!
//! Sign-in happens at an external identity provider, which leaves two
//! cookies behind: `access_token` and `username`. Every API request must
//! present a token the configured [`TokenVerifier`] accepts; the username is
//! then handed to the handlers as the [`Actor`].

use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  extract::{Request, State},
  http::{HeaderMap, header},
  middleware::Next,
  response::Response,
};
use tashih_api::Actor;

use crate::error::Error;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const USERNAME_COOKIE: &str = "username";

/// Decides whether an access token is valid.
pub trait TokenVerifier: Send + Sync {
  fn verify(&self, token: &str) -> bool;
}

/// Accepts the single token whose argon2 hash is configured.
#[derive(Clone)]
pub struct Argon2Verifier {
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub token_hash: String,
}

impl TokenVerifier for Argon2Verifier {
  fn verify(&self, token: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(&self.token_hash) else {
      tracing::error!("configured access token hash is not a valid PHC string");
      return false;
    };
    Argon2::default()
      .verify_password(token.as_bytes(), &parsed_hash)
      .is_ok()
  }
}

/// Find the value of cookie `name` across all `Cookie` headers.
pub fn cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
  headers
    .get_all(header::COOKIE)
    .iter()
    .filter_map(|v| v.to_str().ok())
    .flat_map(|v| v.split(';'))
    .filter_map(|pair| pair.trim().split_once('='))
    .find(|(k, _)| *k == name)
    .map(|(_, v)| v)
}

/// Verify the session cookies and attach the [`Actor`] to the request.
pub fn authenticate(headers: &HeaderMap, verifier: &dyn TokenVerifier) -> Result<Actor, Error> {
  let token = cookie(headers, ACCESS_TOKEN_COOKIE).ok_or(Error::Unauthorized)?;
  if !verifier.verify(token) {
    return Err(Error::Unauthorized);
  }

  let username = cookie(headers, USERNAME_COOKIE)
    .filter(|u| !u.is_empty())
    .ok_or(Error::Unauthorized)?;
  Ok(Actor(username.to_owned()))
}

/// axum middleware: reject unauthenticated requests with `401`.
pub async fn require_auth(
  State(verifier): State<Arc<dyn TokenVerifier>>,
  mut req: Request,
  next: Next,
) -> Result<Response, Error> {
  let actor = authenticate(req.headers(), verifier.as_ref()).inspect_err(|_| {
    tracing::debug!(uri = %req.uri(), "rejected unauthenticated request");
  })?;
  req.extensions_mut().insert(actor);
  Ok(next.run(req).await)
}
