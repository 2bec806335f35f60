//! Handlers for `/corrections` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/corrections` | Up to `scan_limit` pending corrections |
//! | `POST` | `/corrections/:id` | Form: `action=approve\|delete`, `corrected_hadith` |

use axum::{
  Extension, Form, Json,
  extract::{Path, State, rejection::FormRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tashih_core::{
  Resolution,
  clock::Clock,
  correction::Correction,
  store::{ArchiveStore, CanonicalStore, PendingStore},
};

use crate::{Actor, ApiState, error::ApiError};

/// Body of every resolution response.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageBody {
  pub message: String,
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /corrections`
pub async fn list<P, A, C, K>(
  State(state): State<ApiState<P, A, C, K>>,
) -> Result<Json<Vec<Correction>>, ApiError>
where
  P: PendingStore,
  A: ArchiveStore,
  C: CanonicalStore,
  K: Clock,
{
  let corrections = state
    .resolver
    .pending()
    .scan(state.scan_limit)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(corrections))
}

// ─── Resolve ──────────────────────────────────────────────────────────────────

/// Form body accepted by `POST /corrections/:id`.
#[derive(Debug, Default, Deserialize)]
pub struct ResolveForm {
  pub action:           Option<String>,
  pub corrected_hadith: Option<String>,
}

/// `POST /corrections/:id` — approve or reject a pending correction.
///
/// A missing or unreadable form body counts as an empty form, so the caller
/// still gets a JSON message.
pub async fn resolve<P, A, C, K>(
  State(state): State<ApiState<P, A, C, K>>,
  Extension(Actor(actor)): Extension<Actor>,
  Path(id): Path<String>,
  form: Result<Form<ResolveForm>, FormRejection>,
) -> Response
where
  P: PendingStore,
  A: ArchiveStore,
  C: CanonicalStore,
  K: Clock,
{
  let form = form.map(|Form(form)| form).unwrap_or_else(|rejection| {
    tracing::debug!(id = %id, "unreadable resolution form: {rejection}");
    ResolveForm::default()
  });

  let outcome = state
    .resolver
    .resolve(
      &id,
      &actor,
      form.action.as_deref(),
      form.corrected_hadith.as_deref(),
    )
    .await;

  let status = if state.legacy_status_codes {
    StatusCode::OK
  } else {
    status_for(&outcome)
  };

  let body = MessageBody { message: outcome.message().to_owned() };
  (status, Json(body)).into_response()
}

fn status_for(outcome: &Resolution) -> StatusCode {
  match outcome {
    Resolution::Success(_) => StatusCode::OK,
    Resolution::NotFound(_) => StatusCode::NOT_FOUND,
    Resolution::InvalidRequest(_) => StatusCode::BAD_REQUEST,
    Resolution::Failure(_) => StatusCode::UNPROCESSABLE_ENTITY,
    Resolution::StorageError(_) => StatusCode::BAD_GATEWAY,
  }
}
