//! The resolution workflow: approve or reject one pending correction.
//!
//! Approval reads the pending record, overwrites the canonical text for its
//! `urn`, archives the correction and removes it from the pending store.
//! Rejection only archives and removes. The three stores share no
//! transaction, so the order of steps decides what survives a failure:
//!
//! - a failed or zero-row canonical update leaves the correction pending;
//! - a failed archive write leaves the correction pending;
//! - a failed pending delete, after a successful archive write, leaves the
//!   correction in both stores. The delete is retried before this is
//!   reported.

use std::{sync::Arc, time::Duration};

use crate::{
  clock::{Clock, SystemClock},
  correction::ArchivedCorrection,
  error::{ResolveError, Result},
  lock::IdLocks,
  store::{ArchiveStore, CanonicalStore, PendingStore},
};

const INVALID_ACTION: &str =
  "Please provide valid action param 'delete' or 'approve'";
const MISSING_TEXT: &str = "Please provide valid action param 'delete' or \
                            'approve' and 'corrected_hadith' param";

// ─── Request ─────────────────────────────────────────────────────────────────

/// What a reviewer decided for a correction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
  /// Accept the correction, replacing the canonical text with
  /// `corrected_text`.
  Approve { corrected_text: String },
  /// Reject the correction. The canonical text is untouched.
  Delete,
}

impl Action {
  /// Validate the raw `action` and `corrected_text` request parameters.
  ///
  /// A request carrying neither parameter gets the message naming both.
  pub fn parse(action: Option<&str>, corrected_text: Option<&str>) -> Result<Self> {
    match (action, corrected_text) {
      (None, None) => Err(ResolveError::InvalidRequest(MISSING_TEXT.to_owned())),
      (Some("delete"), _) => Ok(Self::Delete),
      (Some("approve"), _) => match corrected_text {
        Some(text) if !text.trim().is_empty() => Ok(Self::Approve {
          corrected_text: text.to_owned(),
        }),
        _ => Err(ResolveError::InvalidRequest(MISSING_TEXT.to_owned())),
      },
      _ => Err(ResolveError::InvalidRequest(INVALID_ACTION.to_owned())),
    }
  }
}

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// The outcome of a resolution. Every variant carries a message meant to be
/// shown to the caller verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
  Success(String),
  NotFound(String),
  /// The canonical update matched nothing; the correction is still pending.
  Failure(String),
  StorageError(String),
  InvalidRequest(String),
}

impl Resolution {
  pub fn message(&self) -> &str {
    match self {
      Self::Success(m)
      | Self::NotFound(m)
      | Self::Failure(m)
      | Self::StorageError(m)
      | Self::InvalidRequest(m) => m,
    }
  }

  pub fn is_success(&self) -> bool { matches!(self, Self::Success(_)) }
}

impl From<ResolveError> for Resolution {
  fn from(e: ResolveError) -> Self {
    let message = e.to_string();
    match e {
      ResolveError::NotFound(_) => Self::NotFound(message),
      ResolveError::NoRowsAffected { .. } => Self::Failure(message),
      ResolveError::Backend(_) | ResolveError::NotRemoved { .. } => {
        Self::StorageError(message)
      }
      ResolveError::InvalidRequest(_) => Self::InvalidRequest(message),
    }
  }
}

// ─── Resolver ────────────────────────────────────────────────────────────────

/// Tunables for [`Resolver`].
#[derive(Debug, Clone)]
pub struct ResolverConfig {
  /// How many times to try removing the pending record after it has been
  /// archived. At least one attempt is always made.
  pub delete_attempts: u32,
  /// Base delay between delete attempts; attempt `n` waits `n` times this.
  pub delete_backoff:  Duration,
}

impl Default for ResolverConfig {
  fn default() -> Self {
    Self { delete_attempts: 3, delete_backoff: Duration::from_millis(50) }
  }
}

/// Resolves pending corrections against the three stores.
///
/// Store handles and the clock are injected; the resolver keeps no state
/// between calls other than the per-id locks.
pub struct Resolver<P, A, C, K = SystemClock> {
  pending:   Arc<P>,
  archive:   Arc<A>,
  canonical: Arc<C>,
  clock:     K,
  config:    ResolverConfig,
  locks:     IdLocks,
}

impl<P, A, C> Resolver<P, A, C>
where
  P: PendingStore,
  A: ArchiveStore,
  C: CanonicalStore,
{
  pub fn new(pending: Arc<P>, archive: Arc<A>, canonical: Arc<C>) -> Self {
    Self {
      pending,
      archive,
      canonical,
      clock: SystemClock,
      config: ResolverConfig::default(),
      locks: IdLocks::new(),
    }
  }
}

impl<P, A, C, K> Resolver<P, A, C, K>
where
  P: PendingStore,
  A: ArchiveStore,
  C: CanonicalStore,
  K: Clock,
{
  /// Replace the clock used for `modifiedOn` timestamps.
  pub fn with_clock<K2: Clock>(self, clock: K2) -> Resolver<P, A, C, K2> {
    Resolver {
      pending: self.pending,
      archive: self.archive,
      canonical: self.canonical,
      clock,
      config: self.config,
      locks: self.locks,
    }
  }

  pub fn with_config(mut self, config: ResolverConfig) -> Self {
    self.config = config;
    self
  }

  /// The pending store, for read-only listing by callers.
  pub fn pending(&self) -> &P { &self.pending }

  /// Resolve correction `id` on behalf of `actor`.
  ///
  /// `action` must be `"approve"` or `"delete"`; approvals require
  /// `corrected_text`. Never fails: every error becomes a [`Resolution`].
  pub async fn resolve(
    &self,
    id:             &str,
    actor:          &str,
    action:         Option<&str>,
    corrected_text: Option<&str>,
  ) -> Resolution {
    match Action::parse(action, corrected_text) {
      Ok(action) => self.resolve_action(id, actor, action).await,
      Err(e) => {
        tracing::warn!(id, actor, ?action, "rejected resolution request: {e}");
        e.into()
      }
    }
  }

  /// Resolve correction `id` with an already-validated [`Action`].
  pub async fn resolve_action(
    &self,
    id:     &str,
    actor:  &str,
    action: Action,
  ) -> Resolution {
    let _guard = self.locks.acquire(id).await;

    let outcome = match &action {
      Action::Delete => self
        .archive(id, actor, None, false)
        .await
        .map(|_| "Success"),
      Action::Approve { corrected_text } => self
        .approve(id, actor, corrected_text)
        .await
        .map(|_| "Successfully updated hadith text"),
    };

    match outcome {
      Ok(message) => {
        tracing::info!(id, actor, ?action, "resolved correction");
        Resolution::Success(message.to_owned())
      }
      Err(e @ ResolveError::NotRemoved { .. }) => {
        tracing::error!(
          id,
          actor,
          "correction archived but not removed from pending store; \
           reconcile manually: {e}"
        );
        e.into()
      }
      Err(e) => {
        tracing::warn!(id, actor, "resolution failed: {e}");
        e.into()
      }
    }
  }

  async fn approve(&self, id: &str, actor: &str, corrected_text: &str) -> Result<()> {
    let correction = self
      .pending
      .get(id)
      .await
      .map_err(ResolveError::backend)?
      .ok_or_else(|| ResolveError::NotFound(id.to_owned()))?;

    let rows = self
      .canonical
      .update_if_exists(correction.urn, corrected_text)
      .await
      .map_err(ResolveError::backend)?;

    if rows != 1 {
      tracing::debug!(id, urn = correction.urn, rows, "canonical update matched no row");
      return Err(ResolveError::NoRowsAffected { urn: correction.urn });
    }

    self.archive(id, actor, Some(corrected_text), true).await?;
    Ok(())
  }

  /// Archive pending correction `id` and remove it from the pending store.
  ///
  /// Re-reads the pending record rather than trusting an earlier read, so it
  /// can be called on its own. Does not take the per-id lock; callers that
  /// need serialisation go through [`Resolver::resolve`].
  pub async fn archive(
    &self,
    id:             &str,
    actor:          &str,
    corrected_text: Option<&str>,
    approved:       bool,
  ) -> Result<ArchivedCorrection> {
    let pending = self
      .pending
      .get(id)
      .await
      .map_err(ResolveError::backend)?
      .ok_or_else(|| ResolveError::NotFound(id.to_owned()))?;

    let record = ArchivedCorrection::from_pending(
      pending,
      corrected_text,
      actor,
      self.clock.now(),
      approved,
    );

    self.archive.put(&record).await.map_err(ResolveError::backend)?;
    self.remove_pending(id).await?;

    Ok(record)
  }

  async fn remove_pending(&self, id: &str) -> Result<()> {
    let attempts = self.config.delete_attempts.max(1);
    let mut attempt = 1;

    loop {
      match self.pending.delete(id).await {
        Ok(()) => return Ok(()),
        Err(e) if attempt >= attempts => {
          return Err(ResolveError::NotRemoved {
            id:     id.to_owned(),
            source: Box::new(e),
          });
        }
        Err(e) => {
          tracing::warn!(id, attempt, "failed to remove archived correction, retrying: {e}");
          tokio::time::sleep(self.config.delete_backoff * attempt).await;
          attempt += 1;
        }
      }
    }
  }
}
