//! Correction types: the pending submission and its archived resolution.
//!
//! A correction is created outside this system and lives in the pending
//! store until a reviewer resolves it. Resolution moves it, logically, into
//! the archive. Archived records are never updated or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user-submitted proposed edit to one field of a canonical text row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Correction {
  pub id:           String,
  /// Reference number of the canonical row this correction targets.
  pub urn:          i64,
  /// Name of the field being corrected.
  pub attr:         String,
  /// The submitter's proposed value.
  pub val:          String,
  pub comment:      String,
  pub submitted_by: String,
}

/// A resolved correction, as written to the archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedCorrection {
  pub id:           String,
  pub urn:          i64,
  pub attr:         String,
  /// The reviewer's replacement text for approvals, otherwise the original
  /// submitted value.
  pub val:          String,
  pub comment:      String,
  pub submitted_by: String,
  pub modified_on:  DateTime<Utc>,
  pub modified_by:  String,
  pub approved:     bool,
}

impl ArchivedCorrection {
  /// Build the archive record for `pending`.
  ///
  /// An empty `corrected_text` counts as absent and keeps the submitted
  /// value.
  pub fn from_pending(
    pending:        Correction,
    corrected_text: Option<&str>,
    modified_by:    &str,
    modified_on:    DateTime<Utc>,
    approved:       bool,
  ) -> Self {
    let val = match corrected_text {
      Some(text) if !text.is_empty() => text.to_owned(),
      _ => pending.val,
    };

    Self {
      id: pending.id,
      urn: pending.urn,
      attr: pending.attr,
      val,
      comment: pending.comment,
      submitted_by: pending.submitted_by,
      modified_on,
      modified_by: modified_by.to_owned(),
      approved,
    }
  }
}
