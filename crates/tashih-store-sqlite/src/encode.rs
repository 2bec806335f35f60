//! Conversions between domain types and SQLite column values.
//!
//! Timestamps are stored as RFC 3339 strings.

use chrono::{DateTime, Utc};
use tashih_core::correction::{ArchivedCorrection, Correction};

use crate::{Error, Result};

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

/// Column order shared by every `SELECT` over `corrections`.
pub const CORRECTION_COLUMNS: &str = "id, urn, attr, val, comment, submitted_by";

pub fn correction_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Correction> {
  Ok(Correction {
    id:           row.get(0)?,
    urn:          row.get(1)?,
    attr:         row.get(2)?,
    val:          row.get(3)?,
    comment:      row.get(4)?,
    submitted_by: row.get(5)?,
  })
}

/// An `archived_corrections` row before timestamp parsing.
pub struct RawArchived {
  pub id:           String,
  pub urn:          i64,
  pub attr:         String,
  pub val:          String,
  pub comment:      String,
  pub submitted_by: String,
  pub modified_on:  String,
  pub modified_by:  String,
  pub approved:     bool,
}

impl RawArchived {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      urn:          row.get(1)?,
      attr:         row.get(2)?,
      val:          row.get(3)?,
      comment:      row.get(4)?,
      submitted_by: row.get(5)?,
      modified_on:  row.get(6)?,
      modified_by:  row.get(7)?,
      approved:     row.get(8)?,
    })
  }

  pub fn into_archived(self) -> Result<ArchivedCorrection> {
    Ok(ArchivedCorrection {
      id:           self.id,
      urn:          self.urn,
      attr:         self.attr,
      val:          self.val,
      comment:      self.comment,
      submitted_by: self.submitted_by,
      modified_on:  decode_dt(&self.modified_on)?,
      modified_by:  self.modified_by,
      approved:     self.approved,
    })
  }
}
