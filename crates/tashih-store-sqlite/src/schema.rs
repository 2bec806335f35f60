//! SQL schema for each of the three SQLite stores.
//!
//! Every store runs only its own DDL at startup. All statements are
//! idempotent thanks to `CREATE TABLE IF NOT EXISTS`.

/// Pending corrections awaiting review.
pub const PENDING: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS corrections (
    id           TEXT PRIMARY KEY,
    urn          INTEGER NOT NULL,
    attr         TEXT NOT NULL,
    val          TEXT NOT NULL,
    comment      TEXT NOT NULL DEFAULT '',
    submitted_by TEXT NOT NULL
);
";

/// Resolved corrections.
/// No UPDATE or DELETE is ever issued against this table.
pub const ARCHIVE: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS archived_corrections (
    id           TEXT PRIMARY KEY,
    urn          INTEGER NOT NULL,
    attr         TEXT NOT NULL,
    val          TEXT NOT NULL,
    comment      TEXT NOT NULL DEFAULT '',
    submitted_by TEXT NOT NULL,
    modified_on  TEXT NOT NULL,   -- ISO 8601 UTC
    modified_by  TEXT NOT NULL,
    approved     INTEGER NOT NULL -- 0 | 1
);

CREATE INDEX IF NOT EXISTS archived_modified_idx ON archived_corrections(modified_on);
";

/// Canonical English text, keyed by reference number.
pub const CANONICAL: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS bukhari_english (
    englishURN INTEGER PRIMARY KEY,
    hadithText TEXT NOT NULL
);
";
