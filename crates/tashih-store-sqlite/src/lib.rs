//! SQLite backends for the Tashih stores.
//!
//! Each store wraps its own [`tokio_rusqlite`] connection so database access
//! runs off the async runtime. The three stores are opened independently and
//! never share a transaction, even when pointed at the same file.

mod connect;
mod encode;
mod schema;

pub mod archive;
pub mod canonical;
pub mod error;
pub mod pending;

pub use archive::SqliteArchiveStore;
pub use canonical::SqliteCanonicalStore;
pub use error::{Error, Result};
pub use pending::SqlitePendingStore;

#[cfg(test)]
mod tests;
