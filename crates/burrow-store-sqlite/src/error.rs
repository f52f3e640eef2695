//! Error type for `burrow-store-sqlite`.

use burrow_sanitize::Rejection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] burrow_core::Error),

  /// The sanitizer refused the query. Never retried.
  #[error("query rejected: {0}")]
  Rejected(#[from] Rejection),

  /// SQLite failed to compile or run the query.
  #[error("query failed: {0}")]
  Execution(String),

  /// The executor is gone, either closed or crashed. The store must be
  /// reopened; the old proxy stays unusable.
  #[error("store channel closed")]
  ChannelClosed,

  #[error("failed to open store: {0}")]
  Open(#[from] rusqlite::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
