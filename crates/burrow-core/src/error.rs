//! Error types for `burrow-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("missing column: {0}")]
  MissingColumn(String),

  #[error("column {column} holds {found}, expected {expected}")]
  ColumnType {
    column:   String,
    expected: &'static str,
    found:    &'static str,
  },

  #[error("unknown event kind: {0:?}")]
  UnknownEventKind(String),

  #[error("unknown log command: {0:?}")]
  UnknownCommand(String),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
