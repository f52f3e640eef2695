//! Rejection reasons reported by the sanitizer.

use thiserror::Error;

/// Why a query was refused. Each denied construct has its own variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
  #[error("ATTACH statements are not allowed")]
  Attach,

  #[error("DETACH statements are not allowed")]
  Detach,

  #[error("PRAGMA statements are not allowed")]
  Pragma,

  #[error("call to extension function {name:?} is not allowed")]
  ExtensionCall { name: String },

  /// The text could not be parsed, so it could not be checked.
  ///
  /// Some valid SQLite is refused this way because the parser does not model
  /// it. Known cases: the `GLOB` operator (`WHERE message GLOB ?`), `VACUUM`,
  /// and `CREATE TRIGGER`. Queries issued through the store APIs avoid them.
  #[error("query could not be parsed: {0}")]
  Unparseable(String),
}

pub type Result<T, E = Rejection> = std::result::Result<T, E>;
