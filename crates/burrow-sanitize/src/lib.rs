//! Syntax-tree deny-list for queries sent to a node store.
//!
//! Every query is parsed with [`sqlparser`] and the resulting tree is walked
//! in full before the query may run. The walk rejects:
//!
//! - `ATTACH` and `DETACH` statements,
//! - `PRAGMA` statements,
//! - any call (scalar or table-valued) to a function whose name contains
//!   `extension`, in any letter case.
//!
//! Anything else is allowed. This is a deny-list, not a sandbox: constructs
//! not named above pass through untouched. Text that cannot be parsed at all
//! is refused; see [`Rejection::Unparseable`] for valid SQLite that falls
//! into that bucket.
//!
//! # Quick start
//!
//! ```
//! use burrow_sanitize::{Rejection, validate};
//!
//! assert!(validate("SELECT * FROM log WHERE target = ?").is_ok());
//! assert_eq!(validate("PRAGMA journal_mode = DELETE"), Err(Rejection::Pragma));
//! ```

pub mod error;
mod deny;

pub use error::{Rejection, Result};

use sqlparser::{
  ast::{Statement, Visit as _},
  dialect::{GenericDialect, SQLiteDialect},
  parser::Parser,
};

/// Parse `query` and walk every statement in it against the deny-list.
/// Stops at the first denied construct.
pub fn validate(query: &str) -> Result<()> {
  let statements = parse(query)?;
  match statements.visit(&mut deny::DenyList) {
    std::ops::ControlFlow::Break(rejection) => Err(rejection),
    std::ops::ControlFlow::Continue(()) => Ok(()),
  }
}

/// Parse with the SQLite dialect first. The generic dialect knows statements
/// the SQLite dialect does not model (e.g. `DETACH`), so a second attempt
/// lets those reach the deny-list instead of failing as unparseable.
fn parse(query: &str) -> Result<Vec<Statement>> {
  match Parser::parse_sql(&SQLiteDialect {}, query) {
    Ok(statements) => Ok(statements),
    Err(sqlite_err) => Parser::parse_sql(&GenericDialect {}, query)
      .map_err(|_| Rejection::Unparseable(sqlite_err.to_string())),
  }
}
