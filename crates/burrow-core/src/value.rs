//! Values and rows exchanged with the query executor.
//!
//! Parameters travel to the executor as [`Value`]s and results come back as
//! [`Row`]s. Both are owned and `Send` so they can cross the channel between
//! the host and the executor thread.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Value ───────────────────────────────────────────────────────────────────

/// A single SQLite value, mirroring the five storage classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
  Null,
  Integer(i64),
  Real(f64),
  Text(String),
  Blob(Vec<u8>),
}

impl Value {
  /// Name of the storage class, as used in error messages.
  pub fn type_name(&self) -> &'static str {
    match self {
      Self::Null => "null",
      Self::Integer(_) => "integer",
      Self::Real(_) => "real",
      Self::Text(_) => "text",
      Self::Blob(_) => "blob",
    }
  }

  pub fn is_null(&self) -> bool { matches!(self, Self::Null) }

  /// Render the value as text the way SQLite's `CAST(x AS TEXT)` would.
  /// Returns `None` for `NULL`.
  pub fn to_text(&self) -> Option<String> {
    match self {
      Self::Null => None,
      Self::Integer(i) => Some(i.to_string()),
      Self::Real(r) => Some(r.to_string()),
      Self::Text(s) => Some(s.clone()),
      Self::Blob(b) => Some(String::from_utf8_lossy(b).into_owned()),
    }
  }
}

impl From<&str> for Value {
  fn from(s: &str) -> Self { Self::Text(s.to_owned()) }
}

impl From<String> for Value {
  fn from(s: String) -> Self { Self::Text(s) }
}

impl From<&String> for Value {
  fn from(s: &String) -> Self { Self::Text(s.clone()) }
}

impl From<i64> for Value {
  fn from(i: i64) -> Self { Self::Integer(i) }
}

impl From<u32> for Value {
  fn from(i: u32) -> Self { Self::Integer(i64::from(i)) }
}

impl From<f64> for Value {
  fn from(r: f64) -> Self { Self::Real(r) }
}

impl From<Vec<u8>> for Value {
  fn from(b: Vec<u8>) -> Self { Self::Blob(b) }
}

impl<T: Into<Value>> From<Option<T>> for Value {
  fn from(v: Option<T>) -> Self { v.map_or(Self::Null, Into::into) }
}

/// Build a `Vec<Value>` from heterogeneous parameters.
///
/// ```
/// let params = burrow_core::params!["#general", 10_i64];
/// assert_eq!(params.len(), 2);
/// ```
#[macro_export]
macro_rules! params {
  () => { ::std::vec::Vec::<$crate::value::Value>::new() };
  ($($param:expr),+ $(,)?) => {
    ::std::vec![$($crate::value::Value::from($param)),+]
  };
}

// ─── Row ─────────────────────────────────────────────────────────────────────

/// One result row. Column names are shared by every row of a result set.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
  columns: Arc<[String]>,
  values:  Vec<Value>,
}

impl Row {
  pub fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
    debug_assert_eq!(columns.len(), values.len());
    Self { columns, values }
  }

  pub fn columns(&self) -> &[String] { &self.columns }

  pub fn values(&self) -> &[Value] { &self.values }

  pub fn into_values(self) -> Vec<Value> { self.values }

  /// Look up a value by column name. The first column with that name wins.
  pub fn get(&self, column: &str) -> Option<&Value> {
    self
      .columns
      .iter()
      .position(|c| c == column)
      .map(|i| &self.values[i])
  }

  fn require(&self, column: &str) -> Result<&Value> {
    self
      .get(column)
      .ok_or_else(|| Error::MissingColumn(column.to_owned()))
  }

  /// Read an integer column. `NULL` is a type error.
  pub fn integer(&self, column: &str) -> Result<i64> {
    match self.require(column)? {
      Value::Integer(i) => Ok(*i),
      other => Err(Error::ColumnType {
        column:   column.to_owned(),
        expected: "integer",
        found:    other.type_name(),
      }),
    }
  }

  /// Read a column as text. `NULL` reads as the empty string and numbers are
  /// rendered in decimal; blobs are a type error.
  pub fn text(&self, column: &str) -> Result<String> {
    match self.require(column)? {
      Value::Blob(_) => Err(Error::ColumnType {
        column:   column.to_owned(),
        expected: "text",
        found:    "blob",
      }),
      other => Ok(other.to_text().unwrap_or_default()),
    }
  }
}
