//! Messages exchanged between a [`StoreProxy`](crate::StoreProxy) and its
//! executor thread.
//!
//! ```text
//! host                         executor
//!  ── All { id, query, params } ──▶
//!  ◀── Bump
//!  ◀── Rows { id, rows } | Error { id, detail }
//!  ── Close ──▶                 (no reply; thread exits)
//! ```
//!
//! Responses may be matched to requests only through their `id`.

use burrow_core::value::{Row, Value};
use burrow_sanitize::Rejection;

use crate::Error;

/// Pairs a request with its response.
pub type CorrelationId = u64;

/// Host → executor.
#[derive(Debug)]
pub enum Request {
  /// Run `query` with `params` bound positionally and return every row.
  All {
    id:     CorrelationId,
    query:  String,
    params: Vec<Value>,
  },
  /// Close the connection and stop the executor. Terminal.
  Close,
}

/// Executor → host.
#[derive(Debug)]
pub enum Response {
  /// Sent as each request is picked up, before it runs. Carries nothing.
  Bump,
  Rows {
    id:   CorrelationId,
    rows: Vec<Row>,
  },
  Error {
    id:     CorrelationId,
    detail: ErrorDetail,
  },
}

/// Why a request failed on the executor side.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorDetail {
  Rejected(Rejection),
  Execution(String),
}

impl From<ErrorDetail> for Error {
  fn from(detail: ErrorDetail) -> Self {
    match detail {
      ErrorDetail::Rejected(rejection) => Error::Rejected(rejection),
      ErrorDetail::Execution(message) => Error::Execution(message),
    }
  }
}
