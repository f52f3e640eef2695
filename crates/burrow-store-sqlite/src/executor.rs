//! The executor thread: sole owner of one node's connection.
//!
//! Requests are handled strictly one at a time in arrival order. Everything
//! that needs atomicity relative to other callers on the same node relies on
//! this.

use std::{path::PathBuf, sync::Arc, thread};

use burrow_core::value::{Row, Value};
use regex::Regex;
use rusqlite::{Connection, functions::FunctionFlags};
use tokio::sync::{mpsc, oneshot};

use crate::{
  Error, Result,
  cache::StatementCache,
  encode,
  protocol::{ErrorDetail, Request, Response},
};

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Where the executor's database lives.
#[derive(Debug, Clone)]
pub(crate) enum Location {
  File(PathBuf),
  Memory,
}

/// Everything the executor needs before it accepts requests.
#[derive(Debug, Clone)]
pub(crate) struct Settings {
  pub location:       Location,
  pub page_size:      u32,
  pub max_page_count: u32,
  /// DDL run once at open, ahead of any request.
  pub bootstrap:      &'static str,
}

/// Start an executor thread named after `name` and wait until its
/// connection is open and bootstrapped.
pub(crate) async fn spawn(
  name: &str,
  settings: Settings,
) -> Result<(mpsc::UnboundedSender<Request>, mpsc::UnboundedReceiver<Response>)> {
  let (request_tx, request_rx) = mpsc::unbounded_channel();
  let (response_tx, response_rx) = mpsc::unbounded_channel();
  let (ready_tx, ready_rx) = oneshot::channel::<Result<()>>();

  let span = tracing::info_span!("executor", node = %name);
  thread::Builder::new()
    .name(format!("burrow-{name}"))
    .spawn(move || {
      let _entered = span.enter();
      let conn = match open(&settings) {
        Ok(conn) => conn,
        Err(e) => {
          let _ = ready_tx.send(Err(e));
          return;
        }
      };
      let _ = ready_tx.send(Ok(()));
      tracing::info!("executor started");

      serve(&conn, request_rx, &response_tx);

      if let Err((_, e)) = conn.close() {
        tracing::warn!(error = %e, "failed to close connection cleanly");
      }
      tracing::info!("executor stopped");
      // `response_tx` drops here, which tells the proxy we are gone.
    })?;

  ready_rx.await.map_err(|_| Error::ChannelClosed)??;
  Ok((request_tx, response_rx))
}

fn open(settings: &Settings) -> Result<Connection> {
  let conn = match &settings.location {
    Location::File(path) => Connection::open(path)?,
    Location::Memory => Connection::open_in_memory()?,
  };
  conn.execute_batch(&crate::schema::pragmas(
    settings.page_size,
    settings.max_page_count,
  ))?;
  conn.execute_batch(settings.bootstrap)?;
  register_regexp(&conn)?;
  Ok(conn)
}

/// `X REGEXP Y` in SQLite calls `regexp(Y, X)`, which has no built-in
/// implementation. The pattern is compiled once per statement.
fn register_regexp(conn: &Connection) -> rusqlite::Result<()> {
  conn.create_scalar_function(
    "regexp",
    2,
    FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
    |ctx| {
      let pattern: Arc<Regex> = ctx.get_or_create_aux(0, |vr| -> Result<_, BoxError> {
        Ok(Regex::new(vr.as_str()?)?)
      })?;
      let text: Option<String> = ctx.get(1)?;
      Ok(text.is_some_and(|text| pattern.is_match(&text)))
    },
  )
}

fn serve(
  conn: &Connection,
  mut requests: mpsc::UnboundedReceiver<Request>,
  responses: &mpsc::UnboundedSender<Response>,
) {
  let mut cache = StatementCache::new(conn);

  while let Some(request) = requests.blocking_recv() {
    match request {
      Request::All { id, query, params } => {
        if responses.send(Response::Bump).is_err() {
          break;
        }
        tracing::trace!(id, query = %query, "executing");
        let response = match execute(&mut cache, &query, params) {
          Ok(rows) => {
            tracing::debug!(id, rows = rows.len(), "request complete");
            Response::Rows { id, rows }
          }
          Err(detail) => {
            tracing::warn!(id, ?detail, "request failed");
            Response::Error { id, detail }
          }
        };
        if responses.send(response).is_err() {
          break;
        }
      }
      Request::Close => {
        tracing::debug!(statements = cache.len(), "close requested");
        break;
      }
    }
  }
}

fn execute(
  cache: &mut StatementCache<'_>,
  query: &str,
  params: Vec<Value>,
) -> Result<Vec<Row>, ErrorDetail> {
  burrow_sanitize::validate(query).map_err(ErrorDetail::Rejected)?;
  run(cache, query, params).map_err(|e| ErrorDetail::Execution(e.to_string()))
}

fn run(
  cache: &mut StatementCache<'_>,
  query: &str,
  params: Vec<Value>,
) -> rusqlite::Result<Vec<Row>> {
  let statement = cache.compile(query)?;
  let columns: Arc<[String]> = statement
    .column_names()
    .into_iter()
    .map(str::to_owned)
    .collect();

  let mut rows = statement.query(rusqlite::params_from_iter(
    params.into_iter().map(encode::to_sql),
  ))?;

  let mut out = Vec::new();
  while let Some(row) = rows.next()? {
    let values = (0..columns.len())
      .map(|i| row.get_ref(i).map(encode::from_sql))
      .collect::<rusqlite::Result<Vec<_>>>()?;
    out.push(Row::new(Arc::clone(&columns), values));
  }
  Ok(out)
}
