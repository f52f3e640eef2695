//! Prepared statements keyed by their literal query text.
//!
//! Lives on the executor thread and borrows its connection, so it can never
//! outlive the connection or be shared with another node. There is no
//! eviction: the data APIs issue a small fixed set of query shapes.

use std::collections::{HashMap, hash_map::Entry};

use rusqlite::{Connection, Statement};

pub(crate) struct StatementCache<'conn> {
  conn:       &'conn Connection,
  statements: HashMap<String, Statement<'conn>>,
}

impl<'conn> StatementCache<'conn> {
  pub fn new(conn: &'conn Connection) -> Self {
    Self { conn, statements: HashMap::new() }
  }

  /// Return the prepared statement for `query`, compiling it on first use.
  /// The key is the exact text; no normalisation.
  pub fn compile(&mut self, query: &str) -> rusqlite::Result<&mut Statement<'conn>> {
    let conn = self.conn;
    match self.statements.entry(query.to_owned()) {
      Entry::Occupied(entry) => Ok(entry.into_mut()),
      Entry::Vacant(entry) => Ok(entry.insert(conn.prepare(query)?)),
    }
  }

  pub fn len(&self) -> usize { self.statements.len() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn identical_text_compiles_once() {
    let conn = Connection::open_in_memory().unwrap();
    let mut cache = StatementCache::new(&conn);

    cache.compile("SELECT 1").unwrap();
    cache.compile("SELECT 1").unwrap();
    assert_eq!(cache.len(), 1);

    // Textually distinct, semantically identical.
    cache.compile("select 1").unwrap();
    assert_eq!(cache.len(), 2);
  }

  #[test]
  fn failed_compile_is_not_cached() {
    let conn = Connection::open_in_memory().unwrap();
    let mut cache = StatementCache::new(&conn);

    assert!(cache.compile("SELECT * FROM missing_table").is_err());
    assert_eq!(cache.len(), 0);
  }

  #[test]
  fn cached_statement_runs_repeatedly() {
    let conn = Connection::open_in_memory().unwrap();
    let mut cache = StatementCache::new(&conn);

    for n in 0..3_i64 {
      let stmt = cache.compile("SELECT ?1 + 1").unwrap();
      let got: i64 = stmt.query_row([n], |row| row.get(0)).unwrap();
      assert_eq!(got, n + 1);
    }
    assert_eq!(cache.len(), 1);
  }
}
