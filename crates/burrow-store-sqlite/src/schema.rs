//! SQL schema for a node store.
//!
//! Executed by the executor thread when the connection opens, before any
//! request is accepted. Trusted text, so it does not pass the sanitizer.

/// Per-connection settings. `page_size` only takes effect on a new file and
/// must precede the switch to WAL.
pub fn pragmas(page_size: u32, max_page_count: u32) -> String {
  format!(
    "PRAGMA page_size = {page_size};
     PRAGMA journal_mode = WAL;
     PRAGMA max_page_count = {max_page_count};"
  )
}

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
-- Append-only. `time` is local wall-clock time at insertion.
CREATE TABLE IF NOT EXISTS log (
    idx     INTEGER PRIMARY KEY AUTOINCREMENT,
    time    DATETIME DEFAULT (DATETIME(CURRENT_TIMESTAMP, 'LOCALTIME')),
    user    VARCHAR (100),
    command VARCHAR (10),
    target  VARCHAR (100),
    message TEXT
);

-- One row per (namespace, key); kept that way by the key-value API, not by
-- a constraint.
CREATE TABLE IF NOT EXISTS store (
    idx       INTEGER PRIMARY KEY AUTOINCREMENT UNIQUE,
    namespace VARCHAR (100),
    key       VARCHAR (100),
    value     TEXT
);

-- timestamp/init are fixed-width RFC 3339 UTC with nanosecond precision.
CREATE TABLE IF NOT EXISTS events (
    idx       INTEGER PRIMARY KEY AUTOINCREMENT UNIQUE,
    callback  VARCHAR (100),
    type      VARCHAR (10),
    timestamp DATETIME (20),
    init      DATETIME (20),
    user      VARCHAR (100),
    target    VARCHAR (100),
    message   TEXT
);
";
