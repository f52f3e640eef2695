//! The message log: ingestion and per-target lookups.

use std::sync::{Arc, PoisonError, RwLock};

use burrow_core::{
  log::{LogEntry, LogRecord, ProtocolEvent},
  params,
  value::Value,
};

use crate::{Result, StoreProxy, encode};

// ─── Queries ─────────────────────────────────────────────────────────────────

const INSERT: &str = "
  INSERT INTO log (\"user\", command, target, message)
  VALUES (?, ?, ?, ?)
  RETURNING idx
";

const RANDOM: &str = "
  SELECT * FROM log
  WHERE command = 'PRIVMSG' AND target = ?
  ORDER BY RANDOM() LIMIT ?
";

const SEARCH: &str = "
  SELECT * FROM log
  WHERE instr(message, ?) > 0 AND target = ?
  ORDER BY idx DESC LIMIT ? OFFSET ?
";

const SEARCH_GLOBAL: &str = "
  SELECT * FROM log
  WHERE instr(message, ?) > 0
  ORDER BY idx DESC LIMIT ? OFFSET ?
";

const SEARCH_USER: &str = "
  SELECT * FROM log
  WHERE lower(\"user\") = lower(?) AND instr(message, ?) > 0
  ORDER BY idx DESC LIMIT ? OFFSET ?
";

const COUNT: &str = "
  SELECT count(idx) AS total FROM log
  WHERE instr(message, ?) > 0
";

const SEARCH_REGEX: &str = "
  SELECT * FROM log
  WHERE regexp(?, message) AND target = ?
  ORDER BY idx DESC LIMIT ? OFFSET ?
";

// ─── Paging ──────────────────────────────────────────────────────────────────

/// `LIMIT`/`OFFSET` for searches. Defaults to the single newest match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
  pub limit:  u32,
  pub offset: u32,
}

impl Default for Page {
  fn default() -> Self { Self { limit: 1, offset: 0 } }
}

impl Page {
  pub fn new(limit: u32, offset: u32) -> Self { Self { limit, offset } }
}

// ─── LogApi ──────────────────────────────────────────────────────────────────

/// Writes protocol events to the log and hands out per-target readers.
#[derive(Clone)]
pub struct LogApi {
  proxy:    StoreProxy,
  nickname: Arc<RwLock<String>>,
}

impl LogApi {
  pub(crate) fn new(proxy: StoreProxy, nickname: Arc<RwLock<String>>) -> Self {
    Self { proxy, nickname }
  }

  /// Log `event` if it is a tracked command. Returns the new row's `idx`, or
  /// `None` when the event is not logged.
  pub async fn record(&self, event: &ProtocolEvent) -> Result<Option<i64>> {
    let own_nick = self.nickname.read().unwrap_or_else(PoisonError::into_inner).clone();
    let Some(record) = LogRecord::from_event(event, &own_nick) else {
      return Ok(None);
    };

    let rows = self
      .proxy
      .call(
        INSERT,
        params![record.user, record.command.as_ref(), record.target, record.message],
      )
      .await?;
    encode::first_idx(&rows)
  }

  pub fn for_target(&self, target: impl Into<String>) -> TargetLog {
    TargetLog { proxy: self.proxy.clone(), target: target.into() }
  }
}

// ─── TargetLog ───────────────────────────────────────────────────────────────

/// Lookups scoped to one channel or recipient. Text matches are
/// case-sensitive substrings; results come newest first.
#[derive(Clone)]
pub struct TargetLog {
  proxy:  StoreProxy,
  target: String,
}

impl TargetLog {
  pub fn target(&self) -> &str { &self.target }

  async fn entries(&self, query: &str, params: Vec<Value>) -> Result<Vec<LogEntry>> {
    let rows = self.proxy.call(query, params).await?;
    rows.iter().map(encode::decode_log_entry).collect()
  }

  /// Up to `n` random messages (`PRIVMSG`) sent to this target.
  pub async fn random_sample(&self, n: u32) -> Result<Vec<LogEntry>> {
    self.entries(RANDOM, params![&self.target, n]).await
  }

  /// Entries for this target whose message contains `text`.
  pub async fn search(&self, text: &str, page: Page) -> Result<Vec<LogEntry>> {
    self
      .entries(SEARCH, params![text, &self.target, page.limit, page.offset])
      .await
  }

  /// Like [`search`](Self::search) but across every target in the log.
  pub async fn search_global(&self, text: &str, page: Page) -> Result<Vec<LogEntry>> {
    self
      .entries(SEARCH_GLOBAL, params![text, page.limit, page.offset])
      .await
  }

  /// Entries by `name` (compared case-insensitively) whose message contains
  /// `text`. An empty `text` matches every message. Not restricted to this
  /// target.
  pub async fn search_by_user(&self, name: &str, text: &str, page: Page) -> Result<Vec<LogEntry>> {
    self
      .entries(SEARCH_USER, params![name, text, page.limit, page.offset])
      .await
  }

  /// How many messages anywhere in the log contain `text`.
  pub async fn count(&self, text: &str) -> Result<u64> {
    let rows = self.proxy.call(COUNT, params![text]).await?;
    let total = match rows.first() {
      Some(row) => row.integer("total")?,
      None => 0,
    };
    Ok(u64::try_from(total).unwrap_or_default())
  }

  /// Entries for this target whose message matches the regular expression
  /// `pattern`.
  pub async fn search_regex(&self, pattern: &str, page: Page) -> Result<Vec<LogEntry>> {
    self
      .entries(SEARCH_REGEX, params![pattern, &self.target, page.limit, page.offset])
      .await
  }
}
