//! Conversions between burrow's domain types and what SQLite stores.
//!
//! Event timestamps are RFC 3339 UTC strings with nanosecond precision and a
//! `Z` suffix. The width is fixed, so string comparison in SQL agrees with
//! time order. Log times
//! are SQLite's own local `YYYY-MM-DD HH:MM:SS`.

use burrow_core::{
  Error as CoreError,
  event::{Event, EventKind},
  log::{Command, LogEntry},
  value::{Row, Value},
};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use rusqlite::types::{Value as SqlValue, ValueRef};

use crate::Result;

// ─── Value ───────────────────────────────────────────────────────────────────

pub fn to_sql(value: Value) -> SqlValue {
  match value {
    Value::Null => SqlValue::Null,
    Value::Integer(i) => SqlValue::Integer(i),
    Value::Real(r) => SqlValue::Real(r),
    Value::Text(s) => SqlValue::Text(s),
    Value::Blob(b) => SqlValue::Blob(b),
  }
}

pub fn from_sql(value: ValueRef<'_>) -> Value {
  match value {
    ValueRef::Null => Value::Null,
    ValueRef::Integer(i) => Value::Integer(i),
    ValueRef::Real(r) => Value::Real(r),
    ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
    ValueRef::Blob(b) => Value::Blob(b.to_vec()),
  }
}

// ─── DateTime ────────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339_opts(SecondsFormat::Nanos, true) }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| CoreError::DateParse(format!("{s:?}: {e}")).into())
}

const LOCAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn decode_local_time(s: &str) -> Result<NaiveDateTime> {
  NaiveDateTime::parse_from_str(s, LOCAL_TIME_FORMAT)
    .map_err(|e| CoreError::DateParse(format!("{s:?}: {e}")).into())
}

// ─── Rows ────────────────────────────────────────────────────────────────────

/// The `idx` of the first row, as returned by `... RETURNING idx`.
pub fn first_idx(rows: &[Row]) -> Result<Option<i64>> {
  rows.first().map(|row| row.integer("idx")).transpose().map_err(Into::into)
}

pub fn decode_log_entry(row: &Row) -> Result<LogEntry> {
  let command = row.text("command")?;
  Ok(LogEntry {
    idx:     row.integer("idx")?,
    time:    decode_local_time(&row.text("time")?)?,
    user:    row.text("user")?,
    command: command
      .parse::<Command>()
      .map_err(|_| CoreError::UnknownCommand(command))?,
    target:  row.text("target")?,
    message: row.text("message")?,
  })
}

pub fn decode_event(row: &Row) -> Result<Event> {
  let kind = row.text("type")?;
  Ok(Event {
    idx:       row.integer("idx")?,
    callback:  row.text("callback")?,
    kind:      kind
      .parse::<EventKind>()
      .map_err(|_| CoreError::UnknownEventKind(kind))?,
    timestamp: decode_dt(&row.text("timestamp")?)?,
    init:      decode_dt(&row.text("init")?)?,
    user:      row.text("user")?,
    target:    row.text("target")?,
    message:   row.text("message")?,
  })
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone as _;

  use super::*;

  #[test]
  fn timestamps_sort_lexically() {
    let earlier = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
    let later = earlier + chrono::TimeDelta::milliseconds(1);
    assert!(encode_dt(earlier) < encode_dt(later));
    assert_eq!(encode_dt(earlier), "2026-01-02T03:04:05.000000000Z");
    assert_eq!(decode_dt(&encode_dt(later)).unwrap(), later);
  }

  #[test]
  fn sub_millisecond_gaps_survive_encoding() {
    let earlier = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
      + chrono::TimeDelta::microseconds(500);
    let later = earlier + chrono::TimeDelta::microseconds(400);
    assert!(encode_dt(earlier) < encode_dt(later));
    assert_eq!(decode_dt(&encode_dt(earlier)).unwrap(), earlier);
  }

  #[test]
  fn local_time_matches_sqlite_datetime() {
    let t = decode_local_time("2026-10-19 08:30:00").unwrap();
    assert_eq!(t.to_string(), "2026-10-19 08:30:00");
    assert!(decode_local_time("2026-10-19T08:30:00Z").is_err());
  }
}
