//! Deferred events: the node's schedule of things to say or do later.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// How an event fires.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
  /// Delivered to a target when that target next becomes active.
  Speak,
  /// Delivered by the node's periodic tick, regardless of target.
  Tick,
}

/// Input to scheduling. `time` defaults to now.
#[derive(Debug, Clone, Default)]
pub struct NewEvent {
  pub callback: String,
  pub time:     Option<DateTime<Utc>>,
  pub message:  String,
  pub target:   String,
}

impl NewEvent {
  pub fn new(callback: impl Into<String>) -> Self {
    Self { callback: callback.into(), ..Self::default() }
  }

  pub fn at(mut self, time: DateTime<Utc>) -> Self {
    self.time = Some(time);
    self
  }

  pub fn target(mut self, target: impl Into<String>) -> Self {
    self.target = target.into();
    self
  }

  pub fn message(mut self, message: impl Into<String>) -> Self {
    self.message = message.into();
    self
  }
}

/// A row of the `events` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
  pub idx:       i64,
  pub callback:  String,
  pub kind:      EventKind,
  /// When the event becomes due.
  pub timestamp: DateTime<Utc>,
  /// When the event was scheduled.
  pub init:      DateTime<Utc>,
  /// Who scheduled it.
  pub user:      String,
  pub target:    String,
  pub message:   String,
}

impl Event {
  pub fn is_due_at(&self, now: DateTime<Utc>) -> bool { self.timestamp < now }
}

#[cfg(test)]
mod tests {
  use chrono::TimeDelta;

  use super::*;

  #[test]
  fn kind_parses_lowercase_only() {
    assert_eq!("speak".parse::<EventKind>().unwrap(), EventKind::Speak);
    assert_eq!(EventKind::Tick.as_ref(), "tick");
    assert!("Speak".parse::<EventKind>().is_err());
    assert!("remind".parse::<EventKind>().is_err());
  }

  #[test]
  fn due_is_strictly_before_now() {
    let now = Utc::now();
    let event = Event {
      idx:       1,
      callback:  "heartbeat".into(),
      kind:      EventKind::Tick,
      timestamp: now,
      init:      now - TimeDelta::seconds(5),
      user:      "alice".into(),
      target:    String::new(),
      message:   String::new(),
    };
    assert!(!event.is_due_at(now));
    assert!(event.is_due_at(now + TimeDelta::milliseconds(1)));
  }

  #[test]
  fn builder_fills_optional_fields() {
    let at = Utc::now();
    let event = NewEvent::new("remind").at(at).target("#x").message("hi");
    assert_eq!(event.time, Some(at));
    assert_eq!(event.target, "#x");
    assert_eq!(event.message, "hi");
  }
}
