//! Message log records.
//!
//! A protocol event seen by a node is reduced to at most one [`LogRecord`]
//! before it is written. Rows read back are [`LogEntry`]s.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

// ─── Command vocabulary ──────────────────────────────────────────────────────

/// The protocol commands that are written to the log. Anything else is
/// dropped at ingestion.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString, Serialize,
  Deserialize,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Command {
  Join,
  Part,
  Nick,
  Kick,
  Kill,
  Notice,
  Mode,
  Privmsg,
  Quit,
  Topic,
}

// ─── Ingestion ───────────────────────────────────────────────────────────────

/// A protocol event as delivered by the chat client: source nick, command
/// word and positional arguments (trailing argument included).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolEvent {
  pub nick:    Option<String>,
  pub command: String,
  #[serde(default)]
  pub args:    Vec<String>,
}

impl ProtocolEvent {
  pub fn new(
    nick: impl Into<String>,
    command: impl Into<String>,
    args: impl IntoIterator<Item = impl Into<String>>,
  ) -> Self {
    Self {
      nick:    Some(nick.into()),
      command: command.into(),
      args:    args.into_iter().map(Into::into).collect(),
    }
  }
}

/// The row a protocol event reduces to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
  pub user:    String,
  pub command: Command,
  pub target:  String,
  pub message: String,
}

impl LogRecord {
  /// Reduce `event` to a log row, or `None` if it is not logged.
  ///
  /// `QUIT` has no target; its whole argument list is the reason. Every other
  /// tracked command needs a source nick and is skipped when addressed to
  /// `own_nick`, so private messages to the node never reach the log.
  pub fn from_event(event: &ProtocolEvent, own_nick: &str) -> Option<Self> {
    let command: Command = event.command.parse().ok()?;

    if command == Command::Quit {
      return Some(Self {
        user: event.nick.clone().unwrap_or_default(),
        command,
        target: String::new(),
        message: event.args.join(" "),
      });
    }

    let user = event.nick.as_deref().filter(|nick| !nick.is_empty())?;
    if event.args.first().is_some_and(|first| first == own_nick) {
      return None;
    }

    let (target, message) = match event.args.split_first() {
      Some((target, rest)) => (target.clone(), rest.join(" ")),
      None => (String::new(), String::new()),
    };

    Some(Self { user: user.to_owned(), command, target, message })
  }
}

// ─── Stored entries ──────────────────────────────────────────────────────────

/// A row of the `log` table. `time` is the store's local wall-clock time at
/// insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
  pub idx:     i64,
  pub time:    NaiveDateTime,
  pub user:    String,
  pub command: Command,
  pub target:  String,
  pub message: String,
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator as _;

  use super::*;

  #[test]
  fn vocabulary_round_trips_through_strings() {
    for command in Command::iter() {
      assert_eq!(command.as_ref().parse::<Command>().unwrap(), command);
    }
    assert_eq!(Command::Privmsg.as_ref(), "PRIVMSG");
  }

  #[test]
  fn channel_message_splits_target_and_text() {
    let event = ProtocolEvent::new("alice", "PRIVMSG", ["#general", "hello", "world"]);
    let record = LogRecord::from_event(&event, "burrow").unwrap();
    assert_eq!(record, LogRecord {
      user:    "alice".into(),
      command: Command::Privmsg,
      target:  "#general".into(),
      message: "hello world".into(),
    });
  }

  #[test]
  fn quit_has_empty_target_and_joined_reason() {
    let event = ProtocolEvent::new("bob", "QUIT", ["burrow", "Ping", "timeout"]);
    let record = LogRecord::from_event(&event, "burrow").unwrap();
    assert_eq!(record.target, "");
    assert_eq!(record.message, "burrow Ping timeout");
  }

  #[test]
  fn private_message_to_node_is_skipped() {
    let event = ProtocolEvent::new("carol", "PRIVMSG", ["burrow", "psst"]);
    assert!(LogRecord::from_event(&event, "burrow").is_none());
  }

  #[test]
  fn untracked_command_is_skipped() {
    let event = ProtocolEvent::new("server", "PING", ["12345"]);
    assert!(LogRecord::from_event(&event, "burrow").is_none());
  }

  #[test]
  fn command_match_is_case_sensitive() {
    let event = ProtocolEvent::new("alice", "privmsg", ["#general", "hi"]);
    assert!(LogRecord::from_event(&event, "burrow").is_none());
  }

  #[test]
  fn sourceless_event_is_skipped() {
    let event = ProtocolEvent {
      nick:    None,
      command: "MODE".into(),
      args:    vec!["#general".into(), "+o".into()],
    };
    assert!(LogRecord::from_event(&event, "burrow").is_none());
  }

  #[test]
  fn argumentless_event_has_empty_fields() {
    let event = ProtocolEvent::new("dave", "NICK", Vec::<String>::new());
    let record = LogRecord::from_event(&event, "burrow").unwrap();
    assert_eq!((record.target.as_str(), record.message.as_str()), ("", ""));
  }
}
