//! The deferred-event schedule.
//!
//! Reading due events does not remove them. A caller acts on an event and
//! then [`acknowledge`](Events::acknowledge)s it; until it does, every poll
//! returns the event again.

use burrow_core::{
  event::{Event, EventKind, NewEvent},
  params,
  value::Value,
};
use chrono::{DateTime, Utc};

use crate::{Result, StoreProxy, encode};

const INSERT: &str = "
  INSERT INTO events (callback, \"type\", \"timestamp\", init, \"user\", target, message)
  VALUES (?, ?, ?, ?, ?, ?, ?)
  RETURNING idx
";

const DUE_SPEAK: &str = "
  SELECT * FROM events
  WHERE \"timestamp\" < ?
    AND \"type\" = 'speak'
    AND UPPER(target) = UPPER(?)
  ORDER BY \"timestamp\", idx
";

const DUE_TICK: &str = "
  SELECT * FROM events
  WHERE \"timestamp\" < ?
    AND \"type\" = 'tick'
  ORDER BY \"timestamp\", idx
";

const PENDING: &str = "
  SELECT * FROM events
  WHERE \"type\" = ? AND callback = ?
  ORDER BY \"timestamp\", idx
";

const DELETE: &str = "DELETE FROM events WHERE idx = ? RETURNING idx";

/// Schedules events on behalf of one actor and polls the node's schedule.
#[derive(Clone)]
pub struct Events {
  proxy: StoreProxy,
  actor: String,
}

impl Events {
  pub(crate) fn new(proxy: StoreProxy, actor: String) -> Self { Self { proxy, actor } }

  pub fn actor(&self) -> &str { &self.actor }

  async fn events(&self, query: &str, params: Vec<Value>) -> Result<Vec<Event>> {
    let rows = self.proxy.call(query, params).await?;
    rows.iter().map(encode::decode_event).collect()
  }

  // ── Scheduling ────────────────────────────────────────────────────────────

  /// Schedule an event of kind `kind` (`"speak"` or `"tick"`).
  ///
  /// Any other kind is dropped without writing a row and yields `None`.
  pub async fn schedule(&self, kind: &str, event: NewEvent) -> Result<Option<i64>> {
    match kind.parse::<EventKind>() {
      Ok(kind) => self.schedule_kind(kind, event).await.map(Some),
      Err(_) => {
        tracing::debug!(kind, callback = %event.callback, "dropping event of unknown kind");
        Ok(None)
      }
    }
  }

  /// Schedule an event and return its `idx`. `init` is stamped with the
  /// current time and `user` with this API's actor.
  pub async fn schedule_kind(&self, kind: EventKind, event: NewEvent) -> Result<i64> {
    let now = Utc::now();
    let rows = self
      .proxy
      .call(
        INSERT,
        params![
          event.callback,
          kind.as_ref(),
          encode::encode_dt(event.time.unwrap_or(now)),
          encode::encode_dt(now),
          &self.actor,
          event.target,
          event.message,
        ],
      )
      .await?;
    encode::first_idx(&rows)?
      .ok_or_else(|| crate::Error::Execution("insert returned no idx".into()))
  }

  // ── Polling ───────────────────────────────────────────────────────────────

  /// `speak` events for `target` (matched case-insensitively) that are due.
  pub async fn due_speak_events(&self, target: &str) -> Result<Vec<Event>> {
    self.due_speak_events_at(target, Utc::now()).await
  }

  /// `speak` events for `target` with a fire time strictly before `now`.
  pub async fn due_speak_events_at(&self, target: &str, now: DateTime<Utc>) -> Result<Vec<Event>> {
    self
      .events(DUE_SPEAK, params![encode::encode_dt(now), target])
      .await
  }

  /// `tick` events, for every target, that are due.
  pub async fn due_tick_events(&self) -> Result<Vec<Event>> {
    self.due_tick_events_at(Utc::now()).await
  }

  pub async fn due_tick_events_at(&self, now: DateTime<Utc>) -> Result<Vec<Event>> {
    self.events(DUE_TICK, params![encode::encode_dt(now)]).await
  }

  /// Every scheduled `speak` event with this callback, due or not.
  pub async fn pending_speak_events(&self, callback: &str) -> Result<Vec<Event>> {
    self
      .events(PENDING, params![EventKind::Speak.as_ref(), callback])
      .await
  }

  /// Every scheduled `tick` event with this callback, due or not.
  pub async fn pending_tick_events(&self, callback: &str) -> Result<Vec<Event>> {
    self
      .events(PENDING, params![EventKind::Tick.as_ref(), callback])
      .await
  }

  /// Remove an event once it has been acted on. Returns whether a row was
  /// removed.
  pub async fn acknowledge(&self, idx: i64) -> Result<bool> {
    let rows = self.proxy.call(DELETE, params![idx]).await?;
    Ok(!rows.is_empty())
  }
}
