//! Subcommand handlers. Each opens the node's store, does one thing, prints
//! the result as JSON and closes the store again.

use anyhow::Context as _;
use burrow_core::{
  event::{EventKind, NewEvent},
  log::ProtocolEvent,
  node::NodeIdentity,
};
use burrow_store_sqlite::{NodeStore, Page, StoreConfig};
use serde::Serialize;
use serde_json::json;

use crate::{Command, EventAction, KvAction, LogAction, PageArgs};

impl From<PageArgs> for Page {
  fn from(args: PageArgs) -> Self { Page::new(args.limit, args.offset) }
}

fn emit(value: &impl Serialize) -> anyhow::Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

pub async fn run(config: &StoreConfig, command: Command) -> anyhow::Result<()> {
  let (node, action) = match command {
    Command::Identity { address } => {
      let identity = NodeIdentity::derive(&address);
      return emit(&json!({
        "name":   identity.name,
        "digest": identity.digest,
        "path":   config.path_for(&identity),
      }));
    }
    Command::Log { node, nickname, action } => (node, Action::Log { nickname, action }),
    Command::Kv { node, namespace, action } => (node, Action::Kv { namespace, action }),
    Command::Events { node, actor, action } => (node, Action::Events { actor, action }),
  };

  let store = NodeStore::open(config, &node)
    .await
    .with_context(|| format!("failed to open store for {node:?}"))?;
  let result = action.apply(&store).await;
  store.close().await.context("failed to close store")?;
  result
}

enum Action {
  Log { nickname: String, action: LogAction },
  Kv { namespace: String, action: KvAction },
  Events { actor: String, action: EventAction },
}

impl Action {
  async fn apply(self, store: &NodeStore) -> anyhow::Result<()> {
    match self {
      Action::Log { nickname, action } => {
        store.set_nickname(nickname);
        log(store, action).await
      }
      Action::Kv { namespace, action } => kv(store, namespace, action).await,
      Action::Events { actor, action } => events(store, actor, action).await,
    }
  }
}

// ─── Log ──────────────────────────────────────────────────────────────────────

async fn log(store: &NodeStore, action: LogAction) -> anyhow::Result<()> {
  let log = store.log();
  match action {
    LogAction::Record { nick, command, args } => {
      let idx = log.record(&ProtocolEvent { nick, command, args }).await?;
      emit(&json!({ "idx": idx }))
    }
    LogAction::Search { target, text, page } => {
      emit(&log.for_target(target).search(&text, page.into()).await?)
    }
    LogAction::Global { text, page } => {
      emit(&log.for_target("").search_global(&text, page.into()).await?)
    }
    LogAction::User { name, text, page } => {
      emit(&log.for_target("").search_by_user(&name, &text, page.into()).await?)
    }
    LogAction::Count { text } => {
      emit(&json!({ "count": log.for_target("").count(&text).await? }))
    }
    LogAction::Regex { target, pattern, page } => {
      emit(&log.for_target(target).search_regex(&pattern, page.into()).await?)
    }
    LogAction::Random { target, n } => emit(&log.for_target(target).random_sample(n).await?),
  }
}

// ─── Key-value ────────────────────────────────────────────────────────────────

async fn kv(store: &NodeStore, namespace: String, action: KvAction) -> anyhow::Result<()> {
  let kv = store.key_value(namespace);
  match action {
    KvAction::Get { key } => {
      let value = kv.get(&key).await?;
      emit(&json!({ "key": key, "value": value }))
    }
    KvAction::Set { key, value } => {
      kv.set(&key, Some(&value)).await?;
      emit(&json!({ "key": key, "value": value }))
    }
    KvAction::Unset { key } => {
      kv.unset(&key).await?;
      emit(&json!({ "key": key, "value": null }))
    }
    KvAction::List => {
      let pairs: serde_json::Map<String, serde_json::Value> = kv
        .all()
        .await?
        .into_iter()
        .map(|(key, value)| (key, value.into()))
        .collect();
      emit(&pairs)
    }
  }
}

// ─── Events ───────────────────────────────────────────────────────────────────

async fn events(store: &NodeStore, actor: String, action: EventAction) -> anyhow::Result<()> {
  let events = store.events(actor);
  match action {
    EventAction::Schedule { kind, callback, at, target, message } => {
      let mut event = NewEvent::new(callback).target(target).message(message);
      event.time = at;
      let idx = events.schedule(&kind, event).await?;
      if idx.is_none() {
        tracing::warn!(%kind, "unknown event kind; nothing scheduled");
      }
      emit(&json!({ "idx": idx }))
    }
    EventAction::Speak { target } => emit(&events.due_speak_events(&target).await?),
    EventAction::Ticks => emit(&events.due_tick_events().await?),
    EventAction::Pending { kind, callback } => {
      let pending = match kind {
        EventKind::Speak => events.pending_speak_events(&callback).await?,
        EventKind::Tick => events.pending_tick_events(&callback).await?,
      };
      emit(&pending)
    }
    EventAction::Ack { idx } => {
      emit(&json!({ "idx": idx, "removed": events.acknowledge(idx).await? }))
    }
  }
}
