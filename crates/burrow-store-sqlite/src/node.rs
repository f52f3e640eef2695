//! [`NodeStore`]: one node's store and the APIs built on it.

use std::sync::{Arc, PoisonError, RwLock};

use burrow_core::node::NodeIdentity;

use crate::{
  Result, StoreConfig,
  events::Events,
  executor::{Location, Settings},
  kv::KeyValue,
  log::LogApi,
  proxy::{Activity, StoreProxy},
  schema::SCHEMA,
};

/// A node's isolated store.
///
/// Cloning is cheap; clones share the executor, the nickname and the
/// key-value write lock.
#[derive(Clone)]
pub struct NodeStore {
  identity:  NodeIdentity,
  proxy:     StoreProxy,
  nickname:  Arc<RwLock<String>>,
  kv_writes: Arc<tokio::sync::Mutex<()>>,
}

impl NodeStore {
  /// Open (or create) the store for `address` under `config.root` and ensure
  /// its schema.
  pub async fn open(config: &StoreConfig, address: &str) -> Result<Self> {
    let identity = NodeIdentity::derive(address);
    let path = config.path_for(&identity);
    tokio::fs::create_dir_all(&config.root).await?;

    tracing::info!(node = %identity, path = %path.display(), "opening node store");
    let settings = Settings {
      location:       Location::File(path),
      page_size:      config.page_size,
      max_page_count: config.max_page_count,
      bootstrap:      SCHEMA,
    };
    let proxy = StoreProxy::spawn(&identity.name, settings).await?;
    Ok(Self::assemble(identity, proxy))
  }

  /// Open a throwaway in-memory store, mostly for tests.
  pub async fn open_in_memory(address: &str) -> Result<Self> {
    let identity = NodeIdentity::derive(address);
    let defaults = StoreConfig::default();
    let settings = Settings {
      location:       Location::Memory,
      page_size:      defaults.page_size,
      max_page_count: defaults.max_page_count,
      bootstrap:      SCHEMA,
    };
    let proxy = StoreProxy::spawn(&identity.name, settings).await?;
    Ok(Self::assemble(identity, proxy))
  }

  fn assemble(identity: NodeIdentity, proxy: StoreProxy) -> Self {
    Self {
      identity,
      proxy,
      nickname: Arc::new(RwLock::new(String::new())),
      kv_writes: Arc::new(tokio::sync::Mutex::new(())),
    }
  }

  pub fn identity(&self) -> &NodeIdentity { &self.identity }

  pub fn proxy(&self) -> &StoreProxy { &self.proxy }

  /// The node's current nickname. Messages addressed to it are not logged.
  pub fn nickname(&self) -> String {
    self.nickname.read().unwrap_or_else(PoisonError::into_inner).clone()
  }

  pub fn set_nickname(&self, nickname: impl Into<String>) {
    *self.nickname.write().unwrap_or_else(PoisonError::into_inner) = nickname.into();
  }

  // ── APIs ──────────────────────────────────────────────────────────────────

  pub fn log(&self) -> LogApi { LogApi::new(self.proxy.clone(), Arc::clone(&self.nickname)) }

  pub fn key_value(&self, namespace: impl Into<String>) -> KeyValue {
    KeyValue::new(self.proxy.clone(), namespace.into(), Arc::clone(&self.kv_writes))
  }

  /// Event API acting as `actor`, who is recorded as the scheduler of new
  /// events.
  pub fn events(&self, actor: impl Into<String>) -> Events {
    Events::new(self.proxy.clone(), actor.into())
  }

  // ── Lifecycle ─────────────────────────────────────────────────────────────

  pub fn activity(&self) -> Activity { self.proxy.activity() }

  pub fn is_closed(&self) -> bool { self.proxy.is_closed() }

  /// Close the executor. Terminal for this store and all its clones.
  pub async fn close(&self) -> Result<()> {
    tracing::info!(node = %self.identity, "closing node store");
    self.proxy.close().await
  }
}
