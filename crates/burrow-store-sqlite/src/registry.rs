//! [`NodeStores`]: the host's table of open node stores.

use std::collections::HashMap;

use burrow_core::node::NodeIdentity;
use tokio::sync::Mutex;

use crate::{NodeStore, Result, StoreConfig};

/// Open stores keyed by node identity.
///
/// A store whose executor has gone away is replaced on the next
/// [`open`](Self::open) for that node; callers never get a dead store back.
pub struct NodeStores {
  config: StoreConfig,
  nodes:  Mutex<HashMap<String, NodeStore>>,
}

impl NodeStores {
  pub fn new(config: StoreConfig) -> Self {
    Self { config, nodes: Mutex::new(HashMap::new()) }
  }

  pub fn config(&self) -> &StoreConfig { &self.config }

  /// The live store for `address`, opening it if needed.
  pub async fn open(&self, address: &str) -> Result<NodeStore> {
    let identity = NodeIdentity::derive(address);
    let mut nodes = self.nodes.lock().await;

    if let Some(store) = nodes.get(&identity.name) {
      if !store.is_closed() {
        return Ok(store.clone());
      }
      tracing::info!(node = %identity, "store channel closed; reopening");
    }

    let store = NodeStore::open(&self.config, address).await?;
    nodes.insert(identity.name, store.clone());
    Ok(store)
  }

  /// Close and forget the store for `address`. Returns whether one was open.
  pub async fn close(&self, address: &str) -> Result<bool> {
    let identity = NodeIdentity::derive(address);
    let store = self.nodes.lock().await.remove(&identity.name);
    match store {
      Some(store) => {
        store.close().await?;
        Ok(true)
      }
      None => Ok(false),
    }
  }

  /// Close every open store.
  pub async fn close_all(&self) -> Result<()> {
    let stores: Vec<NodeStore> = self.nodes.lock().await.drain().map(|(_, s)| s).collect();
    for store in stores {
      store.close().await?;
    }
    Ok(())
  }

  pub async fn len(&self) -> usize { self.nodes.lock().await.len() }

  pub async fn is_empty(&self) -> bool { self.nodes.lock().await.is_empty() }
}
