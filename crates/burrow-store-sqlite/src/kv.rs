//! Namespaced key-value storage.
//!
//! The table has no uniqueness constraint on `(namespace, key)`. `set` reads
//! before it writes, and writes on one node are serialised so two `set`s on
//! the same key can never both see "absent" and both insert.

use std::sync::Arc;

use burrow_core::{params, value::Value};
use tokio::sync::Mutex;

use crate::{Result, StoreProxy};

const GET: &str = "SELECT \"value\" FROM store WHERE namespace = ? AND \"key\" = ?";

const INSERT: &str = "INSERT INTO store (\"value\", namespace, \"key\") VALUES (?, ?, ?)";

const UPDATE: &str = "UPDATE store SET \"value\" = ? WHERE namespace = ? AND \"key\" = ?";

const DELETE: &str = "DELETE FROM store WHERE namespace = ? AND \"key\" = ?";

const ALL: &str = "SELECT \"key\", \"value\" FROM store WHERE namespace = ? ORDER BY idx";

/// Key-value view of one namespace.
#[derive(Clone)]
pub struct KeyValue {
  proxy:     StoreProxy,
  namespace: String,
  writes:    Arc<Mutex<()>>,
}

impl KeyValue {
  pub(crate) fn new(proxy: StoreProxy, namespace: String, writes: Arc<Mutex<()>>) -> Self {
    Self { proxy, namespace, writes }
  }

  pub fn namespace(&self) -> &str { &self.namespace }

  /// The stored value, `None` when there is no row for `key`.
  async fn lookup(&self, key: &str) -> Result<Option<Value>> {
    let rows = self.proxy.call(GET, params![&self.namespace, key]).await?;
    Ok(rows.into_iter().next().and_then(|row| row.into_values().into_iter().next()))
  }

  /// Read `key` as text.
  pub async fn get(&self, key: &str) -> Result<Option<String>> {
    Ok(
      self
        .lookup(key)
        .await?
        .map(|value| value.to_text().unwrap_or_default()),
    )
  }

  /// Store `value` under `key`, or delete the key when `value` is `None`.
  /// Deleting a missing key is a no-op.
  pub async fn set(&self, key: &str, value: Option<&str>) -> Result<()> {
    let _guard = self.writes.lock().await;
    let exists = self.lookup(key).await?.is_some();

    match (value, exists) {
      (None, false) => {}
      (None, true) => {
        self.proxy.call(DELETE, params![&self.namespace, key]).await?;
      }
      (Some(value), false) => {
        self.proxy.call(INSERT, params![value, &self.namespace, key]).await?;
      }
      (Some(value), true) => {
        self.proxy.call(UPDATE, params![value, &self.namespace, key]).await?;
      }
    }
    Ok(())
  }

  /// Shorthand for `set(key, None)`.
  pub async fn unset(&self, key: &str) -> Result<()> { self.set(key, None).await }

  /// Every `(key, value)` pair in the namespace, oldest key first.
  pub async fn all(&self) -> Result<Vec<(String, String)>> {
    let rows = self.proxy.call(ALL, params![&self.namespace]).await?;
    rows
      .iter()
      .map(|row| -> Result<(String, String)> { Ok((row.text("key")?, row.text("value")?)) })
      .collect()
  }
}
