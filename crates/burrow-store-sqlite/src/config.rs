//! Store configuration.

use std::path::{Path, PathBuf};

use burrow_core::node::NodeIdentity;
use serde::Deserialize;

/// Where node stores live and how large each may grow.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
  /// Directory holding one database file per node.
  #[serde(default = "default_root")]
  pub root:           PathBuf,
  /// SQLite page size in bytes, applied when a store is created.
  #[serde(default = "default_page_size")]
  pub page_size:      u32,
  /// Hard cap on the number of pages per store.
  #[serde(default = "default_max_page_count")]
  pub max_page_count: u32,
}

fn default_root() -> PathBuf { PathBuf::from("storage/namespace") }

fn default_page_size() -> u32 { 4096 }

fn default_max_page_count() -> u32 { 1000 }

impl Default for StoreConfig {
  fn default() -> Self {
    Self {
      root:           default_root(),
      page_size:      default_page_size(),
      max_page_count: default_max_page_count(),
    }
  }
}

impl StoreConfig {
  pub fn with_root(root: impl AsRef<Path>) -> Self {
    Self { root: root.as_ref().to_path_buf(), ..Self::default() }
  }

  /// Path of the database file for `identity`.
  pub fn path_for(&self, identity: &NodeIdentity) -> PathBuf {
    self.root.join(identity.file_name())
  }
}
