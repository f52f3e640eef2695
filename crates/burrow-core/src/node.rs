//! Node identity: the stable, filesystem-safe name of a node's store.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Identity derived from a node address.
///
/// `name` keeps only `[A-Za-z0-9.]` from the address; `digest` is the
/// SHA-256 of `name` and names the backing file, so the file name never
/// carries characters from the address itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeIdentity {
  pub name:   String,
  pub digest: String,
}

impl NodeIdentity {
  pub fn derive(address: &str) -> Self {
    let name: String = address
      .chars()
      .filter(|c| c.is_ascii_alphanumeric() || *c == '.')
      .collect();
    let digest = hex::encode(Sha256::digest(name.as_bytes()));
    Self { name, digest }
  }

  /// File name of the backing store, relative to the storage root.
  pub fn file_name(&self) -> String { format!("{}.db", self.digest) }
}

impl fmt::Display for NodeIdentity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.name) }
}
