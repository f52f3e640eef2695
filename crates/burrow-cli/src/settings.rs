//! Loading [`StoreConfig`] for the command line.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use burrow_store_sqlite::StoreConfig;

/// Read `path` (if it exists) and layer `BURROW_*` environment variables on
/// top, e.g. `BURROW_ROOT=/var/lib/burrow`.
pub fn load(path: &Path, root_override: Option<PathBuf>) -> anyhow::Result<StoreConfig> {
  let settings = config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix("BURROW"))
    .build()
    .with_context(|| format!("failed to read config file {}", path.display()))?;

  let mut store: StoreConfig = settings
    .try_deserialize()
    .context("failed to deserialise StoreConfig")?;

  if let Some(root) = root_override {
    store.root = root;
  }
  store.root = expand_tilde(&store.root);
  Ok(store)
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_yields_defaults() {
    let config = load(Path::new("does-not-exist.toml"), None).unwrap();
    assert_eq!(config.page_size, 4096);
    assert_eq!(config.max_page_count, 1000);
  }

  #[test]
  fn override_replaces_root() {
    let config = load(Path::new("does-not-exist.toml"), Some("/tmp/burrow".into())).unwrap();
    assert_eq!(config.root, PathBuf::from("/tmp/burrow"));
  }

  #[test]
  fn absolute_paths_are_untouched() {
    assert_eq!(expand_tilde(Path::new("/srv/burrow")), PathBuf::from("/srv/burrow"));
  }
}
