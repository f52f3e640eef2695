//! SQLite backend for burrow node stores.
//!
//! Each node's database lives behind a dedicated executor thread that owns
//! the only connection to it. The host talks to that thread through a
//! [`StoreProxy`], which pairs requests and responses by correlation id.
//! Every query is checked by [`burrow_sanitize`] on the executor side before
//! it is compiled.

mod cache;
mod encode;
mod executor;
mod schema;

pub mod config;
pub mod error;
pub mod events;
pub mod kv;
pub mod log;
pub mod node;
pub mod protocol;
pub mod proxy;
pub mod registry;

pub use config::StoreConfig;
pub use error::{Error, Result};
pub use events::Events;
pub use kv::KeyValue;
pub use log::{LogApi, Page, TargetLog};
pub use node::NodeStore;
pub use proxy::{Activity, StoreProxy};
pub use registry::NodeStores;
