//! Core types for the burrow per-node store.
//!
//! This crate is deliberately free of database and runtime dependencies. It
//! holds the values that cross the executor channel, the node identity
//! derivation, and the domain records of the log and event tables.

pub mod error;
pub mod event;
pub mod log;
pub mod node;
pub mod value;

pub use error::{Error, Result};
