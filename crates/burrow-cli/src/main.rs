//! `burrow`: inspect and edit node stores from the command line.
//!
//! # Usage
//!
//! ```
//! burrow identity irc.example.org
//! burrow log --node irc.example.org search --target '#general' hello --limit 5
//! burrow kv --node irc.example.org --namespace prefs set colour green
//! burrow events --node irc.example.org ticks
//! ```
//!
//! Store settings come from `burrow.toml` (or `--config`), overridden by
//! `BURROW_*` environment variables. Results are printed as JSON on stdout;
//! logs go to stderr.

mod commands;
mod settings;

use std::path::PathBuf;

use anyhow::Context as _;
use burrow_core::event::EventKind;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "burrow", version, about = "Inspect and edit burrow node stores")]
struct Cli {
  /// Path to a TOML config file (root, page_size, max_page_count).
  #[arg(short, long, value_name = "FILE", default_value = "burrow.toml")]
  config: PathBuf,

  /// Directory holding node stores; overrides the config file.
  #[arg(long, value_name = "DIR")]
  root: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Show the identity and database path derived from a node address.
  Identity { address: String },

  /// Read or append to a node's message log.
  Log {
    #[arg(long)]
    node:     String,
    /// The node's own nickname; messages addressed to it are not logged.
    #[arg(long, default_value = "")]
    nickname: String,
    #[command(subcommand)]
    action:   LogAction,
  },

  /// Key-value storage in one namespace.
  Kv {
    #[arg(long)]
    node:      String,
    #[arg(long)]
    namespace: String,
    #[command(subcommand)]
    action:    KvAction,
  },

  /// The deferred-event schedule.
  Events {
    #[arg(long)]
    node:   String,
    /// Recorded as the scheduler of new events.
    #[arg(long, default_value = "burrow")]
    actor:  String,
    #[command(subcommand)]
    action: EventAction,
  },
}

#[derive(Args, Debug, Clone, Copy)]
struct PageArgs {
  #[arg(long, default_value_t = 1)]
  limit:  u32,
  #[arg(long, default_value_t = 0)]
  offset: u32,
}

#[derive(Subcommand, Debug)]
enum LogAction {
  /// Feed one protocol event through log ingestion.
  Record {
    #[arg(long)]
    nick:    Option<String>,
    command: String,
    args:    Vec<String>,
  },
  /// Messages to a target containing text.
  Search {
    #[arg(long)]
    target: String,
    text:   String,
    #[command(flatten)]
    page:   PageArgs,
  },
  /// Messages anywhere containing text.
  Global {
    text: String,
    #[command(flatten)]
    page: PageArgs,
  },
  /// Messages by one user, optionally containing text.
  User {
    name: String,
    #[arg(default_value = "")]
    text: String,
    #[command(flatten)]
    page: PageArgs,
  },
  /// How many messages contain text.
  Count { text: String },
  /// Messages to a target matching a regular expression.
  Regex {
    #[arg(long)]
    target:  String,
    pattern: String,
    #[command(flatten)]
    page:    PageArgs,
  },
  /// Random messages sent to a target.
  Random {
    #[arg(long)]
    target: String,
    #[arg(short, default_value_t = 1)]
    n:      u32,
  },
}

#[derive(Subcommand, Debug)]
enum KvAction {
  Get { key: String },
  Set { key: String, value: String },
  Unset { key: String },
  /// Every pair in the namespace.
  List,
}

#[derive(Subcommand, Debug)]
enum EventAction {
  /// Schedule an event. Unknown kinds are ignored.
  Schedule {
    kind:     String,
    callback: String,
    /// RFC 3339 fire time; defaults to now.
    #[arg(long)]
    at:       Option<DateTime<Utc>>,
    #[arg(long, default_value = "")]
    target:   String,
    #[arg(long, default_value = "")]
    message:  String,
  },
  /// Due `speak` events for a target.
  Speak { target: String },
  /// Due `tick` events.
  Ticks,
  /// Every scheduled event of a kind with a callback, due or not.
  Pending { kind: EventKind, callback: String },
  /// Remove an event that has been handled.
  Ack { idx: i64 },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let store_config =
    settings::load(&cli.config, cli.root).context("failed to load configuration")?;

  commands::run(&store_config, cli.command).await
}
