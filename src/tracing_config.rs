//! Tracing configuration for the `tsguard` binary.
//!
//! Supports three output formats controlled by `TSGUARD_LOG_FORMAT`:
//!
//! - `text` (default): standard `tracing-subscriber` flat output
//! - `tree`: hierarchical indented output via `tracing-tree`, one level per
//!   nested call site and type compilation
//! - `json`: one JSON object per span/event
//!
//! ## Quick start
//!
//! ```bash
//! # Follow the structural compiler through a snapshot
//! TSGUARD_LOG=trace TSGUARD_LOG_FORMAT=tree tsguard emit snapshot.json
//!
//! # Only call-site level events
//! TSGUARD_LOG="tsguard_compiler::call_site=debug" tsguard emit snapshot.json
//! ```
//!
//! The subscriber is only initialised when `TSGUARD_LOG` (or `RUST_LOG`) is
//! set, so there is no overhead otherwise.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

const LOG_VAR: &str = "TSGUARD_LOG";
const FORMAT_VAR: &str = "TSGUARD_LOG_FORMAT";

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Tree,
    Json,
}

impl LogFormat {
    /// Parse a `TSGUARD_LOG_FORMAT` value. Unknown values mean [`Text`](Self::Text).
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var(FORMAT_VAR).unwrap_or_default())
    }
}

/// `TSGUARD_LOG` takes precedence over `RUST_LOG` when both are set.
fn build_filter() -> EnvFilter {
    match std::env::var(LOG_VAR) {
        Ok(directives) => EnvFilter::builder().parse_lossy(directives),
        Err(_) => EnvFilter::from_default_env(),
    }
}

/// Initialise the global tracing subscriber. All output goes to stderr so it
/// never mixes with emitted JavaScript on stdout.
pub fn init_tracing() {
    if std::env::var_os(LOG_VAR).is_none() && std::env::var_os("RUST_LOG").is_none() {
        return;
    }

    let filter = build_filter();
    match LogFormat::from_env() {
        LogFormat::Tree => {
            // HierarchicalLayer writes to stderr by default.
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_targets(true);
            Registry::default().with(filter).with(tree_layer).init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
