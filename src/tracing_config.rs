//! Tracing configuration for debugging inference.
//!
//! Supports three output formats controlled by `TYPARG_LOG_FORMAT`:
//!
//! - `text` (default): standard `tracing-subscriber` flat output
//! - `tree`: hierarchical indented output via `tracing-tree`
//! - `json`: one JSON object per span/event
//!
//! ## Quick start
//!
//! ```bash
//! # Every binding decision, as a tree
//! TYPARG_LOG=trace TYPARG_LOG_FORMAT=tree cargo test -p typarg
//!
//! # Only inference failures from the solver
//! TYPARG_LOG="typarg_solver::infer=debug" cargo test
//! ```
//!
//! The subscriber is only initialised when `TYPARG_LOG` (or `RUST_LOG`) is
//! set, so hosts that never ask for logs pay nothing.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Standard flat text lines.
    #[default]
    Text,
    /// Hierarchical indented tree via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    /// Parse a format name. Unrecognised names fall back to `Text`.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var("TYPARG_LOG_FORMAT").unwrap_or_default())
    }
}

/// `TYPARG_LOG` takes precedence over `RUST_LOG` when both are set.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("TYPARG_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Initialise the global tracing subscriber.
///
/// Does nothing when neither `TYPARG_LOG` nor `RUST_LOG` is set. Output
/// goes to stderr. Calling this again after a subscriber is installed is a
/// no-op.
pub fn init_tracing() {
    let has_typarg_log = std::env::var("TYPARG_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_typarg_log && !has_rust_log {
        return;
    }

    let filter = build_filter();
    // `try_init`: a second call, or a host that already installed a
    // subscriber, keeps the existing one.
    match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_span_retrace(true)
                .with_targets(true);

            let _ = Registry::default().with(filter).with(tree_layer).try_init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);

            let _ = Registry::default().with(filter).with(json_layer).try_init();
        }
        LogFormat::Text => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}
