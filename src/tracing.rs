//! Debug tracing infrastructure for development diagnostics
//!
//! Provides structured logging with scoped filtering for debugging gesture
//! handling, panel lifecycle, and state transitions.
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=gesture=trace,panel=debug` - scoped filtering
//! - `RUST_LOG=swipe_reveal::update=debug` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/swipe-reveal/logs/swipe-sim.log` with daily rotation.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::model::{Phase, SwipeModel};

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG and defaults to warnings only. The file
/// layer always records debug level.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "swipe-sim.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight snapshot of row state for diffing
#[derive(Debug, Clone, PartialEq)]
pub struct StateSnapshot {
    pub phase: Phase,
    pub offset: f32,
    pub left_panel: Option<u64>,
    pub right_panel: Option<u64>,
    pub expanded: bool,
    pub alert: bool,
}

impl StateSnapshot {
    pub fn from_model(model: &SwipeModel) -> Self {
        let state = model.reveal_state();
        Self {
            phase: model.phase,
            offset: model.offset,
            left_panel: model.panels.left.as_ref().map(|p| p.generation),
            right_panel: model.panels.right.as_ref().map(|p| p.generation),
            expanded: state.is_expanded,
            alert: state.is_alert_showing,
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &StateSnapshot) -> Option<String> {
        let mut changes = Vec::new();
        if self.phase != other.phase {
            changes.push(format!("phase: {:?} → {:?}", self.phase, other.phase));
        }
        if self.offset != other.offset {
            changes.push(format!("offset: {} → {}", self.offset, other.offset));
        }
        if self.left_panel != other.left_panel {
            changes.push(format!(
                "left panel: {:?} → {:?}",
                self.left_panel, other.left_panel
            ));
        }
        if self.right_panel != other.right_panel {
            changes.push(format!(
                "right panel: {:?} → {:?}",
                self.right_panel, other.right_panel
            ));
        }
        if self.expanded != other.expanded {
            changes.push(format!("expanded: {}", other.expanded));
        }
        if self.alert != other.alert {
            changes.push(format!("alert: {}", other.alert));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}
