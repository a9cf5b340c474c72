//! Swipe Reveal - Elm-style swipe-to-reveal action panels
//!
//! This crate provides the state machine, layout and transition logic for
//! list rows that reveal action buttons when dragged horizontally. The core
//! is a pure `update(model, msg) -> cmd` function; [`SwipeRow`] runs it
//! against a host-provided [`ViewHost`].

pub mod action;
pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod geometry;
pub mod gesture;
pub mod layout;
pub mod messages;
pub mod model;
pub mod registry;
pub mod row;
pub mod rubber_band;
pub mod scheduler;
pub mod sim;
pub mod tracing;
pub mod transition;
pub mod update;

// Re-export commonly used types
pub use action::{ActionKey, ClosureAction, Edge, Outcome, RowHandle, SwipeAction};
pub use commands::Cmd;
pub use config::SwipeConfig;
pub use messages::Msg;
pub use model::{RevealState, RowBounds, SwipeModel};
pub use row::{SwipeGroup, SwipeRow, ViewHost};
pub use transition::Transition;
