//! Message types for the Elm-style architecture
//!
//! All state changes of a swipe row flow through these message types: host
//! input (gestures, item touches), programmatic control, and feedback from
//! the runtime (panel measurement, finished transitions, handler outcomes).

use crate::action::{ActionDescriptor, ActionKey, Edge, Outcome};
use crate::config::SwipeConfig;
use crate::geometry::Vector;
use crate::model::RowBounds;
use crate::transition::Transition;

/// Horizontal pan recognizer input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureMsg {
    /// A pan started
    ///
    /// `visual_offset` is where the content currently is on screen, which
    /// differs from the model offset while a settle is in flight.
    Began { visual_offset: Option<f32> },
    /// Cumulative translation since `Began`, with the current velocity
    Changed { translation: Vector, velocity: Vector },
    /// The finger lifted
    Ended { velocity: Vector },
    /// The recognizer gave up (treated like a release)
    Cancelled,
}

/// Touches on action items and alerts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemMsg {
    /// Finger down on an item (index is nearest-edge-first)
    Pressed { edge: Edge, index: usize },
    /// Finger up or cancelled on an item
    Released { edge: Edge, index: usize },
    /// Completed tap on an item
    Tapped { edge: Edge, index: usize },
    /// Tap on the alert shown on `edge`
    AlertTapped { edge: Edge },
}

/// Programmatic control of a row
#[derive(Debug)]
pub enum ControlMsg {
    /// Reveal the panel on `edge` at its preferred width
    Open { edge: Edge, transition: Transition },
    /// Settle the row back to closed
    Close { transition: Transition },
    /// Apply `outcome` as if `action`'s handler had produced it
    DeliverOutcome { action: ActionKey, outcome: Outcome },
    /// Replace the action set
    SetActions(Vec<ActionDescriptor>),
    /// Replace the configuration (deferred while dragging)
    SetConfig(SwipeConfig),
    /// The row was resized or its safe-area insets changed
    SetBounds(RowBounds),
    /// The enclosing scroll container moved
    ContainerScrolled,
}

/// Panel materialization feedback
#[derive(Debug, Clone, PartialEq)]
pub enum PanelMsg {
    /// The panel requested by `Cmd::MountPanel` is on screen and measured
    Mounted {
        edge: Edge,
        generation: u64,
        /// Floored natural widths, nearest-edge-first
        widths: Vec<f32>,
    },
}

/// Identifies what a completed geometry transition was for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionToken {
    /// The reveal offset write with this sequence number
    OffsetApplied { seq: u64 },
    /// The expanded view moved back into its item after disarming
    ExpandedCollapsed { edge: Edge, generation: u64 },
    /// The alert finished fading out
    AlertDismissed { edge: Edge, generation: u64 },
}

/// Transition scheduler feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionMsg {
    /// `finished` is false when the transition was interrupted
    Finished {
        token: TransitionToken,
        finished: bool,
    },
}

/// Identifies one handler invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerTicket(pub u64);

/// Top-level message type
#[derive(Debug)]
pub enum Msg {
    Gesture(GestureMsg),
    Item(ItemMsg),
    Control(ControlMsg),
    Panel(PanelMsg),
    Transition(TransitionMsg),
    /// A handler completed the invocation identified by `ticket`
    Outcome {
        ticket: HandlerTicket,
        outcome: Outcome,
    },
}

impl From<GestureMsg> for Msg {
    fn from(msg: GestureMsg) -> Self {
        Msg::Gesture(msg)
    }
}

impl From<ItemMsg> for Msg {
    fn from(msg: ItemMsg) -> Self {
        Msg::Item(msg)
    }
}

impl From<ControlMsg> for Msg {
    fn from(msg: ControlMsg) -> Self {
        Msg::Control(msg)
    }
}
