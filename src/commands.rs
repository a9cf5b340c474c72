//! Command types for the Elm-style architecture
//!
//! Commands represent side effects the row runtime performs after an update:
//! geometry writes, view mounting, handler invocation, and sibling control.

use crate::action::{ActionEvent, ActionKey, Edge, OnComplete};
use crate::geometry::Rect;
use crate::messages::{HandlerTicket, TransitionToken};
use crate::transition::Transition;

/// A view position the host maintains
///
/// Indices are nearest-edge-first, matching the action order on that edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ViewSlot {
    /// The row's own content
    Content,
    /// The panel container on one edge
    Panel(Edge),
    /// An action item inside a panel
    Item { edge: Edge, index: usize },
    /// Press-highlight overlay of an item
    Highlight { edge: Edge, index: usize },
    /// Dedicated expanded content of the armed edge-most action
    Expanded(Edge),
    /// Alert content shown after an `Alert` outcome
    Alert(Edge),
}

impl ViewSlot {
    pub fn edge(&self) -> Option<Edge> {
        match *self {
            ViewSlot::Content => None,
            ViewSlot::Panel(edge) | ViewSlot::Expanded(edge) | ViewSlot::Alert(edge) => Some(edge),
            ViewSlot::Item { edge, .. } | ViewSlot::Highlight { edge, .. } => Some(edge),
        }
    }
}

/// A single geometry property value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    Frame(Rect),
    Opacity(f32),
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Frame(_) => GeometryKind::Frame,
            Geometry::Opacity(_) => GeometryKind::Opacity,
        }
    }

    /// Interpolate toward `target`; mismatched kinds snap to the target
    pub fn lerp(&self, target: &Geometry, fraction: f32) -> Geometry {
        match (self, target) {
            (Geometry::Frame(a), Geometry::Frame(b)) => Geometry::Frame(a.lerp(b, fraction)),
            (Geometry::Opacity(a), Geometry::Opacity(b)) => {
                Geometry::Opacity(crate::geometry::lerp(*a, *b, fraction))
            }
            _ => *target,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Frame,
    Opacity,
}

/// One property write for one slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryUpdate {
    pub slot: ViewSlot,
    pub value: Geometry,
}

impl GeometryUpdate {
    pub fn frame(slot: ViewSlot, rect: Rect) -> Self {
        Self {
            slot,
            value: Geometry::Frame(rect),
        }
    }

    pub fn opacity(slot: ViewSlot, opacity: f32) -> Self {
        Self {
            slot,
            value: Geometry::Opacity(opacity),
        }
    }
}

/// Commands returned by update functions
#[derive(Debug)]
pub enum Cmd {
    /// Apply geometry writes as one transition group
    ///
    /// When the group completes (or immediately when nothing changed) the
    /// runtime sends `TransitionMsg::Finished` for `token`.
    SetGeometry {
        updates: Vec<GeometryUpdate>,
        transition: Transition,
        token: Option<TransitionToken>,
    },
    /// Freeze every in-flight animation at its current visual value
    StopAnimations,
    /// Materialize and measure the panel for `edge`
    /// Sends `PanelMsg::Mounted` when done
    MountPanel { edge: Edge, generation: u64 },
    /// Remove the panel for `edge` and everything inside it
    UnmountPanel { edge: Edge },
    /// Mount the dedicated expanded content of `action`
    MountExpanded { edge: Edge, action: ActionKey },
    UnmountExpanded { edge: Edge },
    /// Bring an item above its siblings (promoted expanded view)
    RaiseItem { edge: Edge, index: usize },
    /// Mount the alert content of `action`
    MountAlert { edge: Edge, action: ActionKey },
    UnmountAlert { edge: Edge },
    /// Call the action's handler; its outcome comes back as `Msg::Outcome`
    InvokeHandler {
        action: ActionKey,
        event: ActionEvent,
        ticket: HandlerTicket,
    },
    /// Close every other row in the same group
    CloseSiblings { transition: Transition },
    /// Request haptic feedback from the host
    Haptic,
    /// Run a deferred completion callback
    RunCallback(OnComplete),
    /// Execute multiple commands in order
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Combine commands, collapsing empty and single-element batches
    pub fn batch(mut cmds: Vec<Cmd>) -> Option<Cmd> {
        match cmds.len() {
            0 => None,
            1 => cmds.pop(),
            _ => Some(Cmd::Batch(cmds)),
        }
    }

    pub fn geometry(
        updates: Vec<GeometryUpdate>,
        transition: Transition,
        token: Option<TransitionToken>,
    ) -> Self {
        Cmd::SetGeometry {
            updates,
            transition,
            token,
        }
    }

    /// Commands in execution order with batches expanded
    pub fn flatten(self) -> Vec<Cmd> {
        match self {
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(Cmd::flatten).collect(),
            other => vec![other],
        }
    }
}
