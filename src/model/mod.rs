//! Row model - the complete state of one swipe row
//!
//! The model holds the logical reveal offset (the target of any transition
//! in flight), the lifecycle phase, and the per-edge panel state. Visual
//! values live in the transition scheduler.

pub mod panel;

pub use panel::{ExpandedView, Panel, PerEdge};

use serde::{Deserialize, Serialize};

use crate::action::{ActionDescriptor, ActionKey, Edge, OnComplete};
use crate::config::SwipeConfig;
use crate::gesture::GestureTracker;
use crate::messages::HandlerTicket;
use crate::transition::Transition;

/// Size of the row and its safe-area insets
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RowBounds {
    pub width: f32,
    pub height: f32,
    pub inset_left: f32,
    pub inset_right: f32,
}

impl RowBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            inset_left: 0.0,
            inset_right: 0.0,
        }
    }

    pub fn side_inset(&self, edge: Edge) -> f32 {
        match edge {
            Edge::Left => self.inset_left,
            Edge::Right => self.inset_right,
        }
    }
}

/// Lifecycle phase of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Closed,
    Dragging,
    /// Animating toward open or closed
    Settling { open: bool },
    Open,
    /// A handler was invoked and has not reported its outcome
    AwaitingOutcome,
    /// Sliding out for an `Expanded` outcome; gestures are ignored
    Expanding,
    /// Open with an alert showing
    Alert,
}

/// Externally visible snapshot of a row
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RevealState {
    /// Signed reveal offset; positive reveals the left edge
    pub offset: f32,
    pub active_edge: Option<Edge>,
    pub is_expanded: bool,
    pub is_alert_showing: bool,
}

/// What to do when a particular offset write completes
#[derive(Debug)]
pub enum AfterOffset {
    Settle { open: bool },
    /// Reset to closed, then run the callback
    ExpandOutcome(Option<OnComplete>),
}

#[derive(Debug)]
pub struct SwipeModel {
    pub config: SwipeConfig,
    /// Config received mid-drag, applied when the drag ends
    pub pending_config: Option<SwipeConfig>,
    pub bounds: RowBounds,
    /// All actions in insertion order
    pub actions: Vec<ActionDescriptor>,
    pub offset: f32,
    pub phase: Phase,
    pub gesture: GestureTracker,
    pub panels: PerEdge<Option<Panel>>,
    /// Generation of a requested but not yet measured panel
    pub mounting: PerEdge<Option<u64>>,
    /// Programmatic open waiting for its panel
    pub pending_open: Option<(Edge, Transition)>,
    pub offset_seq: u64,
    pub after_offset: Option<(u64, AfterOffset)>,
    pub tickets: Vec<(HandlerTicket, ActionKey)>,
    next_generation: u64,
    next_ticket: u64,
}

impl SwipeModel {
    pub fn new(config: SwipeConfig, bounds: RowBounds) -> Self {
        Self {
            config,
            pending_config: None,
            bounds,
            actions: Vec::new(),
            offset: 0.0,
            phase: Phase::Closed,
            gesture: GestureTracker::default(),
            panels: PerEdge::default(),
            mounting: PerEdge::default(),
            pending_open: None,
            offset_seq: 0,
            after_offset: None,
            tickets: Vec::new(),
            next_generation: 1,
            next_ticket: 1,
        }
    }

    /// Descriptors on `edge`, nearest-edge-first
    pub fn actions_on(&self, edge: Edge) -> Vec<ActionDescriptor> {
        self.actions
            .iter()
            .filter(|action| action.key.edge == edge)
            .cloned()
            .collect()
    }

    pub fn has_actions(&self, edge: Edge) -> bool {
        self.actions.iter().any(|action| action.key.edge == edge)
    }

    pub fn panel(&self, edge: Edge) -> Option<&Panel> {
        self.panels.get(edge).as_ref()
    }

    pub fn panel_mut(&mut self, edge: Edge) -> Option<&mut Panel> {
        self.panels.get_mut(edge).as_mut()
    }

    /// The panel on `edge` if the current offset opens it
    pub fn active_panel(&self, edge: Edge) -> Option<&Panel> {
        self.panel(edge).filter(|panel| panel.is_active())
    }

    pub fn active_edge(&self) -> Option<Edge> {
        Edge::from_offset(self.offset)
    }

    pub fn reveal_state(&self) -> RevealState {
        let active_edge = self.active_edge();
        let is_expanded = active_edge
            .and_then(|edge| self.active_panel(edge))
            .is_some_and(|panel| panel.expanded);
        let is_alert_showing = Edge::ALL
            .iter()
            .filter_map(|edge| self.panel(*edge))
            .any(|panel| panel.alert.is_some());
        RevealState {
            offset: self.offset,
            active_edge,
            is_expanded,
            is_alert_showing,
        }
    }

    pub fn next_generation(&mut self) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        generation
    }

    /// Record a handler invocation for `action`
    pub fn issue_ticket(&mut self, action: ActionKey) -> HandlerTicket {
        let ticket = HandlerTicket(self.next_ticket);
        self.next_ticket += 1;
        self.tickets.push((ticket, action));
        ticket
    }

    /// Resolve a handler invocation; `None` for unknown or already used tickets
    pub fn take_ticket(&mut self, ticket: HandlerTicket) -> Option<ActionKey> {
        let position = self.tickets.iter().position(|(t, _)| *t == ticket)?;
        Some(self.tickets.remove(position).1)
    }

    /// Install a new config, refreshing the layout inputs of mounted panels
    pub fn apply_config(&mut self, config: SwipeConfig) {
        for edge in Edge::ALL {
            if let Some(panel) = self.panels.get_mut(edge) {
                panel.metrics.item_spacing = config.item_spacing;
                panel.metrics.effect = config.layout_effect;
            }
        }
        self.config = config;
    }

    pub fn apply_bounds(&mut self, bounds: RowBounds) {
        for edge in Edge::ALL {
            if let Some(panel) = self.panels.get_mut(edge) {
                panel.metrics.height = bounds.height;
                panel.metrics.side_inset = bounds.side_inset(edge);
            }
        }
        self.bounds = bounds;
    }

    /// Verify model invariants (debug builds only)
    #[cfg(debug_assertions)]
    pub fn assert_invariants(&self, context: &str) {
        let state = self.reveal_state();
        debug_assert!(
            !(state.is_expanded && state.is_alert_showing),
            "[{}] expanded and alert at once",
            context
        );
        for edge in Edge::ALL {
            if let Some(panel) = self.panel(edge) {
                debug_assert_eq!(panel.edge(), edge, "[{}] panel on wrong edge", context);
                debug_assert_eq!(
                    panel.frames.len(),
                    panel.actions.len(),
                    "[{}] frame count mismatch on {:?}",
                    context,
                    edge
                );
                debug_assert!(
                    panel.is_active() || !panel.expanded,
                    "[{}] retired panel still expanded",
                    context
                );
            }
        }
        if self.phase == Phase::Open {
            debug_assert!(self.offset != 0.0, "[{}] open at zero offset", context);
        }
    }

    /// No-op in release builds
    #[cfg(not(debug_assertions))]
    #[inline]
    pub fn assert_invariants(&self, _context: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tickets_resolve_once() {
        let mut model = SwipeModel::new(SwipeConfig::default(), RowBounds::new(320.0, 44.0));
        let key = ActionKey::new("delete", Edge::Right);
        let ticket = model.issue_ticket(key.clone());
        assert_eq!(model.take_ticket(ticket), Some(key));
        assert_eq!(model.take_ticket(ticket), None);
    }

    #[test]
    fn test_closed_state() {
        let model = SwipeModel::new(SwipeConfig::default(), RowBounds::new(320.0, 44.0));
        let state = model.reveal_state();
        assert_eq!(state.offset, 0.0);
        assert_eq!(state.active_edge, None);
        assert!(!state.is_expanded);
        assert!(!state.is_alert_showing);
    }
}
