//! Per-edge panel state

use crate::action::{ActionDescriptor, ActionKey, Edge};
use crate::geometry::Rect;
use crate::layout::PanelMetrics;

/// A value kept once per edge
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerEdge<T> {
    pub left: T,
    pub right: T,
}

impl<T> PerEdge<T> {
    pub fn get(&self, edge: Edge) -> &T {
        match edge {
            Edge::Left => &self.left,
            Edge::Right => &self.right,
        }
    }

    pub fn get_mut(&mut self, edge: Edge) -> &mut T {
        match edge {
            Edge::Left => &mut self.left,
            Edge::Right => &mut self.right,
        }
    }
}

/// The view standing in for the edge-most action while a full swipe is armed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandedView {
    /// Index of the action it represents
    pub index: usize,
    /// Dedicated expanded content, or the item itself promoted above its siblings
    pub dedicated: bool,
}

/// A mounted action panel
#[derive(Debug, Clone)]
pub struct Panel {
    /// Distinguishes successive mounts on the same edge
    pub generation: u64,
    pub metrics: PanelMetrics,
    /// Descriptors of the mounted items, nearest-edge-first
    pub actions: Vec<ActionDescriptor>,
    /// Last laid out item frames (targets, not animated values)
    pub frames: Vec<Rect>,
    /// Last container frame in row coordinates
    pub container: Rect,
    pub expanded: bool,
    pub expanded_view: Option<ExpandedView>,
    /// Index of the action whose alert is showing
    pub alert: Option<usize>,
    /// Sequence number of the latest offset write that no longer opens this edge
    pub retired_at: Option<u64>,
}

impl Panel {
    pub fn new(generation: u64, metrics: PanelMetrics, actions: Vec<ActionDescriptor>) -> Self {
        let frames = vec![Rect::ZERO; actions.len()];
        Self {
            generation,
            metrics,
            actions,
            frames,
            container: Rect::ZERO,
            expanded: false,
            expanded_view: None,
            alert: None,
            retired_at: None,
        }
    }

    pub fn edge(&self) -> Edge {
        self.metrics.edge
    }

    /// Not yet retired by an offset on the other side of zero
    pub fn is_active(&self) -> bool {
        self.retired_at.is_none()
    }

    pub fn preferred_width(&self) -> f32 {
        self.metrics.preferred_width()
    }

    pub fn index_of(&self, key: &ActionKey) -> Option<usize> {
        self.actions.iter().position(|action| &action.key == key)
    }
}
