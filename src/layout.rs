//! Panel layout engine
//!
//! Computes the frame of every action item on one edge for a given reveal
//! offset. Frames are in panel-local coordinates: the panel container spans
//! the gap between the row edge and the displaced content, so its width equals
//! the panel offset.
//!
//! Items are stored nearest-edge-first. Visually, the left edge lays them out
//! left-to-right in that order; the right edge lays them out reversed, so the
//! edge-most item always touches the row edge.

use crate::action::Edge;
use crate::config::LayoutEffect;
use crate::geometry::{lerp, Rect};

/// Measured inputs for laying out one edge's panel
#[derive(Debug, Clone, PartialEq)]
pub struct PanelMetrics {
    pub edge: Edge,
    /// Natural widths, nearest-edge-first
    pub widths: Vec<f32>,
    pub item_spacing: f32,
    /// Safe-area inset added to the edge-most item only
    pub side_inset: f32,
    pub effect: LayoutEffect,
    pub height: f32,
}

impl PanelMetrics {
    pub fn item_count(&self) -> usize {
        self.widths.len()
    }

    /// Sum of the items' natural widths
    pub fn preferred_content_width(&self) -> f32 {
        self.widths.iter().sum()
    }

    pub fn total_item_spacing(&self) -> f32 {
        self.widths.len().saturating_sub(1) as f32 * self.item_spacing
    }

    /// Width at which every item shows at its natural size
    pub fn preferred_width(&self) -> f32 {
        self.preferred_content_width() + self.side_inset + self.total_item_spacing()
    }

    /// Revealed fraction of the preferred width (unclamped)
    pub fn reveal_factor(&self, offset: f32) -> f32 {
        let preferred = self.preferred_width();
        if preferred <= 0.0 {
            return 1.0;
        }
        (offset / preferred).abs()
    }

    /// Whether `offset` lies past the full-swipe threshold
    pub fn is_past_expansion(&self, offset: f32, trigger_offset: f32) -> bool {
        let preferred = self.preferred_width();
        if preferred <= 0.0 {
            return false;
        }
        self.reveal_factor(offset) > 1.0 + trigger_offset / preferred
    }

    /// Frame of the full-width expanded view for a panel offset
    pub fn expanded_frame(&self, offset: f32) -> Rect {
        Rect::new(0.0, 0.0, offset.abs(), self.height)
    }

    /// Stored indices in visual left-to-right order
    fn visual_order(&self) -> Vec<usize> {
        let n = self.widths.len();
        match self.edge {
            Edge::Left => (0..n).collect(),
            Edge::Right => (0..n).rev().collect(),
        }
    }

    /// Item frames for `offset`, indexed like `widths` (nearest-edge-first)
    pub fn layout(&self, offset: f32) -> Vec<Rect> {
        let offset = offset.abs();
        let preferred = self.preferred_width();
        let content = self.preferred_content_width();
        let total_spacing = self.total_item_spacing();
        let f = self.reveal_factor(offset).min(1.0);
        let growth = if content + self.side_inset > 0.0 {
            (offset - total_spacing) / (content + self.side_inset)
        } else {
            0.0
        };

        let mut frames = vec![Rect::ZERO; self.widths.len()];
        let mut previous = Rect::ZERO;

        for (visual, index) in self.visual_order().into_iter().enumerate() {
            let spacing = if visual == 0 { 0.0 } else { self.item_spacing };
            let fixed = self.widths[index] + if index == 0 { self.side_inset } else { 0.0 };

            let x = match (self.edge, self.effect) {
                (Edge::Left, LayoutEffect::Drag) if visual == 0 => {
                    lerp(-(content + total_spacing), 0.0, f)
                }
                (Edge::Left, LayoutEffect::Border) => {
                    let start = if visual == 0 {
                        previous.min_x() - fixed
                    } else {
                        previous.min_x() + self.side_inset
                    };
                    lerp(start, previous.max_x(), f)
                }
                (Edge::Right, LayoutEffect::Border) => lerp(previous.min_x(), previous.max_x(), f),
                (Edge::Right, LayoutEffect::Static) if visual == 0 => lerp(-preferred, 0.0, f),
                _ => previous.max_x(),
            };

            let width = fixed.max(growth * fixed);
            let frame = Rect::new(x + spacing, 0.0, width, self.height);
            frames[index] = frame;
            previous = frame;
        }

        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(edge: Edge, widths: &[f32], effect: LayoutEffect) -> PanelMetrics {
        PanelMetrics {
            edge,
            widths: widths.to_vec(),
            item_spacing: 0.0,
            side_inset: 0.0,
            effect,
            height: 44.0,
        }
    }

    #[test]
    fn test_preferred_width_includes_spacing_and_inset() {
        let m = PanelMetrics {
            item_spacing: 4.0,
            side_inset: 10.0,
            ..metrics(Edge::Right, &[60.0, 70.0, 80.0], LayoutEffect::Static)
        };
        assert_eq!(m.preferred_content_width(), 210.0);
        assert_eq!(m.total_item_spacing(), 8.0);
        assert_eq!(m.preferred_width(), 228.0);
    }

    #[test]
    fn test_left_static_pins_edge_item_at_zero() {
        let m = metrics(Edge::Left, &[74.0, 74.0], LayoutEffect::Static);
        let frames = m.layout(20.0);
        assert_eq!(frames[0].x, 0.0);
        assert_eq!(frames[1].x, frames[0].max_x());
    }

    #[test]
    fn test_right_edge_item_touches_panel_end() {
        let m = metrics(Edge::Right, &[74.0, 74.0], LayoutEffect::Static);
        let frames = m.layout(-80.0);
        assert!((frames[0].max_x() - 80.0).abs() < 1e-3);
        assert!((frames[1].max_x() - frames[0].x).abs() < 1e-3);
    }

    #[test]
    fn test_single_item_at_zero_offset_keeps_natural_width() {
        let m = metrics(Edge::Left, &[74.0], LayoutEffect::Border);
        assert_eq!(m.layout(0.0)[0].width, 74.0);
    }

    #[test]
    fn test_items_flex_beyond_preferred_width() {
        let m = metrics(Edge::Left, &[50.0, 100.0], LayoutEffect::Static);
        let frames = m.layout(300.0);
        assert_eq!(frames[0].width, 100.0);
        assert_eq!(frames[1].width, 200.0);
    }

    #[test]
    fn test_expansion_threshold() {
        let m = metrics(Edge::Left, &[74.0, 74.0], LayoutEffect::Static);
        assert!(!m.is_past_expansion(207.0, 60.0));
        assert!(m.is_past_expansion(208.5, 60.0));
        assert!(!m.is_past_expansion(1000.0, f32::INFINITY));
    }
}
