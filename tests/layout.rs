//! Panel layout across edges and layout effects

mod common;

use std::rc::Rc;

use common::*;
use swipe_reveal::action::Edge;
use swipe_reveal::commands::ViewSlot;
use swipe_reveal::config::{LayoutEffect, SwipeConfig};
use swipe_reveal::layout::PanelMetrics;

fn metrics(edge: Edge, widths: &[f32], effect: LayoutEffect) -> PanelMetrics {
    PanelMetrics {
        edge,
        widths: widths.to_vec(),
        item_spacing: 0.0,
        side_inset: 0.0,
        effect,
        height: ROW_HEIGHT,
    }
}

const EFFECTS: [LayoutEffect; 3] = [LayoutEffect::Static, LayoutEffect::Drag, LayoutEffect::Border];

#[test]
fn test_items_tile_panel_at_preferred_width() {
    for edge in Edge::ALL {
        for effect in EFFECTS {
            let m = metrics(edge, &[60.0, 74.0, 90.0], effect);
            let frames = m.layout(edge.sign() * m.preferred_width());

            let mut visual: Vec<_> = frames.clone();
            visual.sort_by(|a, b| a.x.total_cmp(&b.x));
            assert_close(visual[0].x, 0.0);
            for pair in visual.windows(2) {
                assert_close(pair[1].x, pair[0].max_x());
            }
            assert_close(visual[2].max_x(), m.preferred_width());
        }
    }
}

/// Item x positions at half reveal of a 60 + 90 panel, nearest-edge-first
fn half_reveal_xs(edge: Edge, effect: LayoutEffect) -> Vec<f32> {
    let m = metrics(edge, &[60.0, 90.0], effect);
    assert_eq!(m.reveal_factor(75.0), 0.5);
    m.layout(edge.sign() * 75.0).iter().map(|frame| frame.x).collect()
}

#[test]
fn test_static_half_reveal() {
    // Left: pinned at the row edge, in order
    let left = half_reveal_xs(Edge::Left, LayoutEffect::Static);
    assert_close(left[0], 0.0);
    assert_close(left[1], 60.0);

    // Right: slides in from the content side, edge-most item ends at the panel edge
    let right = half_reveal_xs(Edge::Right, LayoutEffect::Static);
    assert_close(right[1], -75.0);
    assert_close(right[0], 15.0);
    assert_close(right[0] + 60.0, 75.0);
}

#[test]
fn test_drag_half_reveal() {
    // Left: the edge-most item enters from offscreen; the inner item touches the content
    let left = half_reveal_xs(Edge::Left, LayoutEffect::Drag);
    assert_close(left[0], -75.0);
    assert_close(left[1], -15.0);
    assert_close(left[1] + 90.0, 75.0);

    // Right: items ride along with the content edge
    let right = half_reveal_xs(Edge::Right, LayoutEffect::Drag);
    assert_close(right[1], 0.0);
    assert_close(right[0], 90.0);
}

#[test]
fn test_border_half_reveal() {
    // Left: each item unfolds from behind its neighbour
    let left = half_reveal_xs(Edge::Left, LayoutEffect::Border);
    assert_close(left[0], -30.0);
    assert_close(left[1], 0.0);

    // Right: the edge-most item is halfway out of the collapsed stack
    let right = half_reveal_xs(Edge::Right, LayoutEffect::Border);
    assert_close(right[1], 0.0);
    assert_close(right[0], 45.0);
}

#[test]
fn test_border_starts_collapsed() {
    let left = metrics(Edge::Left, &[60.0, 90.0], LayoutEffect::Border).layout(0.0);
    assert_close(left[0].x, -60.0);
    assert_close(left[1].x, -60.0);

    let right = metrics(Edge::Right, &[60.0, 90.0], LayoutEffect::Border).layout(0.0);
    assert_close(right[0].x, 0.0);
    assert_close(right[1].x, 0.0);
}

#[test]
fn test_edge_most_item_is_outermost() {
    let left = metrics(Edge::Left, &[60.0, 74.0], LayoutEffect::Static).layout(134.0);
    assert!(left[0].x < left[1].x);

    let right = metrics(Edge::Right, &[60.0, 74.0], LayoutEffect::Static).layout(-134.0);
    assert!(right[0].x > right[1].x);
}

#[test]
fn test_items_grow_proportionally_past_preferred_width() {
    let m = metrics(Edge::Right, &[50.0, 100.0], LayoutEffect::Border);
    let frames = m.layout(-300.0);
    assert_close(frames[0].width, 100.0);
    assert_close(frames[1].width, 200.0);
}

#[test]
fn test_spacing_separates_items() {
    let m = PanelMetrics {
        item_spacing: 6.0,
        ..metrics(Edge::Left, &[60.0, 74.0], LayoutEffect::Static)
    };
    let frames = m.layout(m.preferred_width());
    assert_close(frames[1].x, frames[0].max_x() + 6.0);
}

#[test]
fn test_two_left_actions_in_a_live_row() {
    let config = SwipeConfig {
        edge_gap: 5.0,
        ..SwipeConfig::default()
    };
    let actions = vec![
        action("pin", Edge::Left, 74.0),
        action("mark", Edge::Left, 74.0),
    ];
    let h = Harness::with_config(config, &actions);
    h.drag(&[10.0, 80.0]);

    let panel = h.row.frame(ViewSlot::Panel(Edge::Left)).unwrap();
    assert_eq!(panel.width, 75.0);

    let first = h
        .row
        .frame(ViewSlot::Item {
            edge: Edge::Left,
            index: 0,
        })
        .unwrap();
    let second = h
        .row
        .frame(ViewSlot::Item {
            edge: Edge::Left,
            index: 1,
        })
        .unwrap();
    assert_eq!(first.x, 0.0);
    assert_eq!(first.width, 74.0);
    assert_eq!(second.x, first.max_x());
}

#[test]
fn test_measured_widths_are_floored() {
    let h = Harness::new(&[Rc::new(TestAction::new("delete", Edge::Right, 74.6))]);
    h.drag(&[-10.0, -20.0]);
    assert_eq!(h.row.preferred_width(Edge::Right), Some(74.0));
}

#[test]
fn test_side_inset_widens_edge_most_item() {
    let m = PanelMetrics {
        side_inset: 20.0,
        ..metrics(Edge::Right, &[74.0, 60.0], LayoutEffect::Static)
    };
    assert_eq!(m.preferred_width(), 154.0);
    let frames = m.layout(-154.0);
    assert_close(frames[0].width, 94.0);
    assert_close(frames[0].max_x(), 154.0);
}
