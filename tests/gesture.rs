//! Direction lock and drag tracking through a live row

mod common;

use common::*;
use swipe_reveal::action::Edge;
use swipe_reveal::commands::ViewSlot;
use swipe_reveal::geometry::Vector;
use swipe_reveal::model::Phase;

#[test]
fn test_vertical_pan_never_moves_row() {
    let delete = action("delete", Edge::Right, 74.0);
    let h = Harness::new(&[delete.clone()]);

    h.row.pan_began();
    h.row.pan_changed(Vector::new(-2.0, 10.0), Vector::default());
    h.row.pan_changed(Vector::new(-80.0, 10.0), Vector::default());

    assert_eq!(h.offset(), 0.0);
    assert_eq!(h.row.phase(), Phase::Closed);
    assert_eq!(delete.made.get(), 0);

    h.release(-500.0);
    h.settle();
    assert_eq!(h.offset(), 0.0);
    assert_eq!(h.row.phase(), Phase::Closed);
}

#[test]
fn test_no_offset_until_direction_locks() {
    let delete = action("delete", Edge::Right, 74.0);
    let h = Harness::new(&[delete.clone()]);

    h.drag(&[-3.0]);
    assert_eq!(h.offset(), 0.0);
    assert_eq!(h.row.phase(), Phase::Closed);

    h.drag_more(&[-20.0]);
    assert_eq!(h.offset(), -20.0);
    assert_eq!(h.row.phase(), Phase::Dragging);
    assert!(h.is_mounted(ViewSlot::Panel(Edge::Right)));
}

#[test]
fn test_diagonal_pan_stays_undecided() {
    let h = Harness::new(&[action("delete", Edge::Right, 74.0)]);
    h.row.pan_began();
    h.row.pan_changed(Vector::new(-10.0, 8.0), Vector::default());
    assert_eq!(h.offset(), 0.0);
}

#[test]
fn test_drag_toward_edge_without_actions_is_attenuated() {
    let h = Harness::new(&[action("delete", Edge::Right, 74.0)]);
    h.drag(&[-10.0, 100.0]);

    assert_close(h.offset(), 100f32.powf(0.7));
    assert!(!h.is_mounted(ViewSlot::Panel(Edge::Left)));
}

#[test]
fn test_crossing_zero_swaps_panels() {
    let archive = action("archive", Edge::Left, 80.0);
    let delete = action("delete", Edge::Right, 74.0);
    let h = Harness::new(&[archive.clone(), delete.clone()]);

    h.drag(&[-10.0, -40.0]);
    assert!(h.is_mounted(ViewSlot::Panel(Edge::Right)));
    assert!(!h.is_mounted(ViewSlot::Panel(Edge::Left)));

    h.drag_more(&[30.0]);
    assert_eq!(h.offset(), 30.0);
    assert_eq!(h.row.state().active_edge, Some(Edge::Left));
    assert!(h.is_mounted(ViewSlot::Panel(Edge::Left)));
    assert!(!h.is_mounted(ViewSlot::Panel(Edge::Right)));
}

#[test]
fn test_pan_continues_from_open_offset() {
    let h = Harness::new(&[action("delete", Edge::Right, 74.0)]);
    h.drag(&[-10.0, -50.0]);
    h.release(0.0);
    h.settle();
    assert_eq!(h.offset(), -74.0);

    h.drag(&[-10.0]);
    assert_eq!(h.offset(), -84.0);
}

#[test]
fn test_pan_ignored_without_actions() {
    let h = Harness::new(&[]);
    h.drag(&[-10.0, -60.0]);
    assert_eq!(h.offset(), 0.0);
    assert_eq!(h.row.phase(), Phase::Closed);
}
