//! Full-swipe arming and the expanded outcome

mod common;

use std::rc::Rc;

use common::*;
use swipe_reveal::action::{ActionEvent, ClosureAction, Edge, Outcome, SwipeAction};
use swipe_reveal::commands::ViewSlot;
use swipe_reveal::config::SwipeConfig;
use swipe_reveal::geometry::Vector;
use swipe_reveal::model::{Phase, RowBounds};
use swipe_reveal::sim::{SimHost, SimView};
use swipe_reveal::transition::Transition;
use swipe_reveal::SwipeRow;

fn wide_panel() -> Vec<Rc<TestAction>> {
    vec![
        action("a", Edge::Right, 300.0),
        action("b", Edge::Right, 300.0),
        action("c", Edge::Right, 300.0),
    ]
}

#[test]
fn test_three_actions_arm_past_forty_points() {
    let h = Harness::new(&wide_panel());
    assert_eq!(SwipeConfig::default().expanded_trigger_offset(3), 40.0);

    h.drag(&[-10.0, -0.97 * 900.0]);
    assert!(!h.row.state().is_expanded);

    h.drag_more(&[-1.05 * 900.0]);
    assert!(h.row.state().is_expanded);
}

#[test]
fn test_haptic_on_each_rising_edge() {
    let h = Harness::new(&[action("delete", Edge::Right, 74.0)]);
    h.drag(&[-10.0, -250.0, -260.0]);
    assert!(h.row.state().is_expanded);
    assert_eq!(h.haptics(), 1);

    h.drag_more(&[-100.0]);
    assert!(!h.row.state().is_expanded);
    h.drag_more(&[-250.0]);
    assert_eq!(h.haptics(), 2);
}

#[test]
fn test_no_haptic_when_feedback_disabled() {
    let config = SwipeConfig {
        feedback_enabled: false,
        ..SwipeConfig::default()
    };
    let h = Harness::with_config(config, &[action("delete", Edge::Right, 74.0)]);
    h.drag(&[-10.0, -250.0]);
    assert!(h.row.state().is_expanded);
    assert_eq!(h.haptics(), 0);
}

#[test]
fn test_full_swipe_disabled_never_arms() {
    let config = SwipeConfig {
        allows_full_swipe: false,
        ..SwipeConfig::default()
    };
    let h = Harness::with_config(config, &[action("delete", Edge::Right, 74.0)]);
    h.drag(&[-10.0, -300.0]);
    assert!(!h.row.state().is_expanded);
}

#[test]
fn test_rubber_band_resists_content_only() {
    let h = Harness::new(&[action("delete", Edge::Right, 74.0)]);
    h.drag(&[-10.0, -300.0]);
    assert_eq!(h.offset(), -300.0);
    let content = h.row.frame(ViewSlot::Content).unwrap();
    assert!(content.x > -300.0);
    assert!(content.x < -134.0);
}

#[test]
fn test_expanded_content_mounts_and_collapses() {
    let delete = Rc::new(TestAction::new("delete", Edge::Right, 74.0).with_expanded());
    let h = Harness::new(&[delete]);

    h.drag(&[-10.0, -250.0]);
    assert!(h.is_mounted(ViewSlot::Expanded(Edge::Right)));

    h.drag_more(&[-60.0]);
    assert!(!h.row.state().is_expanded);
    h.settle();
    assert!(!h.is_mounted(ViewSlot::Expanded(Edge::Right)));
}

#[test]
fn test_release_while_armed_invokes_expanded_handler() {
    let delete = Rc::new(TestAction::new("delete", Edge::Right, 74.0).replying(Reply::Defer));
    let h = Harness::new(&[delete.clone()]);

    h.drag(&[-10.0, -250.0]);
    h.release(-300.0);

    assert_eq!(delete.events(), vec![ActionEvent::Expanded]);
    assert_eq!(h.row.phase(), Phase::AwaitingOutcome);
    // Settlement waits for the handler
    h.settle();
    assert_eq!(h.offset(), -250.0);
}

#[test]
fn test_expanded_outcome_slides_out_then_resets() {
    let delete = Rc::new(TestAction::new("delete", Edge::Right, 74.0).replying(Reply::Expanded));
    let h = Harness::new(&[delete.clone()]);

    h.drag(&[-10.0, -250.0]);
    h.release(-300.0);

    assert_eq!(h.row.phase(), Phase::Expanding);
    assert_eq!(h.offset(), -ROW_WIDTH);
    assert_eq!(delete.completions.get(), 0);

    let mut furthest: f32 = 0.0;
    while !h.row.is_idle() {
        h.row.advance(FRAME);
        if let Some(frame) = h.row.frame(ViewSlot::Content) {
            furthest = furthest.min(frame.x);
        }
    }
    assert!(furthest < -360.0, "content only reached {}", furthest);

    assert_eq!(h.offset(), 0.0);
    assert_eq!(h.row.phase(), Phase::Closed);
    assert_eq!(h.row.frame(ViewSlot::Content).unwrap().x, 0.0);
    assert_eq!(delete.completions.get(), 1);
    assert!(!h.is_mounted(ViewSlot::Panel(Edge::Right)));
}

#[test]
fn test_gestures_ignored_while_expanding() {
    let delete = Rc::new(TestAction::new("delete", Edge::Right, 74.0).replying(Reply::Expanded));
    let h = Harness::new(&[delete.clone()]);
    h.drag(&[-10.0, -250.0]);
    h.release(-300.0);

    h.drag(&[10.0, 80.0]);
    assert_eq!(h.offset(), -ROW_WIDTH);
    assert_eq!(h.row.phase(), Phase::Expanding);
    h.settle();
    assert_eq!(delete.completions.get(), 1);
}

#[test]
fn test_interrupted_expansion_still_completes_once() {
    let delete = Rc::new(TestAction::new("delete", Edge::Right, 74.0).replying(Reply::Expanded));
    let h = Harness::new(&[delete.clone()]);
    h.drag(&[-10.0, -250.0]);
    h.release(-300.0);
    h.row.advance(FRAME);

    h.row.close(Transition::Immediate);
    assert_eq!(delete.completions.get(), 1);

    h.settle();
    assert_eq!(h.offset(), 0.0);
    assert_eq!(delete.completions.get(), 1);
}

fn closure_row(fade: bool) -> SwipeRow<SimView> {
    let label = |text: &str| SimView {
        label: text.to_string(),
        width: 74.0,
    };
    let delete = ClosureAction::new(
        "delete",
        Edge::Right,
        move || label("delete"),
        |completion, _| completion.complete(Outcome::Close),
    )
    .with_expanded(move || label("delete expanded"))
    .with_fade_expanded(fade);

    let row = SwipeRow::new(
        SwipeConfig::default(),
        RowBounds::new(ROW_WIDTH, ROW_HEIGHT),
        SimHost::new(),
    );
    row.set_actions(vec![Rc::new(delete) as Rc<dyn SwipeAction<SimView>>]);
    row
}

#[test]
fn test_expanded_content_fades_in_unless_disabled() {
    for (fade, opacity) in [(true, 0.0), (false, 1.0)] {
        let row = closure_row(fade);
        row.pan_began();
        for x in [-10.0, -250.0] {
            row.pan_changed(Vector::horizontal(x), Vector::ZERO);
        }
        assert!(row.state().is_expanded);
        assert_eq!(row.opacity(ViewSlot::Expanded(Edge::Right)), Some(opacity));

        row.settle(FRAME);
        assert_eq!(row.opacity(ViewSlot::Expanded(Edge::Right)), Some(1.0));
    }
}
