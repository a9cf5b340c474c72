//! Sample scenarios replayed through the simulator

use std::time::Duration;

use swipe_reveal::action::Edge;
use swipe_reveal::config::SwipeConfig;
use swipe_reveal::model::Phase;
use swipe_reveal::sim::{self, Scenario, StepReport};

const FRAME: Duration = Duration::from_millis(16);

fn replay(yaml: &str) -> Vec<StepReport> {
    let scenario = Scenario::from_yaml(yaml).unwrap();
    let config = scenario.config.clone().unwrap_or_default();
    sim::run(&scenario, config, FRAME)
}

#[test]
fn test_reveal_sample() {
    let reports = replay(include_str!("../samples/reveal.yaml"));
    assert_eq!(reports.len(), 12);

    assert_eq!(reports[4].phase, Phase::Open);
    assert_eq!(reports[4].state.offset, -142.0);
    assert_eq!(reports[4].state.active_edge, Some(Edge::Right));

    assert!(reports[5]
        .events
        .iter()
        .any(|e| e == "handler flag Tap -> Hold"));
    assert_eq!(reports[6].phase, Phase::Open);
    assert_eq!(reports[6].state.offset, -142.0);

    let last = reports.last().unwrap();
    assert_eq!(last.phase, Phase::Closed);
    assert_eq!(last.state.offset, 0.0);
    assert_eq!(last.content_x, Some(0.0));
}

#[test]
fn test_confirm_delete_sample() {
    let reports = replay(include_str!("../samples/confirm_delete.yaml"));
    assert_eq!(reports[4].state.offset, -74.0);
    assert!(reports[8].state.is_alert_showing);
    assert_eq!(reports[8].phase, Phase::Alert);

    let last = reports.last().unwrap();
    assert!(!last.state.is_alert_showing);
    assert_eq!(last.phase, Phase::Closed);
    assert!(last.events.iter().any(|e| e.contains("unmount Right panel")));
}

#[test]
fn test_full_swipe_sample() {
    let reports = replay(include_str!("../samples/full_swipe.yaml"));

    assert!(reports[3].state.is_expanded);
    assert!(reports[3].events.iter().any(|e| e == "haptic"));

    assert_eq!(reports[4].phase, Phase::Expanding);
    assert_eq!(reports[4].state.offset, -379.0);
    assert_eq!(reports[5].phase, Phase::Expanding);

    let last = reports.last().unwrap();
    assert_eq!(last.phase, Phase::Closed);
    assert_eq!(last.state.offset, 0.0);
    assert!(last.events.iter().any(|e| e == "completed delete"));
}

#[test]
fn test_programmatic_sample() {
    let reports = replay(include_str!("../samples/programmatic.yaml"));
    assert_eq!(reports[1].state.offset, -86.0);
    assert_eq!(reports[3].state.offset, 70.0);
    assert_eq!(reports[3].phase, Phase::Open);
    assert_eq!(reports[5].state.offset, 0.0);
    assert_eq!(reports[6].phase, Phase::Closed);
}

#[test]
fn test_text_and_json_output() {
    let scenario = Scenario::from_yaml(include_str!("../samples/reveal.yaml")).unwrap();
    let reports = sim::run(&scenario, SwipeConfig::default(), FRAME);

    let text = sim::render_text(scenario.name.as_deref(), &reports);
    assert!(text.starts_with("# reveal and snap back"));
    assert_eq!(text.lines().filter(|l| l.contains("offset")).count(), 12);

    let json = serde_json::to_value(&reports).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 12);
    assert_eq!(json[4]["phase"], "open");
}
