//! Scripted simulation of a swipe row
//!
//! A [`Scenario`] describes a row, its actions and a list of input steps.
//! [`run`] replays the steps against a [`SwipeRow`] backed by a recording
//! host and reports the row state after every step.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::action::{
    ActionEvent, ActionKey, ClosureAction, Completion, Edge, OnComplete, Outcome, SwipeAction,
};
use crate::commands::ViewSlot;
use crate::config::SwipeConfig;
use crate::geometry::{Rect, Vector};
use crate::model::{Phase, RevealState, RowBounds};
use crate::row::{SwipeRow, ViewHost};
use crate::scheduler::GeometrySink;

/// A view in the simulation: a label with a fixed natural width
#[derive(Debug, Clone, PartialEq)]
pub struct SimView {
    pub label: String,
    pub width: f32,
}

/// Everything the recording host saw
#[derive(Debug, Default)]
pub struct SimLog {
    pub frames: BTreeMap<ViewSlot, Rect>,
    pub opacities: BTreeMap<ViewSlot, f32>,
    pub mounted: BTreeMap<ViewSlot, String>,
    /// Notable events since the last drain
    pub events: Vec<String>,
    pub haptics: usize,
}

impl SimLog {
    pub fn take_events(&mut self) -> Vec<String> {
        std::mem::take(&mut self.events)
    }
}

/// [`ViewHost`] that records into a shared [`SimLog`]
#[derive(Debug, Clone, Default)]
pub struct SimHost {
    log: Rc<RefCell<SimLog>>,
}

impl SimHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> Rc<RefCell<SimLog>> {
        self.log.clone()
    }
}

impl GeometrySink for SimHost {
    fn set_frame(&mut self, slot: ViewSlot, frame: Rect) {
        self.log.borrow_mut().frames.insert(slot, frame);
    }

    fn set_opacity(&mut self, slot: ViewSlot, opacity: f32) {
        self.log.borrow_mut().opacities.insert(slot, opacity);
    }
}

impl ViewHost<SimView> for SimHost {
    fn measure(&mut self, view: &SimView, _height: f32) -> f32 {
        view.width
    }

    fn mount_panel(&mut self, edge: Edge) {
        let mut log = self.log.borrow_mut();
        log.mounted.insert(ViewSlot::Panel(edge), format!("{:?} panel", edge));
        log.events.push(format!("mount {:?} panel", edge));
    }

    fn mount_item(&mut self, slot: ViewSlot, content: &SimView, _background: Option<&SimView>) {
        self.log
            .borrow_mut()
            .mounted
            .insert(slot, content.label.clone());
    }

    fn mount_overlay(&mut self, slot: ViewSlot, view: &SimView) {
        let mut log = self.log.borrow_mut();
        log.mounted.insert(slot, view.label.clone());
        log.events.push(format!("mount {:?} ({})", slot, view.label));
    }

    fn unmount(&mut self, slot: ViewSlot) {
        let mut log = self.log.borrow_mut();
        log.frames.remove(&slot);
        log.opacities.remove(&slot);
        if log.mounted.remove(&slot).is_some() {
            if let ViewSlot::Panel(edge) = slot {
                log.events.push(format!("unmount {:?} panel", edge));
            } else if matches!(slot, ViewSlot::Expanded(_) | ViewSlot::Alert(_)) {
                log.events.push(format!("unmount {:?}", slot));
            }
        }
    }

    fn haptic(&mut self) {
        let mut log = self.log.borrow_mut();
        log.haptics += 1;
        log.events.push("haptic".to_string());
    }
}

/// How a simulated handler responds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeSpec {
    Close,
    Hold,
    Alert,
    Expanded,
    /// Never complete
    Ignore,
}

fn close_outcome() -> OutcomeSpec {
    OutcomeSpec::Close
}

fn expanded_outcome() -> OutcomeSpec {
    OutcomeSpec::Expanded
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionSpec {
    pub id: String,
    pub edge: Edge,
    pub width: f32,
    #[serde(default)]
    pub expanded: bool,
    #[serde(default)]
    pub alert: bool,
    #[serde(default = "close_outcome")]
    pub on_tap: OutcomeSpec,
    #[serde(default = "expanded_outcome")]
    pub on_expanded: OutcomeSpec,
    #[serde(default = "close_outcome")]
    pub on_alert: OutcomeSpec,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DragSpec {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseSpec {
    pub vx: f32,
    pub vy: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ItemRef {
    pub edge: Edge,
    #[serde(default)]
    pub index: usize,
}

/// One scripted input
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Began,
    Drag(DragSpec),
    End(ReleaseSpec),
    Cancel,
    /// Advance the frame clock by this many milliseconds
    Advance(u64),
    /// Advance until no animation is running
    Settle,
    Press(ItemRef),
    Release(ItemRef),
    Tap(ItemRef),
    TapAlert(Edge),
    Open(Edge),
    Close,
    Scroll,
}

impl Step {
    pub fn describe(&self) -> String {
        match self {
            Step::Began => "began".to_string(),
            Step::Drag(d) => format!("drag x={} y={}", d.x, d.y),
            Step::End(r) => format!("end vx={}", r.vx),
            Step::Cancel => "cancel".to_string(),
            Step::Advance(ms) => format!("advance {}ms", ms),
            Step::Settle => "settle".to_string(),
            Step::Press(i) => format!("press {:?}[{}]", i.edge, i.index),
            Step::Release(i) => format!("release {:?}[{}]", i.edge, i.index),
            Step::Tap(i) => format!("tap {:?}[{}]", i.edge, i.index),
            Step::TapAlert(edge) => format!("tap alert {:?}", edge),
            Step::Open(edge) => format!("open {:?}", edge),
            Step::Close => "close".to_string(),
            Step::Scroll => "scroll".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    pub row: RowBounds,
    #[serde(default)]
    pub config: Option<SwipeConfig>,
    pub actions: Vec<ActionSpec>,
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn from_yaml(content: &str) -> Result<Self, String> {
        let scenario: Scenario =
            serde_yaml::from_str(content).map_err(|e| format!("Invalid scenario: {}", e))?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.row.width <= 0.0 || self.row.height <= 0.0 {
            return Err("row width and height must be positive".to_string());
        }
        let mut seen = Vec::new();
        for action in &self.actions {
            let key = ActionKey::new(action.id.clone(), action.edge);
            if seen.contains(&key) {
                return Err(format!("duplicate action {}", key));
            }
            let wants_alert = [action.on_tap, action.on_expanded, action.on_alert]
                .contains(&OutcomeSpec::Alert);
            if wants_alert && !action.alert {
                return Err(format!(
                    "action {} answers with an alert but has no alert content",
                    key
                ));
            }
            if action.width <= 0.0 {
                return Err(format!("action {} needs a positive width", key));
            }
            seen.push(key);
        }
        if let Some(config) = &self.config {
            config.validate()?;
        }
        Ok(())
    }
}

/// Row state after one step
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub step: String,
    pub phase: Phase,
    pub state: RevealState,
    /// Visual x of the row content
    pub content_x: Option<f32>,
    pub events: Vec<String>,
}

fn sim_action(spec: &ActionSpec, log: Rc<RefCell<SimLog>>) -> Rc<dyn SwipeAction<SimView>> {
    let label = spec.id.clone();
    let width = spec.width;
    let id = spec.id.clone();
    let responses = (spec.on_tap, spec.on_expanded, spec.on_alert);

    let content_label = label.clone();
    let mut action = ClosureAction::new(
        spec.id.clone(),
        spec.edge,
        move || SimView {
            label: content_label.clone(),
            width,
        },
        move |completion: Completion, event: ActionEvent| {
            let response = match event {
                ActionEvent::Tap => responses.0,
                ActionEvent::Expanded => responses.1,
                ActionEvent::Alert => responses.2,
            };
            log.borrow_mut()
                .events
                .push(format!("handler {} {:?} -> {:?}", id, event, response));
            let outcome = match response {
                OutcomeSpec::Close => Outcome::Close,
                OutcomeSpec::Hold => Outcome::Hold,
                OutcomeSpec::Alert => Outcome::Alert,
                OutcomeSpec::Expanded => {
                    let log = log.clone();
                    let id = id.clone();
                    Outcome::Expanded(Some(OnComplete::new(move || {
                        log.borrow_mut().events.push(format!("completed {}", id));
                    })))
                }
                OutcomeSpec::Ignore => return,
            };
            completion.complete(outcome);
        },
    );
    if spec.expanded {
        let expanded_label = format!("{} (expanded)", label);
        action = action.with_expanded(move || SimView {
            label: expanded_label.clone(),
            width,
        });
    }
    if spec.alert {
        let alert_label = format!("{} (confirm)", label);
        action = action.with_alert(move || SimView {
            label: alert_label.clone(),
            width,
        });
    }
    Rc::new(action)
}

/// Replay `scenario` with `config`, stepping animations by `frame`
pub fn run(scenario: &Scenario, config: SwipeConfig, frame: Duration) -> Vec<StepReport> {
    let host = SimHost::new();
    let log = host.log();
    let row = SwipeRow::new(config, scenario.row, host);
    row.set_actions(
        scenario
            .actions
            .iter()
            .map(|spec| sim_action(spec, log.clone()))
            .collect(),
    );
    log.borrow_mut().take_events();

    let mut reports = Vec::with_capacity(scenario.steps.len());
    for step in &scenario.steps {
        tracing::debug!(step = %step.describe(), "sim step");
        match *step {
            Step::Began => row.pan_began(),
            Step::Drag(d) => row.pan_changed(Vector::new(d.x, d.y), Vector::new(d.vx, d.vy)),
            Step::End(r) => row.pan_ended(Vector::new(r.vx, r.vy)),
            Step::Cancel => row.pan_cancelled(),
            Step::Advance(ms) => {
                let mut remaining = Duration::from_millis(ms);
                while !remaining.is_zero() {
                    let dt = remaining.min(frame);
                    row.advance(dt);
                    remaining -= dt;
                }
            }
            Step::Settle => row.settle(frame),
            Step::Press(i) => row.press_item(i.edge, i.index),
            Step::Release(i) => row.release_item(i.edge, i.index),
            Step::Tap(i) => row.tap_item(i.edge, i.index),
            Step::TapAlert(edge) => row.tap_alert(edge),
            Step::Open(edge) => row.open(edge, row.config().default_transition()),
            Step::Close => row.close(row.config().default_transition()),
            Step::Scroll => row.container_did_scroll(),
        }

        reports.push(StepReport {
            step: step.describe(),
            phase: row.phase(),
            state: row.state(),
            content_x: row.frame(ViewSlot::Content).map(|frame| frame.x),
            events: log.borrow_mut().take_events(),
        });
    }
    reports
}

/// Plain-text rendering of a report list
pub fn render_text(name: Option<&str>, reports: &[StepReport]) -> String {
    let mut out = String::new();
    if let Some(name) = name {
        out.push_str(&format!("# {}\n", name));
    }
    for (i, report) in reports.iter().enumerate() {
        let edge = match report.state.active_edge {
            Some(edge) => format!("{:?}", edge),
            None => "-".to_string(),
        };
        let mut flags = Vec::new();
        if report.state.is_expanded {
            flags.push("expanded");
        }
        if report.state.is_alert_showing {
            flags.push("alert");
        }
        out.push_str(&format!(
            "{:>3} {:<24} offset {:>8.1}  content {:>8}  edge {:<5} {:?} {}\n",
            i + 1,
            report.step,
            report.state.offset,
            report
                .content_x
                .map(|x| format!("{:.1}", x))
                .unwrap_or_else(|| "-".to_string()),
            edge,
            report.phase,
            flags.join(",")
        ));
        for event in &report.events {
            out.push_str(&format!("      {}\n", event));
        }
    }
    out
}
