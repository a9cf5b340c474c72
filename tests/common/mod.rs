//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use swipe_reveal::action::{
    ActionEvent, ActionKey, Completion, Edge, OnComplete, Outcome, SwipeAction,
};
use swipe_reveal::config::SwipeConfig;
use swipe_reveal::geometry::Vector;
use swipe_reveal::model::RowBounds;
use swipe_reveal::sim::{SimHost, SimLog, SimView};
use swipe_reveal::SwipeRow;

pub const FRAME: Duration = Duration::from_millis(16);
pub const ROW_WIDTH: f32 = 375.0;
pub const ROW_HEIGHT: f32 = 64.0;

/// How a [`TestAction`] answers an invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Close,
    Hold,
    Alert,
    Expanded,
    /// Keep the completion for the test to finish later
    Defer,
}

/// Scripted action that counts what the row asks of it
pub struct TestAction {
    pub id: String,
    pub edge: Edge,
    pub width: f32,
    pub expanded: bool,
    pub alert: bool,
    pub reply: Cell<Reply>,
    pub events: RefCell<Vec<ActionEvent>>,
    pub made: Cell<usize>,
    pub shown: Cell<usize>,
    pub completions: Rc<Cell<usize>>,
    pub deferred: RefCell<Vec<Completion>>,
}

impl TestAction {
    pub fn new(id: &str, edge: Edge, width: f32) -> Self {
        Self {
            id: id.to_string(),
            edge,
            width,
            expanded: false,
            alert: false,
            reply: Cell::new(Reply::Close),
            events: RefCell::new(Vec::new()),
            made: Cell::new(0),
            shown: Cell::new(0),
            completions: Rc::new(Cell::new(0)),
            deferred: RefCell::new(Vec::new()),
        }
    }

    pub fn with_expanded(mut self) -> Self {
        self.expanded = true;
        self
    }

    pub fn with_alert(mut self) -> Self {
        self.alert = true;
        self
    }

    pub fn replying(self, reply: Reply) -> Self {
        self.reply.set(reply);
        self
    }

    pub fn key(&self) -> ActionKey {
        ActionKey::new(self.id.clone(), self.edge)
    }

    pub fn events(&self) -> Vec<ActionEvent> {
        self.events.borrow().clone()
    }

    /// Outcome carrying a callback that bumps `completions`
    pub fn expanded_outcome(&self) -> Outcome {
        let counter = self.completions.clone();
        Outcome::Expanded(Some(OnComplete::new(move || {
            counter.set(counter.get() + 1)
        })))
    }

    pub fn take_completion(&self) -> Option<Completion> {
        self.deferred.borrow_mut().pop()
    }
}

impl SwipeAction<SimView> for TestAction {
    fn identifier(&self) -> &str {
        &self.id
    }

    fn edge(&self) -> Edge {
        self.edge
    }

    fn make_content(&self) -> SimView {
        self.made.set(self.made.get() + 1);
        SimView {
            label: self.id.clone(),
            width: self.width,
        }
    }

    fn make_expanded(&self) -> Option<SimView> {
        self.expanded.then(|| SimView {
            label: format!("{} expanded", self.id),
            width: self.width,
        })
    }

    fn make_alert(&self) -> Option<SimView> {
        self.alert.then(|| SimView {
            label: format!("{} alert", self.id),
            width: self.width,
        })
    }

    fn has_expanded_content(&self) -> bool {
        self.expanded
    }

    fn has_alert_content(&self) -> bool {
        self.alert
    }

    fn will_show(&self) {
        self.shown.set(self.shown.get() + 1);
    }

    fn handle(&self, completion: Completion, event: ActionEvent) {
        self.events.borrow_mut().push(event);
        let outcome = match self.reply.get() {
            Reply::Close => Outcome::Close,
            Reply::Hold => Outcome::Hold,
            Reply::Alert => Outcome::Alert,
            Reply::Expanded => self.expanded_outcome(),
            Reply::Defer => {
                self.deferred.borrow_mut().push(completion);
                return;
            }
        };
        completion.complete(outcome);
    }
}

/// A row and the log of its simulated host
pub struct Harness {
    pub row: SwipeRow<SimView>,
    pub log: Rc<RefCell<SimLog>>,
}

impl Harness {
    pub fn new(actions: &[Rc<TestAction>]) -> Self {
        Self::with_config(SwipeConfig::default(), actions)
    }

    pub fn with_config(config: SwipeConfig, actions: &[Rc<TestAction>]) -> Self {
        let host = SimHost::new();
        let log = host.log();
        let row = SwipeRow::new(config, RowBounds::new(ROW_WIDTH, ROW_HEIGHT), host);
        row.set_actions(
            actions
                .iter()
                .map(|action| action.clone() as Rc<dyn SwipeAction<SimView>>)
                .collect(),
        );
        Self { row, log }
    }

    /// Begin a pan and feed horizontal translations
    pub fn drag(&self, xs: &[f32]) {
        self.row.pan_began();
        self.drag_more(xs);
    }

    pub fn drag_more(&self, xs: &[f32]) {
        for x in xs {
            self.row
                .pan_changed(Vector::horizontal(*x), Vector::horizontal(0.0));
        }
    }

    pub fn release(&self, velocity_x: f32) {
        self.row.pan_ended(Vector::horizontal(velocity_x));
    }

    pub fn settle(&self) {
        self.row.settle(FRAME);
    }

    pub fn offset(&self) -> f32 {
        self.row.state().offset
    }

    pub fn is_mounted(&self, slot: swipe_reveal::commands::ViewSlot) -> bool {
        self.log.borrow().mounted.contains_key(&slot)
    }

    pub fn haptics(&self) -> usize {
        self.log.borrow().haptics
    }
}

pub fn action(id: &str, edge: Edge, width: f32) -> Rc<TestAction> {
    Rc::new(TestAction::new(id, edge, width))
}

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-2,
        "expected {} got {}",
        expected,
        actual
    );
}
