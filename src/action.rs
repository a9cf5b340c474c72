//! Swipe actions and the handler contract
//!
//! An action is identified by `(identifier, edge)`. It produces its visual
//! content lazily and handles invocations asynchronously: `handle` receives a
//! [`Completion`] that must be completed with an [`Outcome`] exactly once.
//! Only the first outcome per invocation is processed.

use std::fmt;
use std::rc::Weak;

use serde::{Deserialize, Serialize};

use crate::messages::{ControlMsg, HandlerTicket, Msg};
use crate::transition::Transition;

/// Side of the row an action panel is revealed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Left,
    Right,
}

impl Edge {
    pub const ALL: [Edge; 2] = [Edge::Left, Edge::Right];

    pub fn is_left(self) -> bool {
        self == Edge::Left
    }

    /// Sign of offsets that reveal this edge
    pub fn sign(self) -> f32 {
        match self {
            Edge::Left => 1.0,
            Edge::Right => -1.0,
        }
    }

    /// Whether `offset` reveals this edge
    pub fn is_opened_by(self, offset: f32) -> bool {
        offset * self.sign() > 0.0
    }

    /// The edge a signed reveal offset points at, if any
    pub fn from_offset(offset: f32) -> Option<Edge> {
        if offset > 0.0 {
            Some(Edge::Left)
        } else if offset < 0.0 {
            Some(Edge::Right)
        } else {
            None
        }
    }
}

/// Identity of an action within a row
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActionKey {
    pub identifier: String,
    pub edge: Edge,
}

impl ActionKey {
    pub fn new(identifier: impl Into<String>, edge: Edge) -> Self {
        Self {
            identifier: identifier.into(),
            edge,
        }
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:?}", self.identifier, self.edge)
    }
}

/// What caused a handler invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionEvent {
    /// The action item was tapped
    Tap,
    /// The row was released past the full-swipe threshold
    Expanded,
    /// The confirmation alert was tapped
    Alert,
}

/// Callback run once an `Expanded` outcome has finished animating
pub struct OnComplete(Box<dyn FnOnce()>);

impl OnComplete {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Box::new(f))
    }

    pub fn call(self) {
        (self.0)()
    }
}

impl fmt::Debug for OnComplete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OnComplete")
    }
}

/// What the row should do after a handler ran
#[derive(Debug)]
pub enum Outcome {
    /// Settle back to closed
    Close,
    /// Stay open at the panel's preferred width
    Hold,
    /// Stay open and show the action's alert content
    Alert,
    /// Slide the row fully out, reset to closed, then run the callback
    Expanded(Option<OnComplete>),
}

impl Outcome {
    pub fn name(&self) -> &'static str {
        match self {
            Outcome::Close => "close",
            Outcome::Hold => "hold",
            Outcome::Alert => "alert",
            Outcome::Expanded(_) => "expanded",
        }
    }
}

/// Capability summary the state machine needs about an action
#[derive(Debug, Clone, PartialEq)]
pub struct ActionDescriptor {
    pub key: ActionKey,
    pub has_expanded_content: bool,
    pub has_alert_content: bool,
    pub fades_expanded_content: bool,
    /// Highlight overlay opacity while the item is pressed
    pub highlight_opacity: f32,
}

impl ActionDescriptor {
    /// Descriptor with no optional capabilities
    pub fn plain(identifier: impl Into<String>, edge: Edge) -> Self {
        Self {
            key: ActionKey::new(identifier, edge),
            has_expanded_content: false,
            has_alert_content: false,
            fades_expanded_content: true,
            highlight_opacity: DEFAULT_HIGHLIGHT_OPACITY,
        }
    }
}

pub const DEFAULT_HIGHLIGHT_OPACITY: f32 = 0.3;

/// A swipe action producing views of type `V`
///
/// Only `identifier`, `edge`, `make_content` and `handle` are required. The
/// `has_*` queries must agree with the matching `make_*` producers; the row
/// relies on them to plan layout without materializing content.
pub trait SwipeAction<V> {
    fn identifier(&self) -> &str;

    fn edge(&self) -> Edge;

    fn make_content(&self) -> V;

    fn make_background(&self) -> Option<V> {
        None
    }

    fn make_expanded(&self) -> Option<V> {
        None
    }

    fn make_alert(&self) -> Option<V> {
        None
    }

    fn has_expanded_content(&self) -> bool {
        false
    }

    fn has_alert_content(&self) -> bool {
        false
    }

    /// Fade dedicated expanded content in when it appears
    fn fades_expanded_content(&self) -> bool {
        true
    }

    fn highlight_opacity(&self) -> f32 {
        DEFAULT_HIGHLIGHT_OPACITY
    }

    /// Called when a panel containing this action is instantiated
    fn will_show(&self) {}

    fn handle(&self, completion: Completion, event: ActionEvent);

    fn key(&self) -> ActionKey {
        ActionKey::new(self.identifier(), self.edge())
    }

    fn descriptor(&self) -> ActionDescriptor {
        ActionDescriptor {
            key: self.key(),
            has_expanded_content: self.has_expanded_content(),
            has_alert_content: self.has_alert_content(),
            fades_expanded_content: self.fades_expanded_content(),
            highlight_opacity: self.highlight_opacity(),
        }
    }
}

type Producer<V> = Box<dyn Fn() -> V>;
type Handler = Box<dyn Fn(Completion, ActionEvent)>;

/// Closure-backed action
pub struct ClosureAction<V> {
    identifier: String,
    edge: Edge,
    content: Producer<V>,
    background: Option<Producer<V>>,
    expanded: Option<Producer<V>>,
    alert: Option<Producer<V>>,
    fade_expanded: bool,
    highlight_opacity: f32,
    handler: Handler,
}

impl<V> ClosureAction<V> {
    pub fn new(
        identifier: impl Into<String>,
        edge: Edge,
        content: impl Fn() -> V + 'static,
        handler: impl Fn(Completion, ActionEvent) + 'static,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            edge,
            content: Box::new(content),
            background: None,
            expanded: None,
            alert: None,
            fade_expanded: true,
            highlight_opacity: DEFAULT_HIGHLIGHT_OPACITY,
            handler: Box::new(handler),
        }
    }

    pub fn with_background(mut self, background: impl Fn() -> V + 'static) -> Self {
        self.background = Some(Box::new(background));
        self
    }

    pub fn with_expanded(mut self, expanded: impl Fn() -> V + 'static) -> Self {
        self.expanded = Some(Box::new(expanded));
        self
    }

    pub fn with_alert(mut self, alert: impl Fn() -> V + 'static) -> Self {
        self.alert = Some(Box::new(alert));
        self
    }

    /// Whether expanded content fades in (default) or appears at once
    pub fn with_fade_expanded(mut self, fade: bool) -> Self {
        self.fade_expanded = fade;
        self
    }

    pub fn with_highlight_opacity(mut self, opacity: f32) -> Self {
        self.highlight_opacity = opacity;
        self
    }
}

impl<V> SwipeAction<V> for ClosureAction<V> {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn edge(&self) -> Edge {
        self.edge
    }

    fn make_content(&self) -> V {
        (self.content)()
    }

    fn make_background(&self) -> Option<V> {
        self.background.as_ref().map(|f| f())
    }

    fn make_expanded(&self) -> Option<V> {
        self.expanded.as_ref().map(|f| f())
    }

    fn make_alert(&self) -> Option<V> {
        self.alert.as_ref().map(|f| f())
    }

    fn has_expanded_content(&self) -> bool {
        self.expanded.is_some()
    }

    fn has_alert_content(&self) -> bool {
        self.alert.is_some()
    }

    fn fades_expanded_content(&self) -> bool {
        self.fade_expanded
    }

    fn highlight_opacity(&self) -> f32 {
        self.highlight_opacity
    }

    fn handle(&self, completion: Completion, event: ActionEvent) {
        (self.handler)(completion, event)
    }
}

/// Receiver of messages for a row; implemented by the row runtime
pub(crate) trait Dispatch {
    fn dispatch(&self, msg: Msg);
}

struct Detached;

impl Dispatch for Detached {
    fn dispatch(&self, _msg: Msg) {}
}

/// Weak handle to a row, usable from handlers and external UI
///
/// Every call is a silent no-op once the row is gone.
#[derive(Clone)]
pub struct RowHandle {
    target: Weak<dyn Dispatch>,
}

impl RowHandle {
    pub(crate) fn new(target: Weak<dyn Dispatch>) -> Self {
        Self { target }
    }

    /// A handle that is not attached to any row
    pub fn detached() -> Self {
        let target: Weak<dyn Dispatch> = Weak::<Detached>::new();
        Self { target }
    }

    pub fn is_attached(&self) -> bool {
        self.target.strong_count() > 0
    }

    pub fn open(&self, edge: Edge, transition: Transition) {
        self.post(Msg::Control(ControlMsg::Open { edge, transition }));
    }

    pub fn close(&self, transition: Transition) {
        self.post(Msg::Control(ControlMsg::Close { transition }));
    }

    /// Feed an outcome for `action` back into the row outside a handler call
    pub fn deliver_outcome(&self, action: ActionKey, outcome: Outcome) {
        self.post(Msg::Control(ControlMsg::DeliverOutcome { action, outcome }));
    }

    pub(crate) fn post(&self, msg: Msg) {
        match self.target.upgrade() {
            Some(target) => target.dispatch(msg),
            None => tracing::debug!("dropping message for detached row"),
        }
    }
}

impl fmt::Debug for RowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowHandle")
            .field("attached", &self.is_attached())
            .finish()
    }
}

/// One-shot completion handed to [`SwipeAction::handle`]
#[derive(Debug)]
pub struct Completion {
    ticket: HandlerTicket,
    row: RowHandle,
}

impl Completion {
    pub(crate) fn new(ticket: HandlerTicket, row: RowHandle) -> Self {
        Self { ticket, row }
    }

    pub fn ticket(&self) -> HandlerTicket {
        self.ticket
    }

    /// The row that invoked the handler
    pub fn row(&self) -> &RowHandle {
        &self.row
    }

    pub fn complete(self, outcome: Outcome) {
        self.row.post(Msg::Outcome {
            ticket: self.ticket,
            outcome,
        });
    }
}
