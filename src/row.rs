//! Row runtime
//!
//! [`SwipeRow`] owns a row's model, its action registry, the transition
//! scheduler and the host's view collaborator. It feeds messages through
//! `update` and executes the resulting commands.
//!
//! Messages are queued in a mailbox and drained one at a time, so a handler
//! that completes synchronously (or calls back into the row) never re-enters
//! `update` while another message is being processed. Handlers, callbacks and
//! sibling closes run after the row state is released.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::action::{ActionKey, Completion, Dispatch, Edge, Outcome, RowHandle, SwipeAction};
use crate::commands::{Cmd, ViewSlot};
use crate::config::SwipeConfig;
use crate::geometry::{Rect, Vector};
use crate::messages::{ControlMsg, GestureMsg, ItemMsg, Msg, PanelMsg, TransitionMsg};
use crate::model::{Phase, RevealState, RowBounds, SwipeModel};
use crate::registry::ActionRegistry;
use crate::scheduler::{Completed, GeometrySink, TransitionScheduler};
use crate::transition::Transition;
use crate::update::update;

/// The host's view system, as seen by a row
///
/// Frames of items, highlights, expanded and alert views are relative to
/// their edge's panel container; content and panel frames are relative to
/// the row.
pub trait ViewHost<V>: GeometrySink {
    /// Natural width of `view` when laid out at `height`
    fn measure(&mut self, view: &V, height: f32) -> f32;

    fn mount_panel(&mut self, edge: Edge);

    /// Put an action item on screen with its optional background
    fn mount_item(&mut self, slot: ViewSlot, content: &V, background: Option<&V>);

    /// Put expanded or alert content on screen above the items
    fn mount_overlay(&mut self, slot: ViewSlot, view: &V);

    fn unmount(&mut self, slot: ViewSlot);

    /// Bring a slot above its siblings
    fn raise(&mut self, _slot: ViewSlot) {}

    fn haptic(&mut self) {}
}

/// Work that must run without the row state borrowed
enum Deferred<V> {
    Invoke {
        action: Rc<dyn SwipeAction<V>>,
        completion: Completion,
        event: crate::action::ActionEvent,
    },
    CloseSiblings(Transition),
    Callback(crate::action::OnComplete),
}

struct RowCore<V> {
    model: SwipeModel,
    registry: ActionRegistry<V>,
    scheduler: TransitionScheduler,
    host: Box<dyn ViewHost<V>>,
    /// Item count of each mounted panel
    mounted_items: [usize; 2],
}

fn edge_index(edge: Edge) -> usize {
    match edge {
        Edge::Left => 0,
        Edge::Right => 1,
    }
}

impl<V: 'static> RowCore<V> {
    fn execute(
        &mut self,
        cmd: Cmd,
        handle: &RowHandle,
        outbox: &mut Vec<Msg>,
        deferred: &mut Vec<Deferred<V>>,
    ) {
        match cmd {
            Cmd::SetGeometry {
                updates,
                transition,
                token,
            } => {
                let done = self
                    .scheduler
                    .apply(&updates, transition, token, self.host.as_mut());
                outbox.extend(done.into_iter().map(finished));
            }
            Cmd::StopAnimations => {
                outbox.extend(self.scheduler.stop_all().into_iter().map(finished));
            }
            Cmd::MountPanel { edge, generation } => {
                if self.mounted_items[edge_index(edge)] > 0 {
                    self.unmount_panel(edge, outbox);
                }
                let widths = self.mount_panel(edge);
                outbox.push(Msg::Panel(PanelMsg::Mounted {
                    edge,
                    generation,
                    widths,
                }));
            }
            Cmd::UnmountPanel { edge } => self.unmount_panel(edge, outbox),
            Cmd::MountExpanded { edge, action } => {
                let view = self
                    .registry
                    .get(&action)
                    .and_then(|entry| entry.action().make_expanded());
                match view {
                    Some(view) => self.host.mount_overlay(ViewSlot::Expanded(edge), &view),
                    None => panic!("action {} reported expanded content but made none", action),
                }
            }
            Cmd::UnmountExpanded { edge } => self.unmount_slot(ViewSlot::Expanded(edge), outbox),
            Cmd::RaiseItem { edge, index } => self.host.raise(ViewSlot::Item { edge, index }),
            Cmd::MountAlert { edge, action } => {
                let view = self
                    .registry
                    .get(&action)
                    .and_then(|entry| entry.action().make_alert());
                match view {
                    Some(view) => self.host.mount_overlay(ViewSlot::Alert(edge), &view),
                    None => panic!("action {} reported alert content but made none", action),
                }
            }
            Cmd::UnmountAlert { edge } => self.unmount_slot(ViewSlot::Alert(edge), outbox),
            Cmd::InvokeHandler {
                action,
                event,
                ticket,
            } => match self.registry.get(&action) {
                Some(entry) => deferred.push(Deferred::Invoke {
                    action: entry.action().clone(),
                    completion: Completion::new(ticket, handle.clone()),
                    event,
                }),
                None => {
                    tracing::warn!(%action, "handler requested for unregistered action");
                    outbox.push(Msg::Outcome {
                        ticket,
                        outcome: Outcome::Close,
                    });
                }
            },
            Cmd::CloseSiblings { transition } => deferred.push(Deferred::CloseSiblings(transition)),
            Cmd::Haptic => self.host.haptic(),
            Cmd::RunCallback(callback) => deferred.push(Deferred::Callback(callback)),
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.execute(cmd, handle, outbox, deferred);
                }
            }
        }
    }

    /// Materialize, mount and measure every action on `edge`
    fn mount_panel(&mut self, edge: Edge) -> Vec<f32> {
        let height = self.model.bounds.height;
        self.host.mount_panel(edge);
        let mut widths = Vec::new();
        for (index, entry) in self.registry.on_edge(edge).enumerate() {
            entry.action().will_show();
            let content = entry.content();
            let slot = ViewSlot::Item { edge, index };
            self.host.mount_item(slot, content, entry.background());
            widths.push(self.host.measure(content, height).floor());
        }
        self.mounted_items[edge_index(edge)] = widths.len();
        widths
    }

    fn unmount_panel(&mut self, edge: Edge, outbox: &mut Vec<Msg>) {
        let count = std::mem::take(&mut self.mounted_items[edge_index(edge)]);
        self.unmount_slot(ViewSlot::Alert(edge), outbox);
        self.unmount_slot(ViewSlot::Expanded(edge), outbox);
        for index in 0..count {
            outbox.extend(
                self.scheduler
                    .forget(ViewSlot::Highlight { edge, index })
                    .into_iter()
                    .map(finished),
            );
            self.unmount_slot(ViewSlot::Item { edge, index }, outbox);
        }
        self.unmount_slot(ViewSlot::Panel(edge), outbox);
    }

    fn unmount_slot(&mut self, slot: ViewSlot, outbox: &mut Vec<Msg>) {
        outbox.extend(self.scheduler.forget(slot).into_iter().map(finished));
        self.host.unmount(slot);
    }
}

fn finished(completed: Completed) -> Msg {
    Msg::Transition(TransitionMsg::Finished {
        token: completed.token,
        finished: completed.finished,
    })
}

struct RowShared<V> {
    core: RefCell<RowCore<V>>,
    mailbox: RefCell<VecDeque<Msg>>,
    group: RefCell<Option<SwipeGroup<V>>>,
    this: Weak<RowShared<V>>,
}

impl<V: 'static> RowShared<V> {
    fn handle(&self) -> RowHandle {
        let target: Weak<dyn Dispatch> = self.this.clone();
        RowHandle::new(target)
    }

    /// Process queued messages until the mailbox is empty
    ///
    /// Returns immediately when called from inside another drain; the outer
    /// drain picks the messages up.
    fn drain(&self) {
        loop {
            let mut deferred = Vec::new();
            {
                let Ok(mut core) = self.core.try_borrow_mut() else {
                    return;
                };
                let Some(msg) = self.mailbox.borrow_mut().pop_front() else {
                    return;
                };
                if let Some(cmd) = update(&mut core.model, msg) {
                    let mut outbox = Vec::new();
                    core.execute(cmd, &self.handle(), &mut outbox, &mut deferred);
                    self.mailbox.borrow_mut().extend(outbox);
                }
            }
            self.run_deferred(deferred);
        }
    }

    fn run_deferred(&self, deferred: Vec<Deferred<V>>) {
        for work in deferred {
            match work {
                Deferred::Invoke {
                    action,
                    completion,
                    event,
                } => action.handle(completion, event),
                Deferred::CloseSiblings(transition) => {
                    let group = self.group.borrow().clone();
                    if let Some(group) = group {
                        group.close_others(&self.this, transition);
                    }
                }
                Deferred::Callback(callback) => callback.call(),
            }
        }
    }
}

impl<V: 'static> Dispatch for RowShared<V> {
    fn dispatch(&self, msg: Msg) {
        self.mailbox.borrow_mut().push_back(msg);
        self.drain();
    }
}

/// One swipeable row
pub struct SwipeRow<V> {
    shared: Rc<RowShared<V>>,
}

impl<V: 'static> SwipeRow<V> {
    pub fn new(config: SwipeConfig, bounds: RowBounds, host: impl ViewHost<V> + 'static) -> Self {
        let core = RowCore {
            model: SwipeModel::new(config, bounds),
            registry: ActionRegistry::default(),
            scheduler: TransitionScheduler::new(),
            host: Box::new(host),
            mounted_items: [0; 2],
        };
        let shared = Rc::new_cyclic(|this| RowShared {
            core: RefCell::new(core),
            mailbox: RefCell::new(VecDeque::new()),
            group: RefCell::new(None),
            this: this.clone(),
        });
        let row = Self { shared };
        row.send(Msg::Control(ControlMsg::Close {
            transition: Transition::Immediate,
        }));
        row
    }

    pub fn send(&self, msg: Msg) {
        self.shared.dispatch(msg);
    }

    pub fn handle(&self) -> RowHandle {
        self.shared.handle()
    }

    /// Replace the action set
    pub fn set_actions(&self, actions: Vec<Rc<dyn SwipeAction<V>>>) {
        let descriptors = {
            let mut core = self.shared.core.borrow_mut();
            core.registry.replace(actions);
            core.registry.descriptors()
        };
        self.send(Msg::Control(ControlMsg::SetActions(descriptors)));
    }

    pub fn set_config(&self, config: SwipeConfig) {
        self.send(Msg::Control(ControlMsg::SetConfig(config)));
    }

    pub fn set_bounds(&self, bounds: RowBounds) {
        self.send(Msg::Control(ControlMsg::SetBounds(bounds)));
    }

    pub fn pan_began(&self) {
        let visual_offset = self
            .shared
            .core
            .borrow()
            .scheduler
            .frame(ViewSlot::Content)
            .map(|frame| frame.x);
        self.send(Msg::Gesture(GestureMsg::Began { visual_offset }));
    }

    pub fn pan_changed(&self, translation: Vector, velocity: Vector) {
        self.send(Msg::Gesture(GestureMsg::Changed {
            translation,
            velocity,
        }));
    }

    pub fn pan_ended(&self, velocity: Vector) {
        self.send(Msg::Gesture(GestureMsg::Ended { velocity }));
    }

    pub fn pan_cancelled(&self) {
        self.send(Msg::Gesture(GestureMsg::Cancelled));
    }

    pub fn press_item(&self, edge: Edge, index: usize) {
        self.send(Msg::Item(ItemMsg::Pressed { edge, index }));
    }

    pub fn release_item(&self, edge: Edge, index: usize) {
        self.send(Msg::Item(ItemMsg::Released { edge, index }));
    }

    pub fn tap_item(&self, edge: Edge, index: usize) {
        self.send(Msg::Item(ItemMsg::Tapped { edge, index }));
    }

    pub fn tap_alert(&self, edge: Edge) {
        self.send(Msg::Item(ItemMsg::AlertTapped { edge }));
    }

    pub fn open(&self, edge: Edge, transition: Transition) {
        self.send(Msg::Control(ControlMsg::Open { edge, transition }));
    }

    pub fn close(&self, transition: Transition) {
        self.send(Msg::Control(ControlMsg::Close { transition }));
    }

    /// Apply `outcome` for `action` outside a handler invocation
    ///
    /// Falls back to closing when the action is not on screen.
    pub fn deliver_outcome(&self, action: &ActionKey, outcome: Outcome) {
        self.send(Msg::Control(ControlMsg::DeliverOutcome {
            action: action.clone(),
            outcome,
        }));
    }

    pub fn container_did_scroll(&self) {
        self.send(Msg::Control(ControlMsg::ContainerScrolled));
    }

    /// Advance animations by one host frame
    pub fn advance(&self, dt: Duration) {
        let done = {
            let mut core = self.shared.core.borrow_mut();
            let RowCore {
                scheduler, host, ..
            } = &mut *core;
            scheduler.advance(dt, host.as_mut())
        };
        if done.is_empty() {
            return;
        }
        self.shared
            .mailbox
            .borrow_mut()
            .extend(done.into_iter().map(finished));
        self.shared.drain();
    }

    /// Advance in `step` increments until no animation is running
    pub fn settle(&self, step: Duration) {
        // Bounded in case a handler keeps restarting animations
        for _ in 0..10_000 {
            if self.is_idle() {
                return;
            }
            self.advance(step);
        }
        tracing::warn!("row still animating after settle");
    }

    pub fn is_idle(&self) -> bool {
        self.shared.core.borrow().scheduler.is_idle()
    }

    pub fn state(&self) -> RevealState {
        self.shared.core.borrow().model.reveal_state()
    }

    pub fn phase(&self) -> Phase {
        self.shared.core.borrow().model.phase
    }

    pub fn config(&self) -> SwipeConfig {
        self.shared.core.borrow().model.config.clone()
    }

    /// Current visual frame of a slot
    pub fn frame(&self, slot: ViewSlot) -> Option<Rect> {
        self.shared.core.borrow().scheduler.frame(slot)
    }

    pub fn opacity(&self, slot: ViewSlot) -> Option<f32> {
        self.shared.core.borrow().scheduler.opacity(slot)
    }

    /// Whether the action's content view has been produced
    pub fn is_materialized(&self, action: &ActionKey) -> bool {
        self.shared
            .core
            .borrow()
            .registry
            .get(action)
            .is_some_and(|entry| entry.is_materialized())
    }

    /// Corner radius for the content and panels at the current row height
    pub fn corner_radius(&self) -> f32 {
        let core = self.shared.core.borrow();
        core.model.config.corner_radius.resolve(core.model.bounds.height)
    }

    /// Preferred width of the mounted panel on `edge`
    pub fn preferred_width(&self, edge: Edge) -> Option<f32> {
        self.shared
            .core
            .borrow()
            .model
            .panel(edge)
            .map(|panel| panel.preferred_width())
    }
}

/// Rows that close each other (rows of one list)
pub struct SwipeGroup<V> {
    rows: Rc<RefCell<Vec<Weak<RowShared<V>>>>>,
}

impl<V: 'static> Clone for SwipeGroup<V> {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows.clone(),
        }
    }
}

impl<V: 'static> Default for SwipeGroup<V> {
    fn default() -> Self {
        Self {
            rows: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<V: 'static> SwipeGroup<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, row: &SwipeRow<V>) {
        *row.shared.group.borrow_mut() = Some(self.clone());
        let mut rows = self.rows.borrow_mut();
        rows.retain(|weak| weak.strong_count() > 0);
        rows.push(Rc::downgrade(&row.shared));
    }

    /// Number of live rows
    pub fn len(&self) -> usize {
        self.rows
            .borrow()
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn live_rows(&self) -> Vec<Rc<RowShared<V>>> {
        self.rows.borrow().iter().filter_map(Weak::upgrade).collect()
    }

    fn close_others(&self, except: &Weak<RowShared<V>>, transition: Transition) {
        for row in self.live_rows() {
            if Weak::ptr_eq(&Rc::downgrade(&row), except) {
                continue;
            }
            let closed = row
                .core
                .try_borrow()
                .is_ok_and(|core| core.model.phase == Phase::Closed && core.model.offset == 0.0);
            if !closed {
                row.dispatch(Msg::Control(ControlMsg::Close { transition }));
            }
        }
    }

    /// Broadcast a container scroll to every row
    pub fn container_did_scroll(&self) {
        for row in self.live_rows() {
            row.dispatch(Msg::Control(ControlMsg::ContainerScrolled));
        }
    }
}
