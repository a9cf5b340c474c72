//! Update functions for the Elm-style architecture
//!
//! All state transformations of a row flow through these functions. They are
//! pure: side effects are returned as [`Cmd`]s for the row runtime.

mod control;
mod gesture;
pub mod offset;
mod outcome;

use crate::action::Edge;
use crate::commands::Cmd;
use crate::messages::{Msg, PanelMsg, TransitionMsg, TransitionToken};
use crate::model::{AfterOffset, Phase, SwipeModel};
use crate::transition::Transition;

#[cfg(debug_assertions)]
use crate::tracing::StateSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use control::update_control;
pub use gesture::update_gesture;
pub use outcome::{apply_outcome, update_item, update_outcome};

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update(model: &mut SwipeModel, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(model, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(model, msg)
    }
}

fn update_inner(model: &mut SwipeModel, msg: Msg) -> Option<Cmd> {
    match msg {
        Msg::Gesture(m) => gesture::update_gesture(model, m),
        Msg::Item(m) => outcome::update_item(model, m),
        Msg::Control(m) => control::update_control(model, m),
        Msg::Panel(m) => update_panel(model, m),
        Msg::Transition(m) => update_transition(model, m),
        Msg::Outcome { ticket, outcome } => outcome::update_outcome(model, ticket, outcome),
    }
}

pub fn update_panel(model: &mut SwipeModel, msg: PanelMsg) -> Option<Cmd> {
    match msg {
        PanelMsg::Mounted {
            edge,
            generation,
            widths,
        } => panel_mounted(model, edge, generation, widths),
    }
}

fn panel_mounted(
    model: &mut SwipeModel,
    edge: Edge,
    generation: u64,
    widths: Vec<f32>,
) -> Option<Cmd> {
    match *model.mounting.get(edge) {
        Some(expected) if expected == generation => {}
        Some(_) => return None,
        None => {
            tracing::debug!(target: "panel", ?edge, generation, "mount no longer wanted");
            return Some(Cmd::UnmountPanel { edge });
        }
    }
    *model.mounting.get_mut(edge) = None;

    let panel = offset::build_panel(model, edge, generation, widths);
    if panel.metrics.item_count() != panel.actions.len() {
        tracing::warn!(
            target: "panel",
            ?edge,
            measured = panel.metrics.item_count(),
            actions = panel.actions.len(),
            "measured widths do not match actions"
        );
        return Some(Cmd::UnmountPanel { edge });
    }
    tracing::debug!(
        target: "panel",
        ?edge,
        generation,
        preferred_width = panel.preferred_width(),
        "panel mounted"
    );
    *model.panels.get_mut(edge) = Some(panel);

    let cmds = match model.pending_open.take() {
        Some((pending, transition)) if pending == edge => {
            control::finish_pending_open(model, edge, transition)
        }
        other => {
            model.pending_open = other;
            let offset = model.offset;
            let mut cmds = offset::apply_offset(
                model,
                offset::OffsetRequest::new(offset, Transition::Immediate),
            );
            if model.phase == Phase::Open && model.active_edge() == Some(edge) {
                cmds.extend(control::resettle_open(model, edge));
            }
            cmds
        }
    };
    Cmd::batch(cmds)
}

pub fn update_transition(model: &mut SwipeModel, msg: TransitionMsg) -> Option<Cmd> {
    let TransitionMsg::Finished { token, finished } = msg;
    match token {
        TransitionToken::OffsetApplied { seq } => offset_applied(model, seq, finished),
        TransitionToken::ExpandedCollapsed { edge, generation } => {
            let panel = model.panel_mut(edge)?;
            if panel.generation != generation || panel.expanded {
                return None;
            }
            let view = panel.expanded_view.take()?;
            view.dedicated.then_some(Cmd::UnmountExpanded { edge })
        }
        TransitionToken::AlertDismissed { edge, generation } => {
            let panel = model.panel(edge)?;
            (panel.generation == generation && panel.alert.is_none())
                .then_some(Cmd::UnmountAlert { edge })
        }
    }
}

fn offset_applied(model: &mut SwipeModel, seq: u64, finished: bool) -> Option<Cmd> {
    let mut cmds = Vec::new();

    // An interrupted write leaves the content short of zero, over the panel
    for edge in Edge::ALL {
        let retired = finished
            && model
                .panel(edge)
                .is_some_and(|panel| panel.retired_at == Some(seq));
        if retired {
            tracing::debug!(target: "panel", ?edge, "panel retired");
            *model.panels.get_mut(edge) = None;
            cmds.push(Cmd::UnmountPanel { edge });
        }
    }

    let after = match model.after_offset.take() {
        Some((pending, after)) if pending == seq => Some(after),
        other => {
            model.after_offset = other;
            None
        }
    };

    match after {
        Some(AfterOffset::Settle { open }) => {
            if finished && matches!(model.phase, Phase::Settling { .. }) {
                model.phase = if open { Phase::Open } else { Phase::Closed };
            }
        }
        Some(AfterOffset::ExpandOutcome(callback)) => {
            cmds.extend(offset::apply_offset(
                model,
                offset::OffsetRequest::new(0.0, Transition::Immediate),
            ));
            model.phase = Phase::Closed;
            if let Some(callback) = callback {
                cmds.push(Cmd::RunCallback(callback));
            }
        }
        None => {}
    }

    Cmd::batch(cmds)
}

/// Traced update wrapper (debug builds only)
///
/// Logs each message with before/after state diffs and checks invariants.
#[cfg(debug_assertions)]
fn update_traced(model: &mut SwipeModel, msg: Msg) -> Option<Cmd> {
    use crate::messages::GestureMsg;

    // Drag samples arrive every frame
    let is_noisy = matches!(&msg, Msg::Gesture(GestureMsg::Changed { .. }));

    let msg_name = msg_type_name(&msg);
    let _span = if is_noisy {
        None
    } else {
        Some(span!(Level::DEBUG, "update", msg = %msg_name).entered())
    };

    let before = StateSnapshot::from_model(model);
    if !is_noisy {
        debug!(target: "message", msg = %msg_name, "processing");
    }

    let result = update_inner(model, msg);

    if let Some(diff) = before.diff(&StateSnapshot::from_model(model)) {
        debug!(target: "state", %diff, "state changed");
    }
    model.assert_invariants(&msg_name);

    result
}

/// Get a display name for a message type
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    match msg {
        Msg::Gesture(m) => format!("Gesture::{:?}", m),
        Msg::Item(m) => format!("Item::{:?}", m),
        Msg::Control(m) => format!("Control::{:?}", m),
        Msg::Panel(m) => format!("Panel::{:?}", m),
        Msg::Transition(m) => format!("Transition::{:?}", m),
        Msg::Outcome { ticket, outcome } => {
            format!("Outcome({}, {})", ticket.0, outcome.name())
        }
    }
}
