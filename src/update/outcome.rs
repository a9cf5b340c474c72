//! Handler outcomes and item/alert touches

use crate::action::{ActionEvent, ActionKey, Edge, Outcome};
use crate::commands::{Cmd, GeometryUpdate, ViewSlot};
use crate::geometry::Rect;
use crate::messages::{HandlerTicket, ItemMsg};
use crate::model::{AfterOffset, Phase, SwipeModel};
use crate::transition::{Transition, TransitionCurve};

use super::offset::{apply_offset, close, dismiss_alert, settle_transition, OffsetRequest};

/// Duration of the highlight fade after an item is released
const HIGHLIGHT_FADE: std::time::Duration = std::time::Duration::from_millis(500);

/// Outcome reported through a handler's completion
pub fn update_outcome(
    model: &mut SwipeModel,
    ticket: HandlerTicket,
    outcome: Outcome,
) -> Option<Cmd> {
    let Some(action) = model.take_ticket(ticket) else {
        tracing::debug!(?ticket, outcome = outcome.name(), "ignoring stale or repeated outcome");
        return None;
    };
    Cmd::batch(apply_outcome(model, action, outcome))
}

/// Apply `outcome` for `action`, whether reported by a handler or delivered manually
pub fn apply_outcome(model: &mut SwipeModel, action: ActionKey, outcome: Outcome) -> Vec<Cmd> {
    tracing::debug!(%action, outcome = outcome.name(), "applying outcome");
    let transition = model.config.default_transition();
    let edge = action.edge;

    let located = model
        .active_panel(edge)
        .and_then(|panel| panel.index_of(&action).map(|index| (index, panel.preferred_width())));

    let Some((index, preferred_width)) = located else {
        tracing::debug!(%action, "action not on screen, closing");
        let mut cmds = close(model, transition);
        if let Outcome::Expanded(Some(callback)) = outcome {
            cmds.push(Cmd::RunCallback(callback));
        }
        return cmds;
    };

    match outcome {
        Outcome::Close => close(model, transition),
        Outcome::Hold => {
            let cmds = apply_offset(
                model,
                OffsetRequest::new(edge.sign() * preferred_width, transition)
                    .then(AfterOffset::Settle { open: true }),
            );
            model.phase = Phase::Settling { open: true };
            cmds
        }
        Outcome::Alert => show_alert(model, action, index, preferred_width, transition),
        Outcome::Expanded(callback) => {
            let target = edge.sign() * (model.bounds.width + model.config.edge_gap);
            let transition = settle_transition(model, model.gesture.last_velocity, target);
            let cmds = apply_offset(
                model,
                OffsetRequest::new(target, transition)
                    .forced(index)
                    .then(AfterOffset::ExpandOutcome(callback)),
            );
            model.phase = Phase::Expanding;
            cmds
        }
    }
}

fn show_alert(
    model: &mut SwipeModel,
    action: ActionKey,
    index: usize,
    preferred_width: f32,
    transition: Transition,
) -> Vec<Cmd> {
    let edge = action.edge;
    let has_alert = model
        .panel(edge)
        .and_then(|panel| panel.actions.get(index))
        .is_some_and(|descriptor| descriptor.has_alert_content);
    if !has_alert {
        panic!("alert outcome for {} which has no alert content", action);
    }

    let mut cmds = apply_offset(
        model,
        OffsetRequest::new(edge.sign() * preferred_width, transition)
            .then(AfterOffset::Settle { open: true }),
    );

    let Some(panel) = model.panel_mut(edge) else {
        return cmds;
    };
    let start = panel.frames.get(index).copied().unwrap_or(Rect::ZERO);
    let end = Rect::new(0.0, 0.0, panel.container.width, panel.container.height);
    panel.alert = Some(index);

    let slot = ViewSlot::Alert(edge);
    cmds.push(Cmd::MountAlert { edge, action });
    cmds.push(Cmd::geometry(
        vec![
            GeometryUpdate::frame(slot, start),
            GeometryUpdate::opacity(slot, 1.0),
        ],
        Transition::Immediate,
        None,
    ));
    cmds.push(Cmd::geometry(
        vec![GeometryUpdate::frame(slot, end)],
        transition,
        None,
    ));
    model.phase = Phase::Alert;
    cmds
}

pub fn update_item(model: &mut SwipeModel, msg: ItemMsg) -> Option<Cmd> {
    match msg {
        ItemMsg::Pressed { edge, index } => {
            let opacity = model
                .panel(edge)?
                .actions
                .get(index)?
                .highlight_opacity;
            Some(Cmd::geometry(
                vec![GeometryUpdate::opacity(
                    ViewSlot::Highlight { edge, index },
                    opacity,
                )],
                Transition::Immediate,
                None,
            ))
        }
        ItemMsg::Released { edge, index } => {
            model.panel(edge)?.actions.get(index)?;
            Some(Cmd::geometry(
                vec![GeometryUpdate::opacity(
                    ViewSlot::Highlight { edge, index },
                    0.0,
                )],
                Transition::animated(HIGHLIGHT_FADE, TransitionCurve::EaseOut),
                None,
            ))
        }
        ItemMsg::Tapped { edge, index } => {
            let action = model.active_panel(edge)?.actions.get(index)?.key.clone();
            Some(invoke(model, action, ActionEvent::Tap))
        }
        ItemMsg::AlertTapped { edge } => alert_tapped(model, edge),
    }
}

fn alert_tapped(model: &mut SwipeModel, edge: Edge) -> Option<Cmd> {
    let panel = model.panel(edge)?;
    let index = panel.alert?;
    let action = panel.actions.get(index)?.key.clone();

    let mut cmds = vec![invoke(model, action, ActionEvent::Alert)];
    let transition = model.config.default_transition();
    cmds.extend(dismiss_alert(model, edge, transition));
    Cmd::batch(cmds)
}

fn invoke(model: &mut SwipeModel, action: ActionKey, event: ActionEvent) -> Cmd {
    tracing::debug!(%action, ?event, "invoking handler");
    let ticket = model.issue_ticket(action.clone());
    model.phase = Phase::AwaitingOutcome;
    Cmd::InvokeHandler {
        action,
        event,
        ticket,
    }
}
