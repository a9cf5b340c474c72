//! Programmatic control: open/close, action and config replacement

use crate::action::{ActionDescriptor, Edge};
use crate::commands::Cmd;
use crate::messages::ControlMsg;
use crate::model::{AfterOffset, Phase, RowBounds, SwipeModel};
use crate::transition::Transition;

use super::offset::{apply_offset, close, open_offset, request_mount, OffsetRequest};
use super::outcome::apply_outcome;

pub fn update_control(model: &mut SwipeModel, msg: ControlMsg) -> Option<Cmd> {
    match msg {
        ControlMsg::Open { edge, transition } => open(model, edge, transition),
        ControlMsg::Close { transition } => Cmd::batch(close(model, transition)),
        ControlMsg::DeliverOutcome { action, outcome } => {
            Cmd::batch(apply_outcome(model, action, outcome))
        }
        ControlMsg::SetActions(actions) => set_actions(model, actions),
        ControlMsg::SetConfig(config) => {
            if model.phase == Phase::Dragging {
                tracing::debug!("deferring config change until the drag ends");
                model.pending_config = Some(config);
            } else {
                model.apply_config(config);
            }
            None
        }
        ControlMsg::SetBounds(bounds) => set_bounds(model, bounds),
        ControlMsg::ContainerScrolled => {
            if model.phase == Phase::Dragging
                || (model.phase == Phase::Closed && model.offset == 0.0)
            {
                return None;
            }
            let transition = model.config.default_transition();
            Cmd::batch(close(model, transition))
        }
    }
}

fn open(model: &mut SwipeModel, edge: Edge, transition: Transition) -> Option<Cmd> {
    if !model.has_actions(edge) {
        tracing::debug!(?edge, "no actions to open");
        return None;
    }
    if edge.is_opened_by(model.offset) && model.phase != (Phase::Settling { open: false }) {
        return None;
    }

    let mut cmds = Vec::new();
    if model.config.close_others_on_open {
        cmds.push(Cmd::CloseSiblings { transition });
    }
    cmds.push(Cmd::StopAnimations);

    match open_offset(model, edge) {
        Some(target) => {
            cmds.extend(apply_offset(
                model,
                OffsetRequest::new(target, transition).then(AfterOffset::Settle { open: true }),
            ));
            model.phase = Phase::Settling { open: true };
        }
        None => {
            model.pending_open = Some((edge, transition));
            cmds.extend(request_mount(model, edge));
        }
    }
    Cmd::batch(cmds)
}

/// Continue a programmatic open once its panel has been measured
pub fn finish_pending_open(model: &mut SwipeModel, edge: Edge, transition: Transition) -> Vec<Cmd> {
    let Some(target) = open_offset(model, edge) else {
        return Vec::new();
    };
    let mut cmds = apply_offset(
        model,
        OffsetRequest::new(edge.sign(), Transition::Immediate),
    );
    cmds.extend(apply_offset(
        model,
        OffsetRequest::new(target, transition).then(AfterOffset::Settle { open: true }),
    ));
    model.phase = Phase::Settling { open: true };
    cmds
}

fn set_actions(model: &mut SwipeModel, actions: Vec<ActionDescriptor>) -> Option<Cmd> {
    let same_identity = model.actions.len() == actions.len()
        && model
            .actions
            .iter()
            .zip(&actions)
            .all(|(old, new)| old.key == new.key);

    if same_identity {
        model.actions = actions;
        for edge in Edge::ALL {
            let descriptors = model.actions_on(edge);
            if let Some(panel) = model.panel_mut(edge) {
                panel.actions = descriptors;
            }
        }
        return None;
    }

    let active = model.active_edge();
    let before = active.map(|edge| {
        model
            .panel(edge)
            .map(|panel| panel.actions.iter().map(|a| a.key.clone()).collect::<Vec<_>>())
            .unwrap_or_else(|| model.actions_on(edge).into_iter().map(|a| a.key).collect())
    });

    model.actions = actions;
    tracing::debug!(count = model.actions.len(), "action set replaced");

    for edge in Edge::ALL {
        if !model.has_actions(edge) {
            *model.mounting.get_mut(edge) = None;
            if matches!(model.pending_open, Some((pending, _)) if pending == edge) {
                model.pending_open = None;
            }
        }
    }

    let (Some(edge), Some(before)) = (active, before) else {
        return None;
    };
    let descriptors = model.actions_on(edge);
    let after: Vec<_> = descriptors.iter().map(|a| a.key.clone()).collect();
    if after == before {
        if let Some(panel) = model.panel_mut(edge) {
            panel.actions = descriptors;
        }
        return None;
    }

    let relayout = after.len() >= before.len()
        && matches!(model.phase, Phase::Open | Phase::Dragging)
        && model.panel(edge).is_some();
    if !relayout {
        tracing::debug!(?edge, before = before.len(), after = after.len(), "active edge shrank, closing");
        let transition = model.config.default_transition();
        return Cmd::batch(close(model, transition));
    }

    // Remeasure; an open row settles to the new open width once mounted
    let generation = model.next_generation();
    *model.mounting.get_mut(edge) = Some(generation);
    tracing::debug!(?edge, generation, after = after.len(), "active edge changed, remounting");
    Some(Cmd::MountPanel { edge, generation })
}

/// Move an open row to its panel's current open width
pub fn resettle_open(model: &mut SwipeModel, edge: Edge) -> Vec<Cmd> {
    let Some(target) = open_offset(model, edge) else {
        return Vec::new();
    };
    if target == model.offset {
        return Vec::new();
    }
    let transition = model.config.default_transition();
    let cmds = apply_offset(
        model,
        OffsetRequest::new(target, transition).then(AfterOffset::Settle { open: true }),
    );
    model.phase = Phase::Settling { open: true };
    cmds
}

fn set_bounds(model: &mut SwipeModel, bounds: RowBounds) -> Option<Cmd> {
    if bounds == model.bounds {
        return None;
    }
    model.apply_bounds(bounds);
    match model.phase {
        Phase::Closed | Phase::Open => {
            let offset = model.offset;
            Cmd::batch(apply_offset(
                model,
                OffsetRequest::new(offset, Transition::Immediate),
            ))
        }
        _ => None,
    }
}
