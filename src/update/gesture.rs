//! Pan gesture handling: drag tracking and the release decision

use crate::action::{ActionEvent, Edge};
use crate::commands::Cmd;
use crate::geometry::Vector;
use crate::gesture::{raw_offset, LockState};
use crate::messages::GestureMsg;
use crate::model::{AfterOffset, Phase, SwipeModel};
use crate::transition::Transition;

use super::offset::{apply_offset, close, request_mount, settle_transition, OffsetRequest};

pub fn update_gesture(model: &mut SwipeModel, msg: GestureMsg) -> Option<Cmd> {
    match msg {
        GestureMsg::Began { visual_offset } => began(model, visual_offset),
        GestureMsg::Changed {
            translation,
            velocity,
        } => changed(model, translation, velocity),
        GestureMsg::Ended { velocity } => released(model, velocity.x),
        // Position-based decision, as if the finger lifted at rest
        GestureMsg::Cancelled => released(model, 0.0),
    }
}

fn began(model: &mut SwipeModel, visual_offset: Option<f32>) -> Option<Cmd> {
    if model.phase == Phase::Expanding || model.actions.is_empty() {
        tracing::trace!(target: "gesture", phase = ?model.phase, "pan ignored");
        model.gesture.reject();
        return None;
    }

    // An interrupted settle freezes where it is; the pan continues from there
    let start = match (model.phase, visual_offset) {
        (Phase::Settling { .. }, Some(visual)) => visual,
        _ => model.offset,
    };
    model.gesture.begin(start);
    let mut cmds = vec![Cmd::StopAnimations];
    if model.config.close_others_on_open {
        cmds.push(Cmd::CloseSiblings {
            transition: model.config.default_transition(),
        });
    }
    Cmd::batch(cmds)
}

fn changed(model: &mut SwipeModel, translation: Vector, velocity: Vector) -> Option<Cmd> {
    if !model
        .gesture
        .sample(translation, velocity, &model.config.tuning)
    {
        return None;
    }
    model.phase = Phase::Dragging;

    let raw = raw_offset(
        translation.x,
        model.gesture.initial_offset,
        model.has_actions(Edge::Left),
        model.has_actions(Edge::Right),
        model.config.tuning.attenuation_exponent,
    );

    let mut cmds = Vec::new();
    if raw > 0.0 {
        cmds.extend(request_mount(model, Edge::Left));
    } else if raw < 0.0 {
        cmds.extend(request_mount(model, Edge::Right));
    }
    cmds.extend(apply_offset(
        model,
        OffsetRequest::new(raw, Transition::Immediate),
    ));
    Cmd::batch(cmds)
}

fn released(model: &mut SwipeModel, velocity: f32) -> Option<Cmd> {
    let state = model.gesture.state;
    model.gesture.end();

    let cmds = match state {
        LockState::Locked => {
            model.gesture.last_velocity = velocity;
            settle_release(model, velocity)
        }
        // Began stopped any settle in flight; resume toward the logical offset
        LockState::Pending | LockState::Rejected
            if matches!(model.phase, Phase::Settling { .. }) =>
        {
            resume(model)
        }
        _ => Vec::new(),
    };

    if let Some(config) = model.pending_config.take() {
        tracing::debug!("applying config deferred during drag");
        model.apply_config(config);
    }
    Cmd::batch(cmds)
}

fn settle_release(model: &mut SwipeModel, velocity: f32) -> Vec<Cmd> {
    let threshold = model.config.tuning.release_velocity_threshold;
    let offset = model.offset;
    let initial = model.gesture.initial_offset;
    let gap = model.config.edge_gap;

    let candidate = [Edge::Left, Edge::Right]
        .into_iter()
        .find_map(|edge| model.active_panel(edge).map(|panel| (edge, panel)));

    let Some((edge, panel)) = candidate else {
        let transition = settle_transition(model, velocity, 0.0);
        return close(model, transition);
    };

    let open_offset = panel.preferred_width() + gap;
    let expanded = panel.expanded;
    let expanded_action = panel.actions.first().map(|action| action.key.clone());

    // Work in the edge's own direction: positive opens it
    let directed = offset * edge.sign();
    let reveal = if velocity.abs() < threshold {
        (initial == 0.0 && directed > 0.0) || directed > open_offset
    } else {
        velocity * edge.sign() > 0.0
    };

    tracing::debug!(
        target: "gesture",
        ?edge,
        offset,
        velocity,
        reveal,
        expanded,
        "released"
    );

    if reveal && expanded {
        if let Some(action) = expanded_action {
            let ticket = model.issue_ticket(action.clone());
            model.phase = Phase::AwaitingOutcome;
            return vec![Cmd::InvokeHandler {
                action,
                event: ActionEvent::Expanded,
                ticket,
            }];
        }
    }

    let target = if reveal { edge.sign() * open_offset } else { 0.0 };
    let transition = settle_transition(model, velocity, target);
    let cmds = apply_offset(
        model,
        OffsetRequest::new(target, transition).then(AfterOffset::Settle { open: reveal }),
    );
    model.phase = Phase::Settling { open: reveal };
    cmds
}

fn resume(model: &mut SwipeModel) -> Vec<Cmd> {
    let transition = model.config.default_transition();
    let offset = model.offset;
    if offset == 0.0 {
        return close(model, transition);
    }
    let cmds = apply_offset(
        model,
        OffsetRequest::new(offset, transition).then(AfterOffset::Settle { open: true }),
    );
    model.phase = Phase::Settling { open: true };
    cmds
}
