//! Reveal offset application
//!
//! Every change of the reveal offset goes through [`apply_offset`]: it
//! records the new logical offset, positions the content (with rubber-band
//! resistance), lays out both panels, and tracks full-swipe arming.

use std::time::Duration;

use crate::action::Edge;
use crate::commands::{Cmd, GeometryUpdate, ViewSlot};
use crate::geometry::Rect;
use crate::layout::PanelMetrics;
use crate::messages::TransitionToken;
use crate::model::{AfterOffset, ExpandedView, Panel, Phase, SwipeModel};
use crate::rubber_band::resisted_offset;
use crate::transition::{initial_animation_velocity, Transition, TransitionCurve};

/// Fade used when an alert is dismissed by a drag
const ALERT_FADE: Duration = Duration::from_millis(150);

/// A requested offset write
#[derive(Debug)]
pub struct OffsetRequest {
    pub offset: f32,
    pub transition: Transition,
    /// Skip rubber-band resistance
    pub force: bool,
    /// Action the expanded view stands for, if it appears (defaults to the edge-most)
    pub anchor: Option<usize>,
    pub after: Option<AfterOffset>,
}

impl OffsetRequest {
    pub fn new(offset: f32, transition: Transition) -> Self {
        Self {
            offset,
            transition,
            force: false,
            anchor: None,
            after: None,
        }
    }

    pub fn forced(mut self, anchor: usize) -> Self {
        self.force = true;
        self.anchor = Some(anchor);
        self
    }

    pub fn then(mut self, after: AfterOffset) -> Self {
        self.after = Some(after);
        self
    }
}

/// Spring settle from the current offset to `target` carrying `velocity`
pub fn settle_transition(model: &SwipeModel, velocity: f32, target: f32) -> Transition {
    let relative = initial_animation_velocity(
        velocity,
        model.offset,
        target,
        model.config.tuning.max_spring_velocity,
    );
    Transition::animated(
        model.config.transition_duration(),
        TransitionCurve::release_spring(relative),
    )
}

/// Open offset for `edge`: the panel's preferred width plus the edge gap
pub fn open_offset(model: &SwipeModel, edge: Edge) -> Option<f32> {
    let panel = model.panel(edge)?;
    Some(edge.sign() * (panel.preferred_width() + model.config.edge_gap))
}

/// Request a panel for `edge` unless one exists or is on its way
pub fn request_mount(model: &mut SwipeModel, edge: Edge) -> Option<Cmd> {
    if !model.has_actions(edge) || model.panel(edge).is_some() || model.mounting.get(edge).is_some()
    {
        return None;
    }
    let generation = model.next_generation();
    *model.mounting.get_mut(edge) = Some(generation);
    tracing::debug!(target: "panel", ?edge, generation, "requesting panel");
    Some(Cmd::MountPanel { edge, generation })
}

/// Fade out the alert on `edge`, if one is showing
pub fn dismiss_alert(model: &mut SwipeModel, edge: Edge, transition: Transition) -> Option<Cmd> {
    let panel = model.panel_mut(edge)?;
    let index = panel.alert.take()?;
    tracing::debug!(target: "panel", ?edge, index, "dismissing alert");
    let fade = if transition.is_animated() {
        transition
    } else {
        Transition::animated(ALERT_FADE, TransitionCurve::EaseInOut)
    };
    Some(Cmd::geometry(
        vec![GeometryUpdate::opacity(ViewSlot::Alert(edge), 0.0)],
        fade,
        Some(TransitionToken::AlertDismissed {
            edge,
            generation: panel.generation,
        }),
    ))
}

/// Close the row, settling to zero
pub fn close(model: &mut SwipeModel, transition: Transition) -> Vec<Cmd> {
    model.pending_open = None;
    if model.phase == Phase::Dragging {
        model.gesture.reject();
    }
    let cmds = apply_offset(
        model,
        OffsetRequest::new(0.0, transition).then(AfterOffset::Settle { open: false }),
    );
    model.phase = Phase::Settling { open: false };
    cmds
}

/// Container frame of a panel for a content position
fn container_frame(edge: Edge, content_x: f32, gap: f32, row_width: f32, height: f32) -> Rect {
    match edge {
        Edge::Left => Rect::new(0.0, 0.0, (content_x - gap).max(0.0), height),
        Edge::Right => {
            let width = (-content_x - gap).max(0.0);
            Rect::new(row_width - width, 0.0, width, height)
        }
    }
}

fn resisted_content_x(model: &SwipeModel, offset: f32, force: bool) -> f32 {
    if force || !model.config.rubber_band_enabled {
        return offset;
    }
    let Some(edge) = Edge::from_offset(offset) else {
        return offset;
    };
    match model.active_panel(edge) {
        Some(panel) => {
            let threshold = panel.preferred_width()
                + model.config.expanded_trigger_offset(panel.metrics.item_count());
            resisted_offset(offset, threshold, model.config.rubber_band_factor)
        }
        None => offset,
    }
}

/// Write a new reveal offset and lay everything out for it
pub fn apply_offset(model: &mut SwipeModel, request: OffsetRequest) -> Vec<Cmd> {
    let OffsetRequest {
        offset,
        transition,
        force,
        anchor,
        after,
    } = request;
    let mut cmds = Vec::new();

    for edge in Edge::ALL {
        cmds.extend(dismiss_alert(model, edge, transition));
    }

    model.offset = offset;
    model.offset_seq += 1;
    let seq = model.offset_seq;

    if let Some((_, AfterOffset::ExpandOutcome(Some(callback)))) = model.after_offset.take() {
        tracing::debug!("expand outcome superseded, running its callback now");
        cmds.push(Cmd::RunCallback(callback));
    }
    model.after_offset = after.map(|after| (seq, after));

    for edge in Edge::ALL {
        if let Some(panel) = model.panel_mut(edge) {
            if edge.is_opened_by(offset) {
                panel.retired_at = None;
            } else {
                panel.retired_at = Some(seq);
            }
        }
    }

    let content_x = resisted_content_x(model, offset, force);
    let bounds = model.bounds;
    let mut main = vec![GeometryUpdate::frame(
        ViewSlot::Content,
        Rect::new(content_x, 0.0, bounds.width, bounds.height),
    )];
    let mut trailing = Vec::new();

    for edge in Edge::ALL {
        let default_transition = model.config.default_transition();
        let feedback = model.config.feedback_enabled;
        let trigger = model
            .panel(edge)
            .map(|panel| model.config.expanded_trigger_offset(panel.metrics.item_count()))
            .unwrap_or(0.0);
        let allows_full_swipe = model.config.allows_full_swipe;
        let gap = model.config.edge_gap;

        let Some(panel) = model.panel_mut(edge) else {
            continue;
        };

        let container = container_frame(edge, content_x, gap, bounds.width, bounds.height);
        let panel_offset = container.width;
        let previous_frames = std::mem::replace(&mut panel.frames, panel.metrics.layout(panel_offset));
        panel.container = container;
        main.push(GeometryUpdate::frame(ViewSlot::Panel(edge), container));

        let now = panel.is_active()
            && allows_full_swipe
            && panel.metrics.is_past_expansion(panel_offset, trigger);
        let changed = now != panel.expanded;
        panel.expanded = now;
        if changed {
            tracing::debug!(target: "panel", ?edge, expanded = now, "full swipe arming changed");
        }
        if changed && now {
            if panel.expanded_view.is_none() {
                let index = anchor.unwrap_or(0).min(panel.actions.len().saturating_sub(1));
                let start = previous_frames.get(index).copied().unwrap_or(Rect::ZERO);
                trailing.extend(show_expanded_view(panel, index, start, default_transition));
            }
            // Rising edge during a drag only
            if !transition.is_animated() && feedback {
                trailing.push(Cmd::Haptic);
            }
        }

        let expanded_transition = if changed && !transition.is_animated() {
            default_transition
        } else {
            transition
        };

        let promoted = panel
            .expanded_view
            .filter(|view| !view.dedicated)
            .map(|view| view.index);
        let items_transition = if panel.expanded_view.is_some() {
            expanded_transition
        } else {
            transition
        };
        let items: Vec<GeometryUpdate> = panel
            .frames
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != promoted)
            .map(|(index, frame)| GeometryUpdate::frame(ViewSlot::Item { edge, index }, *frame))
            .collect();
        if items_transition == transition {
            main.extend(items);
        } else if !items.is_empty() {
            trailing.push(Cmd::geometry(items, items_transition, None));
        }

        if let Some(view) = panel.expanded_view {
            let frame = if panel.expanded {
                panel.metrics.expanded_frame(panel_offset)
            } else {
                panel.frames.get(view.index).copied().unwrap_or(Rect::ZERO)
            };
            let slot = if view.dedicated {
                ViewSlot::Expanded(edge)
            } else {
                ViewSlot::Item {
                    edge,
                    index: view.index,
                }
            };
            let token = (changed && !panel.expanded).then_some(TransitionToken::ExpandedCollapsed {
                edge,
                generation: panel.generation,
            });
            trailing.push(Cmd::geometry(
                vec![GeometryUpdate::frame(slot, frame)],
                expanded_transition,
                token,
            ));
        }
    }

    cmds.push(Cmd::geometry(
        main,
        transition,
        Some(TransitionToken::OffsetApplied { seq }),
    ));
    cmds.extend(trailing);
    cmds
}

/// Put the expanded view for `index` on screen at `start`
fn show_expanded_view(panel: &mut Panel, index: usize, start: Rect, fade: Transition) -> Vec<Cmd> {
    let edge = panel.edge();
    let Some(action) = panel.actions.get(index) else {
        return Vec::new();
    };
    let mut cmds = Vec::new();
    let dedicated = action.has_expanded_content;

    if dedicated {
        let slot = ViewSlot::Expanded(edge);
        let fades = action.fades_expanded_content;
        cmds.push(Cmd::MountExpanded {
            edge,
            action: action.key.clone(),
        });
        cmds.push(Cmd::geometry(
            vec![
                GeometryUpdate::frame(slot, start),
                GeometryUpdate::opacity(slot, if fades { 0.0 } else { 1.0 }),
            ],
            Transition::Immediate,
            None,
        ));
        if fades {
            cmds.push(Cmd::geometry(
                vec![GeometryUpdate::opacity(slot, 1.0)],
                fade,
                None,
            ));
        }
    } else {
        cmds.push(Cmd::RaiseItem { edge, index });
    }

    panel.expanded_view = Some(ExpandedView { index, dedicated });
    cmds
}

/// Build a panel for freshly measured widths
pub fn build_panel(model: &SwipeModel, edge: Edge, generation: u64, widths: Vec<f32>) -> Panel {
    let metrics = PanelMetrics {
        edge,
        widths,
        item_spacing: model.config.item_spacing,
        side_inset: model.bounds.side_inset(edge),
        effect: model.config.layout_effect,
        height: model.bounds.height,
    };
    Panel::new(generation, metrics, model.actions_on(edge))
}
