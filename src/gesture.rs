//! Pan tracking and the horizontal direction lock
//!
//! A pan only drives the row once it is clearly horizontal. Until then no
//! offset updates are produced; a clearly vertical pan is rejected for its
//! whole lifetime so the enclosing scroll container keeps it.

use crate::config::Tuning;
use crate::geometry::Vector;
use crate::rubber_band::attenuate;

/// Direction lock state of the current pan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockState {
    /// No pan in progress
    #[default]
    Idle,
    /// Began, direction not yet decided
    Pending,
    /// Horizontal, driving the row
    Locked,
    /// Vertical or disabled; ignored until the next `Began`
    Rejected,
}

/// Outcome of classifying one translation sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockDecision {
    Undecided,
    Horizontal,
    Vertical,
}

/// Classify a cumulative translation against the slop and dominance ratio
pub fn classify(translation: Vector, tuning: &Tuning) -> LockDecision {
    let tx = translation.x.abs();
    let ty = translation.y.abs();
    if ty > tuning.direction_slop && ty > tuning.direction_ratio * tx {
        LockDecision::Vertical
    } else if tx > tuning.direction_slop && tuning.direction_ratio * ty < tx {
        LockDecision::Horizontal
    } else {
        LockDecision::Undecided
    }
}

/// Per-pan bookkeeping
#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    pub state: LockState,
    /// Reveal offset when the pan began
    pub initial_offset: f32,
    /// Most recent horizontal velocity sample
    pub last_velocity: f32,
}

impl GestureTracker {
    pub fn begin(&mut self, offset: f32) {
        self.state = LockState::Pending;
        self.initial_offset = offset;
        self.last_velocity = 0.0;
    }

    pub fn reject(&mut self) {
        self.state = LockState::Rejected;
    }

    pub fn is_locked(&self) -> bool {
        self.state == LockState::Locked
    }

    /// Feed a translation sample; returns true when it should move the row
    pub fn sample(&mut self, translation: Vector, velocity: Vector, tuning: &Tuning) -> bool {
        match self.state {
            LockState::Idle | LockState::Rejected => return false,
            LockState::Pending => match classify(translation, tuning) {
                LockDecision::Horizontal => {
                    tracing::trace!(target: "gesture", ?translation, "direction locked");
                    self.state = LockState::Locked;
                }
                LockDecision::Vertical => {
                    tracing::trace!(target: "gesture", ?translation, "vertical pan rejected");
                    self.state = LockState::Rejected;
                    return false;
                }
                LockDecision::Undecided => return false,
            },
            LockState::Locked => {}
        }
        self.last_velocity = velocity.x;
        true
    }

    /// Close the pan; returns whether it had been driving the row
    pub fn end(&mut self) -> bool {
        let was_locked = self.is_locked();
        self.state = LockState::Idle;
        was_locked
    }
}

/// Raw reveal offset for a translation, damped toward edges without actions
pub fn raw_offset(
    translation_x: f32,
    initial_offset: f32,
    has_left: bool,
    has_right: bool,
    exponent: f32,
) -> f32 {
    let raw = translation_x + initial_offset;
    if (raw > 0.0 && !has_left) || (raw < 0.0 && !has_right) {
        attenuate(raw, exponent)
    } else {
        raw
    }
}
