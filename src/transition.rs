//! Transitions and timing curves
//!
//! A [`Transition`] describes how a geometry change is applied: immediately,
//! or animated over a duration along a [`TransitionCurve`]. Drag-time writes
//! are always immediate; release-time settles are always animated.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Elapsed-time product at which a spring is considered settled.
///
/// For a critically damped spring at rest, `(1 + x)·e^(-x)` drops below 0.1%
/// of the travel at x ≈ 9.2.
const SPRING_SETTLE_PRODUCT: f32 = 9.2;

/// How a geometry change is applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    Immediate,
    Animated {
        duration: Duration,
        curve: TransitionCurve,
    },
}

impl Transition {
    pub fn animated(duration: Duration, curve: TransitionCurve) -> Self {
        Transition::Animated { duration, curve }
    }

    pub fn is_animated(&self) -> bool {
        matches!(self, Transition::Animated { .. })
    }

    pub fn duration(&self) -> Duration {
        match self {
            Transition::Immediate => Duration::ZERO,
            Transition::Animated { duration, .. } => *duration,
        }
    }
}

/// Timing curve of an animated transition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionCurve {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Damped spring; `initial_velocity` is in units of travel per second
    Spring { damping: f32, initial_velocity: f32 },
}

impl TransitionCurve {
    /// Critically damped spring carrying a gesture's release velocity
    pub fn release_spring(initial_velocity: f32) -> Self {
        TransitionCurve::Spring {
            damping: 1.0,
            initial_velocity,
        }
    }

    /// Fraction of the travel covered after `elapsed` of a `duration`-long run.
    ///
    /// Returns exactly 1.0 once `elapsed >= duration`. Springs with damping
    /// below 1.0 may exceed 1.0 before that.
    pub fn progress(&self, elapsed: Duration, duration: Duration) -> f32 {
        if duration.is_zero() || elapsed >= duration {
            return 1.0;
        }
        let t = elapsed.as_secs_f32();
        let fraction = t / duration.as_secs_f32();
        match *self {
            TransitionCurve::Linear => fraction,
            TransitionCurve::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, fraction),
            TransitionCurve::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, fraction),
            TransitionCurve::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, fraction),
            TransitionCurve::Spring {
                damping,
                initial_velocity,
            } => {
                let omega = SPRING_SETTLE_PRODUCT / duration.as_secs_f32();
                spring_position(damping, omega, initial_velocity, t)
            }
        }
    }
}

/// Relative initial velocity for a spring settling from `current` to `target`.
///
/// The gesture velocity is expressed as a fraction of the remaining travel per
/// second, then clamped to `±max`. Zero travel yields zero.
pub fn initial_animation_velocity(velocity: f32, current: f32, target: f32, max: f32) -> f32 {
    let distance = target - current;
    if distance == 0.0 {
        return 0.0;
    }
    (velocity / distance).clamp(-max, max)
}

/// Normalized position of a damped harmonic oscillator released at 0 toward 1
fn spring_position(damping: f32, omega: f32, v0: f32, t: f32) -> f32 {
    let zeta = damping.max(0.0);
    if (zeta - 1.0).abs() < 1e-4 {
        1.0 - (-omega * t).exp() * (1.0 + (omega - v0) * t)
    } else if zeta < 1.0 {
        let omega_d = omega * (1.0 - zeta * zeta).sqrt();
        let envelope = (-zeta * omega * t).exp();
        let b = (zeta * omega - v0) / omega_d;
        1.0 - envelope * ((omega_d * t).cos() + b * (omega_d * t).sin())
    } else {
        let root = (zeta * zeta - 1.0).sqrt();
        let r1 = -omega * (zeta - root);
        let r2 = -omega * (zeta + root);
        let c2 = (-v0 - r1) / (r2 - r1);
        let c1 = 1.0 - c2;
        1.0 - (c1 * (r1 * t).exp() + c2 * (r2 * t).exp())
    }
}

/// Cubic bezier easing through (0,0), (x1,y1), (x2,y2), (1,1)
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, fraction: f32) -> f32 {
    if fraction <= 0.0 {
        return 0.0;
    }
    if fraction >= 1.0 {
        return 1.0;
    }

    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;

    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    fn sample_curve(a: f32, b: f32, c: f32, t: f32) -> f32 {
        ((a * t + b) * t + c) * t
    }

    fn sample_derivative(a: f32, b: f32, c: f32, t: f32) -> f32 {
        (3.0 * a * t + 2.0 * b) * t + c
    }

    // Newton-Raphson for the parametric t, bisection if it stalls
    let mut t = fraction;
    let mut converged = false;
    for _ in 0..8 {
        let x = sample_curve(ax, bx, cx, t) - fraction;
        if x.abs() < 1e-6 {
            converged = true;
            break;
        }
        let dx = sample_derivative(ax, bx, cx, t);
        if dx.abs() < 1e-6 {
            break;
        }
        t = (t - x / dx).clamp(0.0, 1.0);
    }

    if !converged {
        let mut t0 = 0.0;
        let mut t1 = 1.0;
        t = fraction;
        for _ in 0..16 {
            let delta = sample_curve(ax, bx, cx, t) - fraction;
            if delta.abs() < 1e-6 {
                break;
            }
            if delta > 0.0 {
                t1 = t;
            } else {
                t0 = t;
            }
            t = 0.5 * (t0 + t1);
        }
    }

    sample_curve(ay, by, cy, t)
}
