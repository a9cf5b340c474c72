//! Transition scheduler
//!
//! Applies geometry writes to a [`GeometrySink`], either immediately or as
//! time-driven animations advanced by the host's frame clock. Writes are
//! grouped; a group completes once all of its animations end, reporting
//! whether they all ran to their target.
//!
//! - A write equal to the slot's current value is skipped.
//! - A new write to a property with an animation in flight interrupts it and
//!   starts from the current visual value.
//! - A group with nothing to animate completes at once with `finished: true`.

use std::collections::HashMap;
use std::time::Duration;

use crate::commands::{Geometry, GeometryKind, GeometryUpdate, ViewSlot};
use crate::geometry::Rect;
use crate::messages::TransitionToken;
use crate::transition::{Transition, TransitionCurve};

/// Receiver of concrete geometry values
pub trait GeometrySink {
    fn set_frame(&mut self, slot: ViewSlot, frame: Rect);
    fn set_opacity(&mut self, slot: ViewSlot, opacity: f32);
}

/// A finished transition group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completed {
    pub token: TransitionToken,
    pub finished: bool,
}

type PropertyKey = (ViewSlot, GeometryKind);

#[derive(Debug, Clone)]
struct Animation {
    key: PropertyKey,
    from: Geometry,
    to: Geometry,
    elapsed: Duration,
    duration: Duration,
    curve: TransitionCurve,
    group: u64,
}

#[derive(Debug, Clone)]
struct Group {
    token: Option<TransitionToken>,
    remaining: usize,
    interrupted: bool,
}

#[derive(Debug, Default)]
pub struct TransitionScheduler {
    current: HashMap<PropertyKey, Geometry>,
    animations: Vec<Animation>,
    groups: HashMap<u64, Group>,
    next_group: u64,
}

fn write<S: GeometrySink + ?Sized>(sink: &mut S, slot: ViewSlot, value: Geometry) {
    match value {
        Geometry::Frame(rect) => sink.set_frame(slot, rect),
        Geometry::Opacity(opacity) => sink.set_opacity(slot, opacity),
    }
}

impl TransitionScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.animations.is_empty()
    }

    /// Current visual frame of `slot`, if it was ever written
    pub fn frame(&self, slot: ViewSlot) -> Option<Rect> {
        match self.current.get(&(slot, GeometryKind::Frame)) {
            Some(Geometry::Frame(rect)) => Some(*rect),
            _ => None,
        }
    }

    pub fn opacity(&self, slot: ViewSlot) -> Option<f32> {
        match self.current.get(&(slot, GeometryKind::Opacity)) {
            Some(Geometry::Opacity(opacity)) => Some(*opacity),
            _ => None,
        }
    }

    /// Apply one group of writes
    pub fn apply<S: GeometrySink + ?Sized>(
        &mut self,
        updates: &[GeometryUpdate],
        transition: Transition,
        token: Option<TransitionToken>,
        sink: &mut S,
    ) -> Vec<Completed> {
        let mut completed = Vec::new();
        let group = self.next_group;
        self.next_group += 1;
        let mut pending = 0;

        for update in updates {
            let key = (update.slot, update.value.kind());
            if let Some(position) = self.animations.iter().position(|a| a.key == key) {
                let interrupted = self.animations.remove(position);
                self.release(interrupted.group, false, &mut completed);
            }

            let current = self.current.get(&key).copied();
            if current == Some(update.value) {
                continue;
            }

            match (transition, current) {
                (Transition::Animated { duration, curve }, Some(from)) if !duration.is_zero() => {
                    self.animations.push(Animation {
                        key,
                        from,
                        to: update.value,
                        elapsed: Duration::ZERO,
                        duration,
                        curve,
                        group,
                    });
                    pending += 1;
                }
                _ => {
                    write(sink, update.slot, update.value);
                    self.current.insert(key, update.value);
                }
            }
        }

        if pending == 0 {
            if let Some(token) = token {
                completed.push(Completed {
                    token,
                    finished: true,
                });
            }
        } else {
            self.groups.insert(
                group,
                Group {
                    token,
                    remaining: pending,
                    interrupted: false,
                },
            );
        }
        completed
    }

    /// Advance every animation by `dt`
    pub fn advance<S: GeometrySink + ?Sized>(&mut self, dt: Duration, sink: &mut S) -> Vec<Completed> {
        let mut completed = Vec::new();
        let mut done = Vec::new();

        for (i, animation) in self.animations.iter_mut().enumerate() {
            animation.elapsed += dt;
            let value = if animation.elapsed >= animation.duration {
                animation.to
            } else {
                let progress = animation.curve.progress(animation.elapsed, animation.duration);
                animation.from.lerp(&animation.to, progress)
            };
            write(sink, animation.key.0, value);
            self.current.insert(animation.key, value);
            if animation.elapsed >= animation.duration {
                done.push(i);
            }
        }

        for i in done.into_iter().rev() {
            let animation = self.animations.remove(i);
            self.release(animation.group, true, &mut completed);
        }
        completed
    }

    /// Stop every animation where it currently is
    pub fn stop_all(&mut self) -> Vec<Completed> {
        let mut completed = Vec::new();
        for animation in std::mem::take(&mut self.animations) {
            self.release(animation.group, false, &mut completed);
        }
        completed
    }

    /// Drop all state for a slot that left the screen
    pub fn forget(&mut self, slot: ViewSlot) -> Vec<Completed> {
        let mut completed = Vec::new();
        self.current.retain(|key, _| key.0 != slot);
        let (gone, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.animations)
            .into_iter()
            .partition(|a| a.key.0 == slot);
        self.animations = kept;
        for animation in gone {
            self.release(animation.group, false, &mut completed);
        }
        completed
    }

    fn release(&mut self, group: u64, finished: bool, completed: &mut Vec<Completed>) {
        let Some(state) = self.groups.get_mut(&group) else {
            return;
        };
        state.remaining = state.remaining.saturating_sub(1);
        state.interrupted |= !finished;
        if state.remaining == 0 {
            if let Some(state) = self.groups.remove(&group) {
                if let Some(token) = state.token {
                    completed.push(Completed {
                        token,
                        finished: !state.interrupted,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Log(Vec<(ViewSlot, Geometry)>);

    impl GeometrySink for Log {
        fn set_frame(&mut self, slot: ViewSlot, frame: Rect) {
            self.0.push((slot, Geometry::Frame(frame)));
        }
        fn set_opacity(&mut self, slot: ViewSlot, opacity: f32) {
            self.0.push((slot, Geometry::Opacity(opacity)));
        }
    }

    const TOKEN: TransitionToken = TransitionToken::OffsetApplied { seq: 1 };

    fn animated() -> Transition {
        Transition::animated(Duration::from_millis(100), TransitionCurve::Linear)
    }

    fn content(x: f32) -> GeometryUpdate {
        GeometryUpdate::frame(ViewSlot::Content, Rect::new(x, 0.0, 320.0, 44.0))
    }

    #[test]
    fn test_equal_write_completes_immediately() {
        let mut sink = Log::default();
        let mut scheduler = TransitionScheduler::new();
        scheduler.apply(&[content(0.0)], Transition::Immediate, None, &mut sink);
        let done = scheduler.apply(&[content(0.0)], animated(), Some(TOKEN), &mut sink);
        assert_eq!(
            done,
            vec![Completed {
                token: TOKEN,
                finished: true
            }]
        );
        assert_eq!(sink.0.len(), 1);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn test_animation_reaches_target() {
        let mut sink = Log::default();
        let mut scheduler = TransitionScheduler::new();
        scheduler.apply(&[content(0.0)], Transition::Immediate, None, &mut sink);
        assert!(scheduler
            .apply(&[content(-80.0)], animated(), Some(TOKEN), &mut sink)
            .is_empty());

        assert!(scheduler
            .advance(Duration::from_millis(50), &mut sink)
            .is_empty());
        assert_eq!(scheduler.frame(ViewSlot::Content).unwrap().x, -40.0);

        let done = scheduler.advance(Duration::from_millis(60), &mut sink);
        assert_eq!(done.len(), 1);
        assert!(done[0].finished);
        assert_eq!(scheduler.frame(ViewSlot::Content).unwrap().x, -80.0);
    }

    #[test]
    fn test_interrupted_animation_resumes_from_current_value() {
        let mut sink = Log::default();
        let mut scheduler = TransitionScheduler::new();
        scheduler.apply(&[content(0.0)], Transition::Immediate, None, &mut sink);
        scheduler.apply(&[content(-80.0)], animated(), Some(TOKEN), &mut sink);
        scheduler.advance(Duration::from_millis(50), &mut sink);

        let second = TransitionToken::OffsetApplied { seq: 2 };
        let done = scheduler.apply(&[content(0.0)], animated(), Some(second), &mut sink);
        assert_eq!(
            done,
            vec![Completed {
                token: TOKEN,
                finished: false
            }]
        );

        scheduler.advance(Duration::from_millis(50), &mut sink);
        assert_eq!(scheduler.frame(ViewSlot::Content).unwrap().x, -20.0);
    }

    #[test]
    fn test_stop_all_freezes_and_reports_unfinished() {
        let mut sink = Log::default();
        let mut scheduler = TransitionScheduler::new();
        scheduler.apply(&[content(0.0)], Transition::Immediate, None, &mut sink);
        scheduler.apply(&[content(-100.0)], animated(), Some(TOKEN), &mut sink);
        scheduler.advance(Duration::from_millis(30), &mut sink);

        let done = scheduler.stop_all();
        assert_eq!(done.len(), 1);
        assert!(!done[0].finished);
        assert_eq!(scheduler.frame(ViewSlot::Content).unwrap().x, -30.0);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn test_first_write_to_unknown_slot_is_immediate() {
        let mut sink = Log::default();
        let mut scheduler = TransitionScheduler::new();
        let slot = ViewSlot::Alert(crate::action::Edge::Right);
        let done = scheduler.apply(
            &[GeometryUpdate::opacity(slot, 1.0)],
            animated(),
            Some(TOKEN),
            &mut sink,
        );
        assert_eq!(done.len(), 1);
        assert_eq!(scheduler.opacity(slot), Some(1.0));
    }
}
