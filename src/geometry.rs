//! Geometry primitives shared by the layout engine and the transition scheduler

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in row-local points
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn min_x(&self) -> f32 {
        self.x
    }

    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }

    /// Same rectangle moved horizontally to `x`
    pub fn with_x(self, x: f32) -> Self {
        Self { x, ..self }
    }

    /// Component-wise interpolation; `fraction` is not clamped so springs may overshoot
    pub fn lerp(&self, target: &Rect, fraction: f32) -> Rect {
        Rect {
            x: lerp(self.x, target.x, fraction),
            y: lerp(self.y, target.y, fraction),
            width: lerp(self.width, target.width, fraction),
            height: lerp(self.height, target.height, fraction),
        }
    }
}

/// 2-D vector used for drag translation and velocity samples
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub x: f32,
    pub y: f32,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Pure horizontal vector
    pub fn horizontal(x: f32) -> Self {
        Self { x, y: 0.0 }
    }
}

/// Linear interpolation between `start` and `end`
#[inline]
pub fn lerp(start: f32, end: f32, fraction: f32) -> f32 {
    start + (end - start) * fraction
}
