//! Placement of a shape for one collision query
//!
//! Rotation is stored as a unit (cos, sin) direction rather than an angle so
//! repeated composition never drifts through trigonometry.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::shape::{Rect, Shape};
use crate::{direction_from_angle, rotate, unrotate};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// World position of the local origin
    pub offset: Vec2,
    /// Unit rotation direction (cos, sin)
    pub rotation: Vec2,
    /// Uniform scale, applied before rotation
    pub scale: f32,
    /// Translation over the current step
    pub sweep: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub const fn identity() -> Self {
        Self {
            offset: Vec2::ZERO,
            rotation: Vec2::X,
            scale: 1.0,
            sweep: Vec2::ZERO,
        }
    }

    pub fn at(offset: Vec2) -> Self {
        Self {
            offset,
            ..Self::identity()
        }
    }

    pub fn with_rotation(mut self, rotation: Vec2) -> Self {
        debug_assert!(
            (rotation.length_squared() - 1.0).abs() < 1e-3,
            "rotation must be a unit direction, got {rotation}"
        );
        self.rotation = rotation;
        self
    }

    pub fn with_angle(self, theta: f32) -> Self {
        self.with_rotation(direction_from_angle(theta))
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        debug_assert!(scale >= 0.0, "scale must be non-negative");
        self.scale = scale;
        self
    }

    pub fn with_sweep(mut self, sweep: Vec2) -> Self {
        self.sweep = sweep;
        self
    }

    /// Local point to world: scale, rotate, translate
    #[inline]
    pub fn compose(&self, point: Vec2) -> Vec2 {
        rotate(point * self.scale, self.rotation) + self.offset
    }

    /// World direction into the local frame
    #[inline]
    pub fn to_local(&self, direction: Vec2) -> Vec2 {
        unrotate(direction, self.rotation)
    }

    /// Furthest world point of `shape` along `direction`, including how far
    /// the sweep carries it this step.
    pub fn support(&self, shape: &Shape, direction: Vec2) -> Vec2 {
        let local = shape.furthest_point(self.to_local(direction));
        let point = self.compose(local);
        if self.sweep.dot(direction) > 0.0 {
            point + self.sweep
        } else {
            point
        }
    }

    /// World-space box of the swept shape
    pub fn world_bounds(&self, shape: &Shape) -> Rect {
        let max_x = self.support(shape, Vec2::X).x;
        let min_x = self.support(shape, Vec2::NEG_X).x;
        let max_y = self.support(shape, Vec2::Y).y;
        let min_y = self.support(shape, Vec2::NEG_Y).y;
        Rect {
            min: Vec2::new(min_x, min_y),
            max: Vec2::new(max_x, max_y),
        }
    }
}
