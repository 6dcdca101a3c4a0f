//! Support mapping on the Minkowski difference of two swept shapes

use glam::Vec2;

use super::shape::Shape;
use super::transform::Transform;

/// Furthest point of `A - B` along `direction`.
///
/// Both halves include their sweep, so a positive answer means the shapes can
/// reach each other somewhere during the step.
#[inline]
pub fn support(ta: &Transform, sa: &Shape, tb: &Transform, sb: &Shape, direction: Vec2) -> Vec2 {
    ta.support(sa, direction) - tb.support(sb, -direction)
}
