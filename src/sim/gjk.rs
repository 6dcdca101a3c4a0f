//! GJK intersection test over swept shapes
//!
//! Builds a simplex of up to three Minkowski-difference support points and
//! evolves it toward the origin. In 2D the origin can only be enclosed by a
//! triangle, so an enclosing simplex is always a valid EPA seed.

use glam::Vec2;

use super::shape::Shape;
use super::support::support;
use super::transform::Transform;
use crate::consts::{GJK_MAX_ITERATIONS, UP};
use crate::error::PhysicsError;
use crate::triple_product;

/// sin² of the angle below which the origin counts as lying on a segment's line
const ON_LINE_EPSILON: f32 = f32::EPSILON;

/// How a GJK run ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GjkOutcome {
    /// A support query failed to pass the origin
    Separated,
    /// The triangle encloses the origin (newest point first)
    Enclosed([Vec2; 3]),
}

/// Working simplex, newest point first
#[derive(Debug, Clone, Copy)]
struct Simplex {
    points: [Vec2; 3],
    len: usize,
}

impl Simplex {
    fn new(first: Vec2) -> Self {
        Self {
            points: [first, Vec2::ZERO, Vec2::ZERO],
            len: 1,
        }
    }

    fn push(&mut self, p: Vec2) {
        debug_assert!(self.len < 3, "simplex overflow");
        self.points.copy_within(0..self.len, 1);
        self.points[0] = p;
        self.len += 1;
    }

    fn set(&mut self, points: &[Vec2]) {
        self.points[..points.len()].copy_from_slice(points);
        self.len = points.len();
    }

    /// Shrink toward the origin and update the search direction.
    /// Returns true once the origin is enclosed.
    fn evolve(&mut self, direction: &mut Vec2) -> bool {
        match self.len {
            2 => {
                let [a, b, _] = self.points;
                let ab = b - a;
                let ao = -a;
                if ab.dot(ao) > 0.0 {
                    *direction = edge_normal_toward(ab, ao);
                } else {
                    self.set(&[a]);
                    *direction = ao;
                }
                false
            }
            3 => {
                let [a, b, c] = self.points;
                let ab = b - a;
                let ac = c - a;
                let ao = -a;
                // Edge normals pointing away from the opposite vertex
                let ab_perp = triple_product(ac, ab, ab);
                let ac_perp = triple_product(ab, ac, ac);
                if ab_perp.dot(ao) > 0.0 {
                    self.set(&[a, b]);
                    *direction = ab_perp;
                    false
                } else if ac_perp.dot(ao) > 0.0 {
                    self.set(&[a, c]);
                    *direction = ac_perp;
                    false
                } else {
                    true
                }
            }
            _ => false,
        }
    }
}

/// Perpendicular of `ab` on the origin's side. Falls back to the raw
/// perpendicular when the origin sits on the segment's line.
fn edge_normal_toward(ab: Vec2, ao: Vec2) -> Vec2 {
    let normal = triple_product(ab, ao, ab);
    let ab_sq = ab.length_squared();
    if normal.length_squared() > ON_LINE_EPSILON * ab_sq * ab_sq * ao.length_squared() {
        return normal;
    }
    let perp = ab.perp();
    if perp.dot(ao) < 0.0 { -perp } else { perp }
}

/// Run GJK on `A - B`.
///
/// Touching shapes (origin on the boundary) report `Separated`. Hitting the
/// iteration cap is an error the public wrappers recover from.
pub fn run(
    ta: &Transform,
    sa: &Shape,
    tb: &Transform,
    sb: &Shape,
) -> Result<GjkOutcome, PhysicsError> {
    run_capped(ta, sa, tb, sb, GJK_MAX_ITERATIONS)
}

/// [`run`] with an explicit support-query budget
pub(crate) fn run_capped(
    ta: &Transform,
    sa: &Shape,
    tb: &Transform,
    sb: &Shape,
    max_iterations: usize,
) -> Result<GjkOutcome, PhysicsError> {
    let first = support(ta, sa, tb, sb, UP);
    let mut simplex = Simplex::new(first);
    let mut direction = -first;

    for _ in 0..max_iterations {
        let p = support(ta, sa, tb, sb, direction);
        if p.dot(direction) <= 0.0 {
            return Ok(GjkOutcome::Separated);
        }
        simplex.push(p);
        if simplex.evolve(&mut direction) {
            debug_assert_eq!(simplex.len, 3, "GJK enclosure needs a full triangle");
            return Ok(GjkOutcome::Enclosed(simplex.points));
        }
    }

    Err(PhysicsError::NoConvergence {
        algorithm: "GJK",
        iterations: max_iterations,
    })
}
