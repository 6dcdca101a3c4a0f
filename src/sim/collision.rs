//! Narrow-phase entry points
//!
//! Boolean and penetration-reporting GJK queries over transformed, swept
//! shapes. Numerical trouble never escapes as a failure: a query that does not
//! converge is logged and answered as "no intersection".

use glam::Vec2;

use super::arena::ScratchArena;
use super::epa;
use super::gjk::{self, GjkOutcome};
use super::shape::Shape;
use super::transform::Transform;
use crate::error::PhysicsError;

/// Penetration of shape A into shape B at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionInfo {
    /// Unit direction from B toward A; moving A by `normal * depth` separates them
    pub normal: Vec2,
    /// Overlap along `normal`
    pub depth: f32,
}

impl CollisionInfo {
    /// Build from the direction A penetrates into B
    pub(crate) fn from_penetration(penetration: Vec2, depth: f32) -> Self {
        Self {
            normal: -penetration,
            depth,
        }
    }

    /// Direction A is pushing into B
    #[inline]
    pub fn penetration_direction(&self) -> Vec2 {
        -self.normal
    }

    /// Translation that moves A out of B
    #[inline]
    pub fn separation(&self) -> Vec2 {
        self.normal * self.depth
    }
}

/// Enclosing simplex of a GJK run, if any. Non-convergence is logged and
/// answered as separated.
fn enclosing_simplex(outcome: Result<GjkOutcome, PhysicsError>) -> Option<[Vec2; 3]> {
    match outcome {
        Ok(GjkOutcome::Enclosed(simplex)) => Some(simplex),
        Ok(GjkOutcome::Separated) => None,
        Err(err) => {
            log::warn!("{err}; treating pair as separated");
            None
        }
    }
}

/// Do the two swept shapes overlap at any point during their sweeps?
pub fn gjk_intersect(ta: &Transform, sa: &Shape, tb: &Transform, sb: &Shape) -> bool {
    enclosing_simplex(gjk::run(ta, sa, tb, sb)).is_some()
}

/// Overlap test that also reports the minimum translation vector.
///
/// EPA's polytope is allocated from `scratch` and released before returning.
pub fn gjk_intersect_with_info(
    ta: &Transform,
    sa: &Shape,
    tb: &Transform,
    sb: &Shape,
    scratch: &mut ScratchArena,
) -> Option<CollisionInfo> {
    let simplex = enclosing_simplex(gjk::run(ta, sa, tb, sb))?;
    Some(epa::penetration(ta, sa, tb, sb, simplex, scratch))
}

/// Is `point` strictly inside the placed shape? Used for mouse picking.
pub fn gjk_intersect_point(transform: &Transform, shape: &Shape, point: Vec2) -> bool {
    gjk_intersect(transform, shape, &Transform::at(point), &Shape::Point)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(min: (f32, f32), max: (f32, f32)) -> Shape {
        Shape::rectangle(Vec2::new(min.0, min.1), Vec2::new(max.0, max.1))
    }

    #[test]
    fn test_overlapping_rectangles_depth_five() {
        let t = Transform::identity();
        let a = rect((0.0, 0.0), (10.0, 10.0));
        let b = rect((5.0, 5.0), (15.0, 15.0));
        assert!(gjk_intersect(&t, &a, &t, &b));

        let mut scratch = ScratchArena::new();
        let info = gjk_intersect_with_info(&t, &a, &t, &b, &mut scratch).unwrap();
        assert!((info.depth - 5.0).abs() < 1e-3);
        // Axis-aligned, pointing from B back toward A
        let axis_aligned = info.normal.x.abs() < 1e-4 || info.normal.y.abs() < 1e-4;
        assert!(axis_aligned, "normal {:?} is not axis-aligned", info.normal);
        assert!(info.normal.x <= 1e-4 && info.normal.y <= 1e-4);
        assert!((info.normal.length() - 1.0).abs() < 1e-4);
        assert_eq!(scratch.in_use(), 0);
    }

    #[test]
    fn test_gjk_that_runs_out_of_iterations_reports_no_intersection() {
        let t = Transform::identity();
        let a = rect((0.0, 0.0), (10.0, 10.0));
        let b = rect((5.0, 5.0), (15.0, 15.0));
        assert!(enclosing_simplex(gjk::run(&t, &a, &t, &b)).is_some());
        assert!(enclosing_simplex(gjk::run_capped(&t, &a, &t, &b, 1)).is_none());
        assert!(enclosing_simplex(gjk::run_capped(&t, &a, &t, &b, 0)).is_none());
    }

    #[test]
    fn test_separated_rectangles() {
        let t = Transform::identity();
        let a = rect((0.0, 0.0), (10.0, 10.0));
        let b = rect((0.0, 10.01), (10.0, 20.0));
        assert!(!gjk_intersect(&t, &a, &t, &b));
        assert!(!gjk_intersect(&t, &b, &t, &a));
        let mut scratch = ScratchArena::new();
        assert!(gjk_intersect_with_info(&t, &a, &t, &b, &mut scratch).is_none());
    }

    #[test]
    fn test_translation_by_mtv_leaves_pair_touching() {
        let t = Transform::identity();
        let a = rect((0.0, 0.0), (10.0, 10.0));
        let b = rect((2.0, 8.0), (8.0, 20.0));
        let mut scratch = ScratchArena::new();
        let info = gjk_intersect_with_info(&t, &a, &t, &b, &mut scratch).unwrap();
        assert!((info.depth - 2.0).abs() < 1e-3);

        let moved = Transform::at(info.separation());
        match gjk_intersect_with_info(&moved, &a, &t, &b, &mut scratch) {
            None => {}
            Some(after) => assert!(after.depth.abs() < 1e-3, "residual {}", after.depth),
        }
    }

    #[test]
    fn test_symmetry() {
        let t = Transform::identity();
        let a = rect((0.0, 0.0), (10.0, 10.0));
        let b = rect((7.0, 2.0), (20.0, 8.0));
        assert_eq!(gjk_intersect(&t, &a, &t, &b), gjk_intersect(&t, &b, &t, &a));

        let mut scratch = ScratchArena::new();
        let ab = gjk_intersect_with_info(&t, &a, &t, &b, &mut scratch).unwrap();
        let ba = gjk_intersect_with_info(&t, &b, &t, &a, &mut scratch).unwrap();
        assert!((ab.normal + ba.normal).length() < 1e-4);
        assert!((ab.depth - ba.depth).abs() < 1e-3);
    }

    #[test]
    fn test_point_containment_unit_square() {
        let square = Shape::polygon(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ]);
        let t = Transform::identity();
        assert!(gjk_intersect_point(&t, &square, Vec2::new(0.5, 0.5)));
        assert!(!gjk_intersect_point(&t, &square, Vec2::new(2.0, 2.0)));
        assert!(gjk_intersect_point(&t, &square, Vec2::new(0.9, 0.1)));
        assert!(!gjk_intersect_point(&t, &square, Vec2::new(-0.1, 0.5)));
    }

    #[test]
    fn test_point_containment_rotated_scaled() {
        // A 2x2 box rotated 45° and scaled 2 reaches ~2.83 along the axes
        let shape = Shape::rect_centered(Vec2::splat(2.0));
        let t = Transform::at(Vec2::new(10.0, 0.0))
            .with_angle(std::f32::consts::FRAC_PI_4)
            .with_scale(2.0);
        assert!(gjk_intersect_point(&t, &shape, Vec2::new(12.7, 0.0)));
        assert!(!gjk_intersect_point(&t, &shape, Vec2::new(12.0, 2.0)));
    }

    #[test]
    fn test_circle_against_polygon() {
        let circle = Shape::circle(1.0);
        let tri = Shape::polygon(vec![
            Vec2::new(-5.0, 0.0),
            Vec2::new(5.0, 0.0),
            Vec2::new(0.0, -5.0),
        ]);
        let t = Transform::identity();
        let above = Transform::at(Vec2::new(0.0, 0.5));
        let mut scratch = ScratchArena::new();
        let info = gjk_intersect_with_info(&above, &circle, &t, &tri, &mut scratch).unwrap();
        assert!((info.depth - 0.5).abs() < 0.01);
        assert!((info.normal - Vec2::Y).length() < 0.05);

        let clear = Transform::at(Vec2::new(0.0, 1.5));
        assert!(!gjk_intersect(&clear, &circle, &t, &tri));
    }
}
