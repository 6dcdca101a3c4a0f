//! Expanding polytope algorithm
//!
//! Grows the GJK triangle outward along its closest edge until the edge lies
//! on the Minkowski difference boundary. That edge's normal and distance are
//! the minimum translation separating the shapes.

use glam::Vec2;

use super::arena::ScratchArena;
use super::collision::CollisionInfo;
use super::shape::Shape;
use super::support::support;
use super::transform::Transform;
use crate::consts::{EPA_MAX_ITERATIONS, EPA_TOLERANCE};

#[derive(Debug, Clone, Copy)]
struct Edge {
    /// Outward unit normal
    normal: Vec2,
    /// Distance from the origin along `normal`
    distance: f32,
    /// Index of the edge's second vertex; new points are spliced here
    insert_at: usize,
}

/// Twice the signed area of a polygon; positive for counter-clockwise
fn signed_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    (0..n)
        .map(|i| points[i].perp_dot(points[(i + 1) % n]))
        .sum()
}

fn closest_edge(polytope: &[Vec2], ccw: bool) -> Edge {
    let n = polytope.len();
    let mut best = Edge {
        normal: Vec2::ZERO,
        distance: f32::INFINITY,
        insert_at: 1,
    };
    for i in 0..n {
        let j = (i + 1) % n;
        let e = polytope[j] - polytope[i];
        let outward = if ccw {
            Vec2::new(e.y, -e.x)
        } else {
            Vec2::new(-e.y, e.x)
        };
        let normal = outward.normalize_or_zero();
        if normal == Vec2::ZERO {
            continue;
        }
        let distance = normal.dot(polytope[i]);
        if distance < best.distance {
            best = Edge {
                normal,
                distance,
                insert_at: i + 1,
            };
        }
    }
    best
}

/// Expand an enclosing GJK triangle into the penetration of `A` into `B`.
///
/// The polytope lives in a scratch scope released when this returns. If the
/// iteration cap is hit the best edge so far is used.
pub fn penetration(
    ta: &Transform,
    sa: &Shape,
    tb: &Transform,
    sb: &Shape,
    simplex: [Vec2; 3],
    scratch: &mut ScratchArena,
) -> CollisionInfo {
    penetration_capped(ta, sa, tb, sb, simplex, scratch, EPA_MAX_ITERATIONS)
}

/// [`penetration`] with an explicit expansion budget
pub(crate) fn penetration_capped(
    ta: &Transform,
    sa: &Shape,
    tb: &Transform,
    sb: &Shape,
    simplex: [Vec2; 3],
    scratch: &mut ScratchArena,
    max_iterations: usize,
) -> CollisionInfo {
    let mut polytope = scratch.scope();
    for p in simplex {
        polytope.push(p);
    }
    let ccw = signed_area(polytope.as_slice()) >= 0.0;

    let mut edge = closest_edge(polytope.as_slice(), ccw);
    for _ in 0..max_iterations {
        let p = support(ta, sa, tb, sb, edge.normal);
        let reach = p.dot(edge.normal);
        if reach - edge.distance < EPA_TOLERANCE {
            return CollisionInfo::from_penetration(edge.normal, reach);
        }
        polytope.insert(edge.insert_at, p);
        edge = closest_edge(polytope.as_slice(), ccw);
    }

    log::warn!(
        "EPA did not converge within {max_iterations} iterations ({} vertices), using best edge at depth {}",
        polytope.len(),
        edge.distance
    );
    CollisionInfo::from_penetration(edge.normal, edge.distance)
}
