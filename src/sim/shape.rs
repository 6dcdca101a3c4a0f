//! Collision shapes in local space
//!
//! Shapes carry no position of their own; a [`Transform`](super::Transform)
//! places them in the world. Every variant is convex, which is all GJK needs.

use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box given by its min/max corners
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Box of the given size centered on the local origin
    pub fn from_size(size: Vec2) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: -half,
            max: half,
        }
    }

    /// Zero-size box at `p`
    pub fn point(p: Vec2) -> Self {
        Self { min: p, max: p }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Inclusive containment
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Inclusive overlap: boxes sharing only an edge still overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Grow to cover this box translated anywhere along `sweep`
    pub fn expand_by_sweep(&self, sweep: Vec2) -> Rect {
        Rect {
            min: self.min + sweep.min(Vec2::ZERO),
            max: self.max + sweep.max(Vec2::ZERO),
        }
    }

    /// Corners in scan order; support ties resolve to the earliest
    #[inline]
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }
}

/// A convex collision primitive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// A single point at the local origin
    Point,
    /// Convex polygon; winding is not assumed. The vertex buffer is shared,
    /// so cloning a shape never copies vertices.
    Polygon(Arc<[Vec2]>),
    /// Circle centered on the local origin
    Circle { radius: f32 },
    /// Axis-aligned box in local space
    Rectangle(Rect),
}

impl Shape {
    pub fn polygon(vertices: impl Into<Arc<[Vec2]>>) -> Self {
        let vertices = vertices.into();
        debug_assert!(!vertices.is_empty(), "polygon needs at least one vertex");
        Shape::Polygon(vertices)
    }

    pub fn circle(radius: f32) -> Self {
        debug_assert!(radius >= 0.0, "circle radius must be non-negative");
        Shape::Circle { radius }
    }

    pub fn rectangle(min: Vec2, max: Vec2) -> Self {
        Shape::Rectangle(Rect::new(min, max))
    }

    /// Box of `size` centered on the local origin
    pub fn rect_centered(size: Vec2) -> Self {
        Shape::Rectangle(Rect::from_size(size))
    }

    /// Regular polygon with `sides` vertices on a circle of `radius`
    pub fn regular_polygon(sides: usize, radius: f32) -> Self {
        let sides = sides.max(3);
        let step = std::f32::consts::TAU / sides as f32;
        let vertices: Vec<Vec2> = (0..sides)
            .map(|i| crate::direction_from_angle(step * i as f32) * radius)
            .collect();
        Shape::polygon(vertices)
    }

    /// Furthest point along `direction` in local space.
    ///
    /// Ties go to the first vertex scanned. An empty polygon answers with the
    /// local origin, which keeps GJK running but means nothing geometrically.
    pub fn furthest_point(&self, direction: Vec2) -> Vec2 {
        match self {
            Shape::Point => Vec2::ZERO,
            Shape::Polygon(vertices) => furthest_of(vertices.iter().copied(), direction),
            Shape::Circle { radius } => direction.normalize_or_zero() * *radius,
            Shape::Rectangle(rect) => furthest_of(rect.corners(), direction),
        }
    }

    /// Local bounding box. Only used for picking and broad-phase rejects.
    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Point => Rect::default(),
            Shape::Polygon(vertices) => {
                let mut iter = vertices.iter();
                let Some(&first) = iter.next() else {
                    return Rect::default();
                };
                iter.fold(Rect::point(first), |acc, &v| acc.union(&Rect::point(v)))
            }
            Shape::Circle { radius } => Rect {
                min: Vec2::splat(-*radius),
                max: Vec2::splat(*radius),
            },
            Shape::Rectangle(rect) => *rect,
        }
    }
}

fn furthest_of(points: impl IntoIterator<Item = Vec2>, direction: Vec2) -> Vec2 {
    let mut best = Vec2::ZERO;
    let mut best_dot = f32::NEG_INFINITY;
    for p in points {
        let d = p.dot(direction);
        if d > best_dot {
            best = p;
            best_dot = d;
        }
    }
    best
}
