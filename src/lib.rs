//! Sweep2D - swept 2D collision core
//!
//! Core modules:
//! - `sim`: Shapes, transforms, GJK/EPA and the per-frame physics stepper
//! - `settings`: Data-driven stepper tuning (JSON)
//! - `error`: Error type shared by the fallible entry points

pub mod error;
pub mod settings;
pub mod sim;

pub use error::PhysicsError;
pub use settings::Settings;
pub use sim::{
    CollisionInfo, Entity, EntityFlags, EntityId, ScratchArena, Shape, Simulation, Transform,
    World, gjk_intersect, gjk_intersect_point, gjk_intersect_with_info, physics_step,
};

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// World up axis; ground contacts are measured against it
    pub const UP: Vec2 = Vec2::Y;

    /// Default gravity (units/s²)
    pub const GRAVITY: Vec2 = Vec2::new(0.0, -30.0);
    /// Time an entity stays grounded after losing contact (seconds)
    pub const GROUND_GRACE: f32 = 0.1;
    /// cos(45°): penetration directions steeper than this count as ground
    pub const GROUND_SLOPE: f32 = 0.707;
    /// Collision sub-steps per entity per frame
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Remaining step fraction below which sub-stepping stops
    pub const MIN_REMAINING_TIME: f32 = 1e-4;

    /// GJK gives up after this many support queries
    pub const GJK_MAX_ITERATIONS: usize = 64;
    /// EPA gives up after this many polytope expansions
    pub const EPA_MAX_ITERATIONS: usize = 64;
    /// EPA stops once a new support point improves an edge by less than this
    pub const EPA_TOLERANCE: f32 = 1e-3;
}

/// Vector triple product `(a × b) × c` restricted to the plane: `b(a·c) - a(b·c)`
#[inline]
pub fn triple_product(a: Vec2, b: Vec2, c: Vec2) -> Vec2 {
    b * a.dot(c) - a * b.dot(c)
}

/// Unit direction for an angle in radians (cos, sin)
#[inline]
pub fn direction_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Rotate `v` by the unit direction `rotation`
#[inline]
pub fn rotate(v: Vec2, rotation: Vec2) -> Vec2 {
    Vec2::new(
        v.x * rotation.x - v.y * rotation.y,
        v.x * rotation.y + v.y * rotation.x,
    )
}

/// Rotate `v` by the inverse of the unit direction `rotation`
#[inline]
pub fn unrotate(v: Vec2, rotation: Vec2) -> Vec2 {
    Vec2::new(
        v.x * rotation.x + v.y * rotation.y,
        -v.x * rotation.y + v.y * rotation.x,
    )
}
