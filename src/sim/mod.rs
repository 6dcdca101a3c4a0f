//! Deterministic collision and stepping module
//!
//! Everything that moves entities lives here. This module must stay pure and
//! deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity slot)
//! - No platform dependencies

pub mod arena;
pub mod collision;
pub mod epa;
pub mod gjk;
pub mod scene;
pub mod shape;
pub mod state;
pub mod step;
pub mod support;
pub mod transform;

pub use arena::{ScratchArena, Scope};
pub use collision::{CollisionInfo, gjk_intersect, gjk_intersect_point, gjk_intersect_with_info};
pub use scene::{DemoScene, build_demo_scene};
pub use shape::{Rect, Shape};
pub use state::{Entity, EntityFlags, EntityId, Simulation, World};
pub use step::{kinematic_displacement, physics_step};
pub use transform::Transform;
