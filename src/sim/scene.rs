//! Demo level
//!
//! A small platforming room: floor, two walls, a ledge, a moving platform,
//! the player, and a seeded scatter of crates. The same seed always builds
//! the same world.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::shape::Shape;
use super::state::{Entity, EntityId, Simulation};
use crate::settings::Settings;

pub const ROOM_WIDTH: f32 = 40.0;
pub const ROOM_HEIGHT: f32 = 20.0;
const WALL_THICKNESS: f32 = 1.0;
const FLOOR_FRICTION: f32 = 8.0;
const CRATE_COUNT: usize = 6;
const CRATE_SPACING: f32 = 2.5;
/// Platform patrol range along x
const PLATFORM_MIN_X: f32 = -12.0;
const PLATFORM_MAX_X: f32 = 4.0;

/// Handles to the interesting entities of the demo level
#[derive(Debug, Clone)]
pub struct DemoScene {
    pub sim: Simulation,
    pub player: EntityId,
    pub platform: EntityId,
    pub crates: Vec<EntityId>,
}

/// Build the demo level with crates scattered from `seed`
pub fn build_demo_scene(settings: Settings, seed: u64) -> DemoScene {
    let mut sim = Simulation::new(settings);
    let world = &mut sim.world;
    let half_w = ROOM_WIDTH * 0.5;

    world.spawn(
        Entity::obstacle(
            Shape::rect_centered(Vec2::new(ROOM_WIDTH + 2.0 * WALL_THICKNESS, WALL_THICKNESS)),
            Vec2::new(0.0, -WALL_THICKNESS * 0.5),
        )
        .with_friction(FLOOR_FRICTION),
    );
    for side in [-1.0, 1.0] {
        world.spawn(Entity::obstacle(
            Shape::rect_centered(Vec2::new(WALL_THICKNESS, ROOM_HEIGHT)),
            Vec2::new(side * (half_w + WALL_THICKNESS * 0.5), ROOM_HEIGHT * 0.5),
        ));
    }
    // Sloped ledge on the right
    world.spawn(Entity::obstacle(
        Shape::polygon(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(6.0, 0.0),
            Vec2::new(6.0, 3.0),
        ]),
        Vec2::new(half_w - 6.0, 0.0),
    ));

    let platform = world.spawn(
        Entity::obstacle(Shape::rect_centered(Vec2::new(5.0, 0.5)), Vec2::new(-8.0, 6.0))
            .with_velocity(Vec2::new(1.5, 0.0))
            .with_friction(FLOOR_FRICTION),
    );

    let player = world.spawn(Entity::body(
        Shape::rectangle(Vec2::new(-0.4, 0.0), Vec2::new(0.4, 1.8)),
        Vec2::new(-8.0, 7.0),
    ));

    let mut rng = Pcg32::seed_from_u64(seed);
    // One column per crate so none start out overlapping
    let crates = (0..CRATE_COUNT)
        .map(|i| {
            let x = -2.0 + i as f32 * CRATE_SPACING + rng.random_range(-0.2..0.2);
            let y = rng.random_range(2.0..ROOM_HEIGHT - 4.0);
            let size = rng.random_range(0.6..1.4);
            let shape = if rng.random_bool(0.3) {
                Shape::regular_polygon(rng.random_range(5..9), size * 0.5)
            } else {
                Shape::rect_centered(Vec2::splat(size))
            };
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            world.spawn(Entity::body(shape, Vec2::new(x, y)).with_angle(angle))
        })
        .collect();

    log::info!(
        "Built demo scene (seed {seed}): {} entities, {CRATE_COUNT} crates",
        sim.world.len()
    );

    DemoScene {
        sim,
        player,
        platform,
        crates,
    }
}

impl DemoScene {
    /// Turn the platform around at the ends of its patrol, then step
    pub fn step(&mut self, dt: f32) {
        if let Some(platform) = self.sim.world.get_mut(self.platform) {
            let x = platform.position.x;
            if (x <= PLATFORM_MIN_X && platform.velocity.x < 0.0)
                || (x >= PLATFORM_MAX_X && platform.velocity.x > 0.0)
            {
                platform.velocity.x = -platform.velocity.x;
                log::debug!("Platform reversed at x = {x:.2}");
            }
        }
        self.sim.step(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    #[test]
    fn test_scene_layout() {
        let scene = build_demo_scene(Settings::default(), 7);
        assert_eq!(scene.crates.len(), CRATE_COUNT);
        assert_eq!(scene.sim.world.len(), 6 + CRATE_COUNT);
        assert!(scene.sim.world.get(scene.player).unwrap().flags.physical);
        assert!(!scene.sim.world.get(scene.platform).unwrap().flags.physical);
    }

    #[test]
    fn test_determinism() {
        // Two scenes with the same seed should produce identical results
        let mut a = build_demo_scene(Settings::default(), 99999);
        let mut b = build_demo_scene(Settings::default(), 99999);
        for _ in 0..180 {
            a.step(SIM_DT);
            b.step(SIM_DT);
        }
        let left: Vec<_> = a.sim.world.iter().map(|(_, e)| e.clone()).collect();
        let right: Vec<_> = b.sim.world.iter().map(|(_, e)| e.clone()).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_different_seeds_scatter_differently() {
        let a = build_demo_scene(Settings::default(), 1);
        let b = build_demo_scene(Settings::default(), 2);
        let pa: Vec<_> = a.crates.iter().map(|&id| a.sim.world.get(id).unwrap().position).collect();
        let pb: Vec<_> = b.crates.iter().map(|&id| b.sim.world.get(id).unwrap().position).collect();
        assert_ne!(pa, pb);
    }

    #[test]
    fn test_player_rides_platform() {
        let mut scene = build_demo_scene(Settings::default(), 3);
        for _ in 0..120 {
            scene.step(SIM_DT);
        }
        let player = scene.sim.world.get(scene.player).unwrap();
        assert!(player.on_ground);
        assert_eq!(player.support, Some(scene.platform));
        assert!((player.position.y - 6.25).abs() < 0.01, "y = {}", player.position.y);
        assert!(player.position.x > -8.0);
    }

    #[test]
    fn test_platform_patrols() {
        let mut scene = build_demo_scene(Settings::default(), 3);
        // Long enough to reach the right end of the patrol and turn around
        for _ in 0..(60 * 10) {
            scene.step(SIM_DT);
        }
        let platform = scene.sim.world.get(scene.platform).unwrap();
        assert!(platform.velocity.x < 0.0);
        assert!(platform.position.x <= PLATFORM_MAX_X + 0.1);
    }
}
