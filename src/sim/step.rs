//! Fixed timestep physics step
//!
//! Moves every physical entity once per frame. Each entity integrates a
//! candidate displacement, then sweeps it against every other collider with
//! GJK/EPA. The nearest hit truncates the move, the velocity loses its
//! into-surface component, and what is left of the step is retried from the
//! contact point, up to `Settings::max_substeps` times.

use glam::Vec2;

use super::arena::ScratchArena;
use super::collision::gjk_intersect_with_info;
use super::shape::Shape;
use super::state::{Entity, EntityId, World};
use super::transform::Transform;
use crate::consts::UP;
use crate::settings::Settings;

/// Relative motion into a surface below this is treated as sliding/resting
const APPROACH_EPSILON: f32 = 1e-6;

/// Entity state copied out for the duration of its resolution
#[derive(Debug, Clone)]
struct Mover {
    id: EntityId,
    position: Vec2,
    velocity: Vec2,
    shape: Shape,
    rotation: Vec2,
    scale: f32,
    collides: bool,
    on_ground: bool,
    off_ground_time: f32,
    support: Option<EntityId>,
    last_friction: f32,
}

impl Mover {
    fn transform(&self, sweep: Vec2) -> Transform {
        Transform::at(self.position)
            .with_rotation(self.rotation)
            .with_scale(self.scale)
            .with_sweep(sweep)
    }
}

/// The nearest truncating contact of one sub-step
#[derive(Debug, Clone, Copy)]
struct Hit {
    /// Fraction of the sub-step's displacement that can be travelled
    fraction: f32,
    /// Unit direction the mover pushes into the surface
    penetration: Vec2,
}

/// Unobstructed displacement of an entity over `dt`
pub fn kinematic_displacement(entity: &Entity, settings: &Settings, dt: f32) -> Vec2 {
    let accel = settings.gravity + entity.acceleration;
    accel * (0.5 * dt * dt) + entity.velocity * dt
}

/// Advance all physical entities by `dt`.
///
/// Non-physical entities with a velocity (moving platforms) are carried
/// along first and never collide; physical entities are resolved one at a
/// time in slot order, treating already-resolved entities as stationary.
pub fn physics_step(world: &mut World, scratch: &mut ScratchArena, settings: &Settings, dt: f32) {
    if dt <= 0.0 {
        return;
    }

    let ids = world.ids();
    move_kinematic(world, &ids, dt);

    let mut resolved = vec![false; ids.len()];
    for (slot, &id) in ids.iter().enumerate() {
        let Some((mut mover, mut delta)) = integrate(world, id, settings, dt) else {
            continue;
        };
        let mut remaining = 1.0_f32;

        if mover.collides {
            let mut substeps = 0;
            while substeps < settings.max_substeps && remaining > settings.min_remaining_time {
                if delta == Vec2::ZERO {
                    remaining = 0.0;
                    break;
                }
                substeps += 1;

                let hit = nearest_hit(
                    world, &ids, &resolved, &mut mover, delta, remaining, scratch, settings, dt,
                );
                let Some(hit) = hit else {
                    mover.position += delta;
                    delta = Vec2::ZERO;
                    remaining = 0.0;
                    break;
                };

                log::trace!(
                    "{:?} sub-step {substeps}: hit at {:.4} along {}",
                    mover.id,
                    hit.fraction,
                    hit.penetration
                );
                mover.position += delta * hit.fraction;
                remaining *= 1.0 - hit.fraction;

                // Inelastic: drop everything heading into the surface
                let n = hit.penetration;
                let leftover = delta * (1.0 - hit.fraction);
                delta = leftover - n * leftover.dot(n).max(0.0);
                mover.velocity -= n * mover.velocity.dot(n).max(0.0);
            }

            if remaining > settings.min_remaining_time && delta != Vec2::ZERO {
                log::debug!(
                    "{:?} hit the sub-step cap ({}) with {:.4} of the step unresolved; accepting partial move",
                    mover.id,
                    settings.max_substeps,
                    remaining
                );
            }
        } else {
            mover.position += delta;
        }

        commit(world, mover);
        resolved[slot] = true;
    }
}

/// Carry non-physical movers (platforms) along their velocity
fn move_kinematic(world: &mut World, ids: &[EntityId], dt: f32) {
    for &id in ids {
        let Some(entity) = world.get_mut(id) else {
            continue;
        };
        if entity.flags.physical {
            entity.frame_displacement = Vec2::ZERO;
            continue;
        }
        let displacement = entity.velocity * dt;
        entity.position += displacement;
        entity.frame_displacement = displacement;
    }
}

/// Copy out a physical entity, update its velocity and grounded timer, and
/// return its full-step displacement including whatever its support moved
fn integrate(world: &World, id: EntityId, settings: &Settings, dt: f32) -> Option<(Mover, Vec2)> {
    let entity = world.get(id)?;
    if !entity.flags.physical {
        return None;
    }

    let mut accel = settings.gravity + entity.acceleration;
    if entity.on_ground {
        let sliding = entity.velocity - UP * entity.velocity.dot(UP);
        accel -= sliding * entity.last_friction;
    }
    let carried = entity
        .support
        .and_then(|support| world.get(support))
        .map_or(Vec2::ZERO, |support| support.frame_displacement);
    let delta = accel * (0.5 * dt * dt) + entity.velocity * dt + carried;

    let off_ground_time = entity.off_ground_time + dt;
    let mover = Mover {
        id,
        position: entity.position,
        velocity: entity.velocity + accel * dt,
        shape: entity.shape.clone(),
        rotation: entity.unit_rotation(),
        scale: entity.scale,
        collides: entity.flags.collides,
        on_ground: entity.on_ground && off_ground_time <= settings.ground_grace,
        off_ground_time,
        support: None,
        last_friction: entity.last_friction,
    };
    Some((mover, delta))
}

/// Sweep `delta` against every other collider and return the earliest
/// truncating contact. Every contact found, truncating or not, updates the
/// mover's friction and grounding.
#[allow(clippy::too_many_arguments)]
fn nearest_hit(
    world: &World,
    ids: &[EntityId],
    resolved: &[bool],
    mover: &mut Mover,
    delta: Vec2,
    remaining: f32,
    scratch: &mut ScratchArena,
    settings: &Settings,
    dt: f32,
) -> Option<Hit> {
    let mut nearest: Option<Hit> = None;

    for (slot, &other_id) in ids.iter().enumerate() {
        if other_id == mover.id {
            continue;
        }
        let Some(other) = world.get(other_id) else {
            continue;
        };
        if !other.flags.collides {
            continue;
        }

        // An unresolved body has already covered its share of the elapsed
        // fraction; place it there and sweep only what is left
        let other_full = if other.flags.physical && !resolved[slot] {
            kinematic_displacement(other, settings, dt)
        } else {
            Vec2::ZERO
        };
        let sweep = delta - other_full * remaining;

        let self_t = mover.transform(sweep);
        let mut other_t = other.transform();
        other_t.offset += other_full * (1.0 - remaining);
        if !self_t
            .world_bounds(&mover.shape)
            .overlaps(&other_t.world_bounds(&other.shape))
        {
            continue;
        }

        let Some(info) = gjk_intersect_with_info(&self_t, &mover.shape, &other_t, &other.shape, scratch)
        else {
            continue;
        };

        let n = info.penetration_direction();
        mover.last_friction = other.friction;
        if n.dot(UP) < -settings.ground_slope {
            mover.on_ground = true;
            mover.support = Some(other_id);
            mover.off_ground_time = 0.0;
        }

        let approach = n.dot(sweep);
        if approach <= APPROACH_EPSILON {
            continue;
        }
        let fraction = (1.0 - info.depth / approach).clamp(0.0, 1.0);
        if nearest.is_none_or(|best| fraction < best.fraction) {
            nearest = Some(Hit {
                fraction,
                penetration: n,
            });
        }
    }

    nearest
}

fn commit(world: &mut World, mover: Mover) {
    let Some(entity) = world.get_mut(mover.id) else {
        return;
    };
    entity.frame_displacement = mover.position - entity.position;
    entity.position = mover.position;
    entity.velocity = mover.velocity;
    entity.on_ground = mover.on_ground;
    entity.off_ground_time = mover.off_ground_time;
    entity.support = mover.support;
    entity.last_friction = mover.last_friction;
}
