//! Entity storage and the simulation context
//!
//! Entities live in a slot arena addressed by generation-checked handles, so
//! a handle kept across frames (an entity's support, say) resolves to `None`
//! once its target is gone instead of dangling.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arena::ScratchArena;
use super::collision::gjk_intersect_point;
use super::shape::Shape;
use super::step::physics_step;
use super::transform::Transform;
use crate::settings::Settings;

/// Generation-checked handle into a [`World`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId {
    pub index: u32,
    pub generation: u32,
}

/// Capabilities the stepper cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EntityFlags {
    /// Takes part in collision at all
    pub collides: bool,
    /// Moved by the stepper. Non-physical colliders are pure obstacles.
    pub physical: bool,
}

impl EntityFlags {
    pub const STATIC: Self = Self {
        collides: true,
        physical: false,
    };
    pub const DYNAMIC: Self = Self {
        collides: true,
        physical: true,
    };
    pub const GHOST: Self = Self {
        collides: false,
        physical: true,
    };
}

/// The slice of game entity state the physics core reads and writes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Controller/behaviour acceleration; gravity is added by the stepper
    pub acceleration: Vec2,
    pub shape: Shape,
    /// Unit rotation direction, fixed for the step
    pub rotation: Vec2,
    pub scale: f32,
    pub flags: EntityFlags,
    /// Surface friction others pick up when they touch this entity
    pub friction: f32,
    /// Friction of the surface this entity touched last
    pub last_friction: f32,
    /// Entity this one is resting on, if any
    pub support: Option<EntityId>,
    pub on_ground: bool,
    /// Seconds since the last ground contact
    pub off_ground_time: f32,
    /// How far the entity moved during the last step
    #[serde(default)]
    pub frame_displacement: Vec2,
}

impl Entity {
    pub fn new(shape: Shape, position: Vec2, flags: EntityFlags) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            shape,
            rotation: Vec2::X,
            scale: 1.0,
            flags,
            friction: 0.0,
            last_friction: 0.0,
            support: None,
            on_ground: false,
            off_ground_time: 0.0,
            frame_displacement: Vec2::ZERO,
        }
    }

    /// Immovable obstacle (floors, walls)
    pub fn obstacle(shape: Shape, position: Vec2) -> Self {
        Self::new(shape, position, EntityFlags::STATIC)
    }

    /// Entity moved and collided by the stepper
    pub fn body(shape: Shape, position: Vec2) -> Self {
        Self::new(shape, position, EntityFlags::DYNAMIC)
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_angle(mut self, theta: f32) -> Self {
        self.rotation = crate::direction_from_angle(theta);
        self
    }

    /// `rotation` as a unit direction; a zero or non-finite value means unrotated
    pub fn unit_rotation(&self) -> Vec2 {
        self.rotation.normalize_or(Vec2::X)
    }

    /// Placement at rest, without sweep
    pub fn transform(&self) -> Transform {
        Transform::at(self.position)
            .with_rotation(self.unit_rotation())
            .with_scale(self.scale)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Slot {
    generation: u32,
    entity: Option<Entity>,
}

/// Slot arena of entities; iteration order is slot order, which keeps the
/// stepper deterministic
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, mut entity: Entity) -> EntityId {
        entity.rotation = entity.unit_rotation();
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entity = Some(entity);
            return EntityId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            entity: Some(entity),
        });
        EntityId {
            index,
            generation: 0,
        }
    }

    /// Remove an entity; its handle and any copies of it go stale
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let entity = slot.entity.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        Some(entity)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entity.as_ref()
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entity.as_mut()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Live entities in slot order
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.entity.as_ref().map(|entity| {
                (
                    EntityId {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    entity,
                )
            })
        })
    }

    /// Handles of live entities in slot order
    pub fn ids(&self) -> Vec<EntityId> {
        self.iter().map(|(id, _)| id).collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Topmost (most recently slotted) collider containing `point`
    pub fn pick(&self, point: Vec2) -> Option<EntityId> {
        self.iter()
            .filter(|(_, e)| {
                let t = e.transform();
                t.world_bounds(&e.shape).contains(point) && gjk_intersect_point(&t, &e.shape, point)
            })
            .map(|(id, _)| id)
            .last()
    }
}

/// Everything one frame of physics needs, passed explicitly
#[derive(Debug, Clone, Default)]
pub struct Simulation {
    pub world: World,
    pub scratch: ScratchArena,
    pub settings: Settings,
    /// Frames stepped so far
    pub frame: u64,
}

impl Simulation {
    pub fn new(settings: Settings) -> Self {
        Self {
            world: World::new(),
            scratch: ScratchArena::with_capacity(64),
            settings,
            frame: 0,
        }
    }

    /// Advance every physical entity by `dt`
    pub fn step(&mut self, dt: f32) {
        self.frame += 1;
        physics_step(&mut self.world, &mut self.scratch, &self.settings, dt);
    }
}
