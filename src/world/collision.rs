//! Collision against static level boxes, gravity, and body separation.
//!
//! Nothing here is a physics engine. Bodies are vertical cylinders (a circle
//! in the XZ plane plus a feet height), obstacles are axis-aligned boxes, and
//! every resolution step is a cheap containment test.
//!
//! Horizontal movement resolves the X and Z components independently: a
//! body pushed diagonally into a wall keeps the component that is still free
//! and slides along the face instead of stopping dead.

use bevy::prelude::*;
use serde::Deserialize;

use crate::combat::{CombatEntity, Damageable};

/// Project a world position or direction onto the ground plane (x, z).
pub fn planar(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// An immovable axis-aligned box in the level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticObstacle {
    pub center: Vec3,
    pub half_extent: Vec3,
}

impl StaticObstacle {
    pub fn new(center: Vec3, half_extent: Vec3) -> Self {
        Self {
            center,
            half_extent: half_extent.abs(),
        }
    }

    /// Box of the given full `size` standing on `base_y` at (x, z).
    pub fn standing(x: f32, z: f32, size: Vec3, base_y: f32) -> Self {
        let size = size.abs();
        Self::new(
            Vec3::new(x, base_y + size.y / 2.0, z),
            size / 2.0,
        )
    }

    pub fn top(&self) -> f32 {
        self.center.y + self.half_extent.y
    }

    pub fn bottom(&self) -> f32 {
        self.center.y - self.half_extent.y
    }

    /// Whether a circle of `radius` at `position` overlaps the box footprint.
    pub fn overlaps_footprint(&self, position: Vec3, radius: f32) -> bool {
        let dx = (position.x - self.center.x).abs();
        let dz = (position.z - self.center.z).abs();
        dx < self.half_extent.x + radius && dz < self.half_extent.z + radius
    }

    /// Whether the box stops a body whose feet are at `position.y`.
    ///
    /// Bodies standing on (or above) the top walk over the box; bodies far
    /// below the bottom pass underneath it.
    pub fn blocks(&self, position: Vec3, radius: f32, config: &CollisionConfig) -> bool {
        if position.y >= self.top() - config.step_tolerance {
            return false;
        }
        if position.y < self.bottom() - config.fall_through_tolerance {
            return false;
        }
        self.overlaps_footprint(position, radius)
    }
}

/// Tunables for the collision resolver.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Vertical acceleration (negative is down).
    pub gravity: f32,
    /// Feet within this distance of an obstacle top count as standing on it.
    pub step_tolerance: f32,
    /// Feet this far below an obstacle bottom pass under it.
    pub fall_through_tolerance: f32,
    /// Height of the flat ground plane.
    pub ground_height: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            gravity: -15.0,
            step_tolerance: 0.05,
            fall_through_tolerance: 0.5,
            ground_height: 0.0,
        }
    }
}

/// What the vertical pass ended on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landing {
    /// Still in the air.
    Airborne,
    /// Resting on the ground plane.
    Ground,
    /// Resting on top of the obstacle at this index.
    Obstacle(usize),
}

/// Whether any obstacle blocks a body of `radius` at `position`.
pub fn would_collide(
    position: Vec3,
    radius: f32,
    obstacles: &[StaticObstacle],
    config: &CollisionConfig,
) -> bool {
    obstacles
        .iter()
        .any(|obstacle| obstacle.blocks(position, radius, config))
}

/// Move `body` by the planar vector `movement` (x → X, y → Z), one axis at a
/// time. Returns the movement that was actually committed.
pub fn resolve_horizontal_move(
    body: &mut CombatEntity,
    movement: Vec2,
    obstacles: &[StaticObstacle],
    config: &CollisionConfig,
) -> Vec2 {
    let mut applied = Vec2::ZERO;

    if movement.x != 0.0 {
        let mut candidate = body.position;
        candidate.x += movement.x;
        if !would_collide(candidate, body.collision_radius, obstacles, config) {
            body.position.x = candidate.x;
            applied.x = movement.x;
        }
    }

    if movement.y != 0.0 {
        let mut candidate = body.position;
        candidate.z += movement.y;
        if !would_collide(candidate, body.collision_radius, obstacles, config) {
            body.position.z = candidate.z;
            applied.y = movement.y;
        }
    }

    applied
}

/// Integrate gravity for one step and land on the first obstacle top crossed
/// this step, or on the ground plane.
pub fn resolve_vertical(
    body: &mut CombatEntity,
    dt: f32,
    obstacles: &[StaticObstacle],
    config: &CollisionConfig,
) -> Landing {
    let previous_y = body.position.y;
    body.vertical_velocity += config.gravity * dt;
    body.position.y += body.vertical_velocity * dt;

    for (index, obstacle) in obstacles.iter().enumerate() {
        let top = obstacle.top();
        if obstacle.overlaps_footprint(body.position, body.collision_radius)
            && previous_y >= top
            && body.position.y <= top
            && body.vertical_velocity <= 0.0
        {
            body.position.y = top;
            body.vertical_velocity = 0.0;
            body.grounded = true;
            return Landing::Obstacle(index);
        }
    }

    if body.position.y <= config.ground_height {
        body.position.y = config.ground_height;
        body.vertical_velocity = 0.0;
        body.grounded = true;
        Landing::Ground
    } else {
        body.grounded = false;
        Landing::Airborne
    }
}

/// Push every overlapping pair of living bodies apart, half the overlap each.
///
/// Exactly coincident pairs have no separation direction and are left alone.
pub fn resolve_entity_separation<T: Damageable>(entities: &mut [T]) {
    let count = entities.len();
    for i in 0..count {
        for j in (i + 1)..count {
            let (head, tail) = entities.split_at_mut(j);
            separate_pair(head[i].body_mut(), tail[0].body_mut());
        }
    }
}

fn separate_pair(a: &mut CombatEntity, b: &mut CombatEntity) {
    if !a.alive || !b.alive {
        return;
    }

    let offset = planar(b.position - a.position);
    let distance = offset.length();
    let min_distance = a.collision_radius + b.collision_radius;

    if distance == 0.0 || distance >= min_distance {
        return;
    }

    let normal = offset / distance;
    let push = (min_distance - distance) * 0.5;

    a.position.x -= normal.x * push;
    a.position.z -= normal.y * push;
    b.position.x += normal.x * push;
    b.position.z += normal.y * push;
}
