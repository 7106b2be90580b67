//! Melee hit query: which body does a swing connect with.

use bevy::prelude::*;

use super::components::CombatEntity;
use crate::world::planar;

/// Planar unit vector for a facing yaw (0 faces +Z, positive turns toward +X).
pub fn yaw_forward(yaw: f32) -> Vec2 {
    Vec2::new(yaw.sin(), yaw.cos())
}

/// Yaw that faces from `from` toward `to` on the ground plane.
pub fn yaw_toward(from: Vec3, to: Vec3) -> f32 {
    let delta = planar(to - from);
    delta.x.atan2(delta.y)
}

/// Distance along a planar ray at which it enters a circle, if it does.
fn ray_circle_entry(origin: Vec2, dir: Vec2, center: Vec2, radius: f32) -> Option<f32> {
    let to_center = center - origin;
    if to_center.length_squared() <= radius * radius {
        return Some(0.0);
    }

    let along = to_center.dot(dir);
    if along < 0.0 {
        return None;
    }

    let miss_sq = to_center.length_squared() - along * along;
    let radius_sq = radius * radius;
    if miss_sq > radius_sq {
        return None;
    }

    Some((along - (radius_sq - miss_sq).sqrt()).max(0.0))
}

/// Nearest living candidate whose circle the facing ray enters within
/// `max_range`. Returns the candidate's key.
pub fn find_swing_target<'a, K, I>(origin: Vec3, yaw: f32, max_range: f32, candidates: I) -> Option<K>
where
    I: IntoIterator<Item = (K, &'a CombatEntity)>,
{
    let origin = planar(origin);
    let dir = yaw_forward(yaw);

    candidates
        .into_iter()
        .filter(|(_, body)| body.alive)
        .filter_map(|(key, body)| {
            ray_circle_entry(origin, dir, planar(body.position), body.collision_radius)
                .filter(|distance| *distance <= max_range)
                .map(|distance| (key, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(key, _)| key)
}
