//! Items lying in the level: weapons and rings.

use bevy::prelude::*;

use super::collision::planar;
use crate::combat::WeaponKind;
use crate::progression::RingId;

/// How close the player must stand to collect a pickup.
pub const PICKUP_RADIUS: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickupKind {
    Weapon(WeaponKind),
    Ring(RingId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pickup {
    pub kind: PickupKind,
    pub position: Vec3,
    pub collected: bool,
}

impl Pickup {
    pub fn new(kind: PickupKind, position: Vec3) -> Self {
        Self {
            kind,
            position,
            collected: false,
        }
    }
}

/// Index of the closest uncollected pickup within reach of `position`.
pub fn nearest_pickup(pickups: &[Pickup], position: Vec3) -> Option<usize> {
    pickups
        .iter()
        .enumerate()
        .filter(|(_, pickup)| !pickup.collected)
        .map(|(index, pickup)| (index, planar(pickup.position - position).length()))
        .filter(|(_, distance)| *distance <= PICKUP_RADIUS)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}
