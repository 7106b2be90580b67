//! Fully resolved archetype tables, built once from the data registries.

use std::collections::HashMap;

use crate::combat::{WeaponKind, WeaponRegistry, WeaponStats};
use crate::enemies::{EnemyKind, EnemyProfile, EnemyRegistry};

/// Weapon stats and enemy profiles with every field filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct Archetypes {
    weapons: HashMap<WeaponKind, WeaponStats>,
    enemies: HashMap<EnemyKind, EnemyProfile>,
}

impl Archetypes {
    /// Tables that ignore any data files.
    pub fn builtin() -> Self {
        Self {
            weapons: WeaponKind::ALL
                .into_iter()
                .map(|kind| (kind, kind.builtin_stats()))
                .collect(),
            enemies: EnemyKind::ALL
                .into_iter()
                .map(|kind| (kind, kind.builtin_profile()))
                .collect(),
        }
    }

    pub fn from_registries(weapons: &WeaponRegistry, enemies: &EnemyRegistry) -> Self {
        Self {
            weapons: WeaponKind::ALL
                .into_iter()
                .map(|kind| (kind, weapons.stats(kind)))
                .collect(),
            enemies: EnemyKind::ALL
                .into_iter()
                .map(|kind| (kind, enemies.profile(kind)))
                .collect(),
        }
    }

    pub fn weapon(&self, kind: WeaponKind) -> WeaponStats {
        self.weapons
            .get(&kind)
            .copied()
            .unwrap_or_else(|| kind.builtin_stats())
    }

    pub fn enemy(&self, kind: EnemyKind) -> EnemyProfile {
        self.enemies
            .get(&kind)
            .copied()
            .unwrap_or_else(|| kind.builtin_profile())
    }

    /// Override one weapon's stats.
    pub fn set_weapon(&mut self, kind: WeaponKind, stats: WeaponStats) {
        self.weapons.insert(kind, stats);
    }

    /// Override one enemy's profile.
    pub fn set_enemy(&mut self, kind: EnemyKind, profile: EnemyProfile) {
        self.enemies.insert(kind, profile);
    }
}

impl Default for Archetypes {
    fn default() -> Self {
        Self::builtin()
    }
}
