//! Weapon data loading from RON files.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use super::weapon::{WeaponKind, WeaponStats, COMBO_GRACE};
use crate::core::{load_ron_directory, resolve_f32, DATA_ROOT};

/// Weapon definition loaded from RON file. Every number is optional and
/// falls back to the archetype's built-in value.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct WeaponDefinition {
    pub name: String,
    /// Archetype key, e.g. `"long_sword"`. Defaults to the file stem.
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub base_damage: Option<f32>,
    #[serde(default)]
    pub max_range: Option<f32>,
    #[serde(default)]
    pub cooldown_time: Option<f32>,
    #[serde(default)]
    pub attack_duration: Option<f32>,
    #[serde(default)]
    pub windup_fraction: Option<f32>,
    #[serde(default)]
    pub recovery_fraction: Option<f32>,
    #[serde(default)]
    pub charge_time_max: Option<f32>,
    #[serde(default)]
    pub charge_damage_mul: Option<f32>,
    #[serde(default)]
    pub charge_poise_mul: Option<f32>,
    #[serde(default)]
    pub min_charge_ratio: Option<f32>,
    #[serde(default)]
    pub combo_window: Option<f32>,
    #[serde(default)]
    pub base_poise_damage: Option<f32>,
    #[serde(default)]
    pub base_knockback: Option<f32>,
    #[serde(default)]
    pub charge_move_speed_mul: Option<f32>,
}

impl WeaponDefinition {
    /// Fill every field, using `kind`'s built-in table for anything missing
    /// or invalid.
    pub fn resolve(&self, kind: WeaponKind) -> WeaponStats {
        let base = kind.builtin_stats();
        let owner = format!("weapon '{}'", self.name);
        let pick = |field: &str, value: Option<f32>, fallback: f32, min: f32, max: f32| {
            resolve_f32(&owner, field, value, fallback, min, max)
        };

        let charge_time_max = pick(
            "charge_time_max",
            self.charge_time_max,
            base.charge_time_max,
            0.0,
            f32::MAX,
        );

        WeaponStats {
            base_damage: pick("base_damage", self.base_damage, base.base_damage, 0.0, f32::MAX),
            max_range: pick("max_range", self.max_range, base.max_range, 0.0, f32::MAX),
            cooldown_time: pick(
                "cooldown_time",
                self.cooldown_time,
                base.cooldown_time,
                0.0,
                f32::MAX,
            ),
            attack_duration: pick(
                "attack_duration",
                self.attack_duration,
                base.attack_duration,
                0.0,
                f32::MAX,
            ),
            windup_fraction: pick(
                "windup_fraction",
                self.windup_fraction,
                base.windup_fraction,
                0.0,
                1.0,
            ),
            recovery_fraction: pick(
                "recovery_fraction",
                self.recovery_fraction,
                base.recovery_fraction,
                0.0,
                1.0,
            ),
            charge_time_max,
            charge_damage_mul: pick(
                "charge_damage_mul",
                self.charge_damage_mul,
                base.charge_damage_mul,
                0.0,
                f32::MAX,
            ),
            charge_poise_mul: pick(
                "charge_poise_mul",
                self.charge_poise_mul,
                base.charge_poise_mul,
                0.0,
                f32::MAX,
            ),
            min_charge_ratio: pick(
                "min_charge_ratio",
                self.min_charge_ratio,
                base.min_charge_ratio,
                0.0,
                1.0,
            ),
            combo_window: pick(
                "combo_window",
                self.combo_window,
                charge_time_max + COMBO_GRACE,
                0.0,
                f32::MAX,
            ),
            base_poise_damage: pick(
                "base_poise_damage",
                self.base_poise_damage,
                base.base_poise_damage,
                0.0,
                f32::MAX,
            ),
            base_knockback: pick(
                "base_knockback",
                self.base_knockback,
                base.base_knockback,
                0.0,
                f32::MAX,
            ),
            charge_move_speed_mul: pick(
                "charge_move_speed_mul",
                self.charge_move_speed_mul,
                base.charge_move_speed_mul,
                0.0,
                f32::MAX,
            ),
        }
    }
}

/// Resource holding all loaded weapon definitions, keyed by archetype.
#[derive(Resource, Default)]
pub struct WeaponRegistry {
    pub definitions: HashMap<WeaponKind, WeaponDefinition>,
}

impl WeaponRegistry {
    pub fn get(&self, kind: WeaponKind) -> Option<&WeaponDefinition> {
        self.definitions.get(&kind)
    }

    /// Resolved stats for `kind`, built-in when no file defined it.
    pub fn stats(&self, kind: WeaponKind) -> WeaponStats {
        self.get(kind)
            .map(|definition| definition.resolve(kind))
            .unwrap_or_else(|| kind.builtin_stats())
    }

    /// Add a definition loaded from a file named `stem`.
    pub fn insert(&mut self, stem: &str, definition: WeaponDefinition) -> Option<WeaponKind> {
        let key = definition.kind.as_deref().unwrap_or(stem);
        let Some(kind) = WeaponKind::from_key(key) else {
            warn!("Unknown weapon kind '{}' in {}.ron, skipping", key, stem);
            return None;
        };
        self.definitions.insert(kind, definition);
        Some(kind)
    }
}

/// Load all weapon definitions from the assets/data/weapons/ directory.
pub fn load_weapon_definitions(mut registry: ResMut<WeaponRegistry>) {
    let weapons_dir = Path::new(DATA_ROOT).join("weapons");

    match load_ron_directory::<WeaponDefinition>(&weapons_dir) {
        Ok(definitions) => {
            for (stem, definition) in definitions {
                let name = definition.name.clone();
                if let Some(kind) = registry.insert(&stem, definition) {
                    info!("Loaded weapon definition: {} ({:?})", name, kind);
                }
            }
        }
        Err(e) => warn!("{}, using built-in weapons", e),
    }

    info!("Loaded {} weapon definitions", registry.definitions.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_definition_keeps_builtin_values() {
        let definition: WeaponDefinition = ron::from_str(
            r#"(
                name: "Heavy Blade",
                base_damage: Some(12.0),
                windup_fraction: Some(1.5),
            )"#,
        )
        .expect("valid ron");

        let stats = definition.resolve(WeaponKind::BrokenSword);
        assert_eq!(stats.base_damage, 12.0);
        assert_eq!(stats.windup_fraction, 0.25);
        assert_eq!(stats.max_range, 3.5);
        assert!((stats.combo_window - 1.3).abs() < 1e-6);
    }

    #[test]
    fn combo_window_follows_resolved_charge_time() {
        let definition = WeaponDefinition {
            name: "Quick".into(),
            charge_time_max: Some(0.4),
            ..default()
        };
        let stats = definition.resolve(WeaponKind::BrokenSword);
        assert!((stats.combo_window - 1.0).abs() < 1e-6);
    }

    #[test]
    fn registry_keys_by_kind_and_falls_back() {
        let mut registry = WeaponRegistry::default();
        let definition = WeaponDefinition {
            name: "Long Sword".into(),
            base_damage: Some(20.0),
            ..default()
        };
        assert_eq!(registry.insert("long_sword", definition), Some(WeaponKind::LongSword));
        assert_eq!(registry.insert("club", WeaponDefinition::default()), None);

        assert_eq!(registry.stats(WeaponKind::LongSword).base_damage, 20.0);
        assert_eq!(registry.stats(WeaponKind::Scythe), WeaponKind::Scythe.builtin_stats());
    }
}
