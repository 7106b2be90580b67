//! Enemy data loading from RON files.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use super::components::{EnemyKind, EnemyProfile};
use crate::core::{load_ron_directory, resolve_f32, DATA_ROOT};

/// Enemy definition loaded from RON file. Missing numbers fall back to the
/// archetype's built-in profile.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct EnemyDefinition {
    pub name: String,
    /// Archetype key, e.g. `"spearman"`. Defaults to the file stem.
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub max_hp: Option<f32>,
    #[serde(default)]
    pub move_speed: Option<f32>,
    #[serde(default)]
    pub chase_range: Option<f32>,
    #[serde(default)]
    pub stop_distance: Option<f32>,
    #[serde(default)]
    pub attack_range: Option<f32>,
    #[serde(default)]
    pub attack_damage: Option<f32>,
    #[serde(default)]
    pub attack_interval_base: Option<f32>,
    #[serde(default)]
    pub attack_interval_jitter_max: Option<f32>,
    #[serde(default)]
    pub max_poise: Option<f32>,
    #[serde(default)]
    pub poise_regen_rate: Option<f32>,
    #[serde(default)]
    pub stun_duration: Option<f32>,
    #[serde(default)]
    pub knockback_damping: Option<f32>,
    #[serde(default)]
    pub radius: Option<f32>,
    #[serde(default)]
    pub reward_points: Option<u32>,
    #[serde(default)]
    pub knockback_scale: Option<f32>,
    #[serde(default)]
    pub attack_poise_damage: Option<f32>,
    #[serde(default)]
    pub attack_knockback: Option<f32>,
}

impl EnemyDefinition {
    /// Convert to a fully populated profile.
    pub fn resolve(&self, kind: EnemyKind) -> EnemyProfile {
        let base = kind.builtin_profile();
        let owner = format!("enemy '{}'", self.name);
        let non_negative = |field: &str, value: Option<f32>, fallback: f32| {
            resolve_f32(&owner, field, value, fallback, 0.0, f32::MAX)
        };

        EnemyProfile {
            max_hp: resolve_f32(&owner, "max_hp", self.max_hp, base.max_hp, 1.0, f32::MAX),
            move_speed: non_negative("move_speed", self.move_speed, base.move_speed),
            chase_range: non_negative("chase_range", self.chase_range, base.chase_range),
            stop_distance: non_negative("stop_distance", self.stop_distance, base.stop_distance),
            attack_range: non_negative("attack_range", self.attack_range, base.attack_range),
            attack_damage: non_negative("attack_damage", self.attack_damage, base.attack_damage),
            attack_interval_base: non_negative(
                "attack_interval_base",
                self.attack_interval_base,
                base.attack_interval_base,
            ),
            attack_interval_jitter_max: non_negative(
                "attack_interval_jitter_max",
                self.attack_interval_jitter_max,
                base.attack_interval_jitter_max,
            ),
            max_poise: non_negative("max_poise", self.max_poise, base.max_poise),
            poise_regen_rate: non_negative(
                "poise_regen_rate",
                self.poise_regen_rate,
                base.poise_regen_rate,
            ),
            stun_duration: non_negative("stun_duration", self.stun_duration, base.stun_duration),
            knockback_damping: resolve_f32(
                &owner,
                "knockback_damping",
                self.knockback_damping,
                base.knockback_damping,
                0.0,
                1.0,
            ),
            radius: resolve_f32(&owner, "radius", self.radius, base.radius, 0.01, f32::MAX),
            reward_points: self.reward_points.unwrap_or_else(|| {
                warn!("{}: reward_points not set, using {}", owner, base.reward_points);
                base.reward_points
            }),
            knockback_scale: non_negative(
                "knockback_scale",
                self.knockback_scale,
                base.knockback_scale,
            ),
            attack_poise_damage: non_negative(
                "attack_poise_damage",
                self.attack_poise_damage,
                base.attack_poise_damage,
            ),
            attack_knockback: non_negative(
                "attack_knockback",
                self.attack_knockback,
                base.attack_knockback,
            ),
        }
    }
}

/// Resource holding all loaded enemy definitions.
#[derive(Resource, Default)]
pub struct EnemyRegistry {
    pub definitions: HashMap<EnemyKind, EnemyDefinition>,
}

impl EnemyRegistry {
    /// Get an enemy definition by archetype.
    pub fn get(&self, kind: EnemyKind) -> Option<&EnemyDefinition> {
        self.definitions.get(&kind)
    }

    pub fn profile(&self, kind: EnemyKind) -> EnemyProfile {
        self.get(kind)
            .map(|definition| definition.resolve(kind))
            .unwrap_or_else(|| kind.builtin_profile())
    }

    pub fn insert(&mut self, stem: &str, definition: EnemyDefinition) -> Option<EnemyKind> {
        let key = definition.kind.as_deref().unwrap_or(stem);
        let Some(kind) = EnemyKind::from_key(key) else {
            warn!("Unknown enemy kind '{}' in {}.ron, skipping", key, stem);
            return None;
        };
        self.definitions.insert(kind, definition);
        Some(kind)
    }
}

/// Load all enemy definitions from the assets/data/enemies/ directory.
pub fn load_enemy_definitions(mut registry: ResMut<EnemyRegistry>) {
    let enemies_dir = Path::new(DATA_ROOT).join("enemies");

    match load_ron_directory::<EnemyDefinition>(&enemies_dir) {
        Ok(definitions) => {
            for (stem, definition) in definitions {
                let name = definition.name.clone();
                if let Some(kind) = registry.insert(&stem, definition) {
                    info!("Loaded enemy definition: {} ({:?})", name, kind);
                }
            }
        }
        Err(e) => warn!("{}, using built-in enemies", e),
    }

    info!("Loaded {} enemy definitions", registry.definitions.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_resolves_definition() {
        let definition: EnemyDefinition = ron::from_str(
            r#"#![enable(implicit_some)]
            (
                name: "Spearman",
                kind: "spearman",
                max_hp: 90.0,
                knockback_damping: 1.5,
                reward_points: 40,
            )"#,
        )
        .expect("valid ron");

        let mut registry = EnemyRegistry::default();
        assert_eq!(registry.insert("whatever", definition), Some(EnemyKind::Spearman));

        let profile = registry.profile(EnemyKind::Spearman);
        assert_eq!(profile.max_hp, 90.0);
        assert_eq!(profile.knockback_damping, 0.9);
        assert_eq!(profile.reward_points, 40);
        assert_eq!(profile.attack_range, 2.4);
    }

    #[test]
    fn undefined_kind_uses_builtin() {
        let registry = EnemyRegistry::default();
        assert_eq!(
            registry.profile(EnemyKind::Warden),
            EnemyKind::Warden.builtin_profile()
        );
    }
}
