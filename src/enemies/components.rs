//! Enemy archetypes and per-enemy runtime state.

use bevy::prelude::*;

use crate::combat::{Attacking, CombatEntity, Combatant, Damageable, EnemyId, Stunnable};

/// Closed set of enemy archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EnemyKind {
    /// Slow box that hits rarely.
    Husk,
    /// Quicker, longer reach.
    Spearman,
    /// Boss: heavy, hard to stagger, shrugs off part of the knockback.
    Warden,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [Self::Husk, Self::Spearman, Self::Warden];

    /// Key used in data files and level spawn lists.
    pub fn key(self) -> &'static str {
        match self {
            Self::Husk => "husk",
            Self::Spearman => "spearman",
            Self::Warden => "warden",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    /// Profile used when no data file overrides it.
    pub fn builtin_profile(self) -> EnemyProfile {
        match self {
            Self::Husk => EnemyProfile::default(),
            Self::Spearman => EnemyProfile {
                max_hp: 70.0,
                move_speed: 3.8,
                chase_range: 12.0,
                stop_distance: 2.0,
                attack_range: 2.4,
                attack_damage: 10.0,
                attack_interval_base: 1.2,
                attack_interval_jitter_max: 0.6,
                max_poise: 35.0,
                poise_regen_rate: 30.0,
                stun_duration: 0.45,
                radius: 0.45,
                reward_points: 35,
                ..EnemyProfile::default()
            },
            Self::Warden => EnemyProfile {
                max_hp: 200.0,
                move_speed: 1.5,
                chase_range: 18.0,
                stop_distance: 2.5,
                attack_range: 2.8,
                attack_damage: 15.0,
                attack_interval_base: 1.4,
                attack_interval_jitter_max: 0.5,
                max_poise: 80.0,
                poise_regen_rate: 35.0,
                stun_duration: 0.6,
                radius: 0.9,
                reward_points: 200,
                knockback_scale: 0.7,
                attack_poise_damage: 30.0,
                attack_knockback: 8.0,
                ..EnemyProfile::default()
            },
        }
    }
}

/// Immutable per-archetype enemy numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyProfile {
    pub max_hp: f32,
    pub move_speed: f32,
    pub chase_range: f32,
    pub stop_distance: f32,
    pub attack_range: f32,
    pub attack_damage: f32,
    pub attack_interval_base: f32,
    pub attack_interval_jitter_max: f32,
    pub max_poise: f32,
    pub poise_regen_rate: f32,
    pub stun_duration: f32,
    /// Per-tick multiplier on knockback velocity while stunned.
    pub knockback_damping: f32,
    pub radius: f32,
    pub reward_points: u32,
    /// Multiplier on the knockback this enemy receives.
    pub knockback_scale: f32,
    /// Poise damage this enemy's attacks deal to the player.
    pub attack_poise_damage: f32,
    pub attack_knockback: f32,
}

impl Default for EnemyProfile {
    fn default() -> Self {
        Self {
            max_hp: 50.0,
            move_speed: 3.0,
            chase_range: 10.0,
            stop_distance: 1.8,
            attack_range: 1.5,
            attack_damage: 5.0,
            attack_interval_base: 8.0,
            attack_interval_jitter_max: 0.8,
            max_poise: 25.0,
            poise_regen_rate: 25.0,
            stun_duration: 0.4,
            knockback_damping: 0.9,
            radius: 0.4,
            reward_points: 10,
            knockback_scale: 1.0,
            attack_poise_damage: 0.0,
            attack_knockback: 0.0,
        }
    }
}

/// Presentation label for what an enemy did this tick.
#[derive(Default, PartialEq, Eq, Clone, Copy, Debug)]
pub enum AiState {
    /// Target outside chase range.
    #[default]
    Idle,
    /// Moving toward (or holding at) the target.
    Chasing,
    /// Struck the target this tick.
    Attacking,
    Stunned,
}

/// One enemy in the roster.
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: EnemyId,
    pub kind: EnemyKind,
    pub profile: EnemyProfile,
    pub body: CombatEntity,
    pub attack_cooldown_remaining: f32,
    /// Facing around Y, `atan2(dx, dz)` toward the target.
    pub yaw: f32,
    pub ai_state: AiState,
    /// Where this enemy spawned.
    pub home: Vec3,
}

impl Enemy {
    pub fn new(id: EnemyId, kind: EnemyKind, profile: EnemyProfile, position: Vec3) -> Self {
        let body = CombatEntity::new(profile.max_hp, profile.max_poise, profile.radius, position)
            .with_stun(profile.stun_duration, profile.knockback_damping);
        Self {
            id,
            kind,
            profile,
            body,
            attack_cooldown_remaining: 0.0,
            yaw: 0.0,
            ai_state: AiState::Idle,
            home: position,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.body.alive
    }
}

impl Damageable for Enemy {
    fn combatant(&self) -> Combatant {
        Combatant::Enemy(self.id)
    }

    fn body(&self) -> &CombatEntity {
        &self.body
    }

    fn body_mut(&mut self) -> &mut CombatEntity {
        &mut self.body
    }

    fn reward_points(&self) -> u32 {
        self.profile.reward_points
    }
}

impl Stunnable for Enemy {
    fn on_hit(&mut self, poise_damage: f32, knockback_dir: Option<Vec3>, knockback_power: f32) -> bool {
        let power = knockback_power * self.profile.knockback_scale;
        self.body.apply_poise_damage(poise_damage, knockback_dir, power)
    }
}

impl Attacking for Enemy {
    fn attack_cooldown(&self) -> f32 {
        self.attack_cooldown_remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warden_takes_reduced_knockback() {
        let mut warden = Enemy::new(
            EnemyId(1),
            EnemyKind::Warden,
            EnemyKind::Warden.builtin_profile(),
            Vec3::ZERO,
        );
        assert!(warden.on_hit(100.0, Some(Vec3::X), 10.0));
        assert!((warden.body.knockback_velocity.x - 7.0).abs() < 1e-5);
        assert_eq!(warden.body.stun_timer, 0.6);
    }

    #[test]
    fn new_enemy_is_ready_to_attack() {
        let husk = Enemy::new(EnemyId(0), EnemyKind::Husk, EnemyProfile::default(), Vec3::ONE);
        assert!(husk.is_attack_ready());
        assert_eq!(husk.body.hp, 50.0);
        assert_eq!(husk.body.poise, 25.0);
        assert_eq!(husk.combatant(), Combatant::Enemy(EnemyId(0)));
        assert_eq!(husk.reward_points(), 10);
    }

    #[test]
    fn keys_round_trip() {
        for kind in EnemyKind::ALL {
            assert_eq!(EnemyKind::from_key(kind.key()), Some(kind));
        }
    }
}
