//! Combat-related components: the shared combat record and its capabilities.

use bevy::prelude::*;

use crate::world::{planar, resolve_horizontal_move, CollisionConfig, StaticObstacle};

/// Smallest divisor used when dividing by a configured duration.
pub const DURATION_EPSILON: f32 = 1e-4;

/// Knockback slower than this (units per second) is dropped to zero.
pub const KNOCKBACK_STOP_SPEED: f32 = 0.1;

/// Stable handle for an enemy in the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(pub u32);

/// Who is on either side of a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combatant {
    Player,
    Enemy(EnemyId),
}

/// Health, poise and stun state shared by the player and every enemy.
///
/// All mutation goes through the methods below, which keep `hp` and `poise`
/// inside their bounds and turn every call on a dead entity into a no-op.
#[derive(Debug, Clone, PartialEq)]
pub struct CombatEntity {
    pub hp: f32,
    pub max_hp: f32,
    pub poise: f32,
    pub max_poise: f32,
    pub stunned: bool,
    pub stun_timer: f32,
    /// How long a poise break keeps the entity stunned.
    pub stun_duration: f32,
    /// Horizontal knockback (x → world X, y → world Z) while stunned.
    pub knockback_velocity: Vec2,
    /// Per-tick multiplier applied to the knockback velocity.
    pub knockback_damping: f32,
    /// Feet position.
    pub position: Vec3,
    pub vertical_velocity: f32,
    pub grounded: bool,
    pub collision_radius: f32,
    pub alive: bool,
}

impl CombatEntity {
    pub fn new(max_hp: f32, max_poise: f32, collision_radius: f32, position: Vec3) -> Self {
        let max_hp = max_hp.max(1.0);
        let max_poise = max_poise.max(0.0);
        Self {
            hp: max_hp,
            max_hp,
            poise: max_poise,
            max_poise,
            stunned: false,
            stun_timer: 0.0,
            stun_duration: 0.4,
            knockback_velocity: Vec2::ZERO,
            knockback_damping: 0.9,
            position,
            vertical_velocity: 0.0,
            grounded: true,
            collision_radius: collision_radius.max(0.01),
            alive: true,
        }
    }

    pub fn with_stun(mut self, stun_duration: f32, knockback_damping: f32) -> Self {
        self.stun_duration = stun_duration.max(0.0);
        self.knockback_damping = knockback_damping.clamp(0.0, 1.0);
        self
    }

    /// Remove up to `amount` hp. Returns how much was actually removed.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        if !self.alive || !amount.is_finite() || amount <= 0.0 {
            return 0.0;
        }
        let actual = amount.min(self.hp);
        self.hp = (self.hp - actual).max(0.0);
        actual
    }

    /// Restore up to `amount` hp. Returns how much was actually restored.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if !self.alive || !amount.is_finite() || amount <= 0.0 {
            return 0.0;
        }
        let actual = amount.min(self.max_hp - self.hp).max(0.0);
        self.hp += actual;
        actual
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }

    pub fn health_ratio(&self) -> f32 {
        (self.hp / self.max_hp.max(DURATION_EPSILON)).clamp(0.0, 1.0)
    }

    pub fn poise_ratio(&self) -> f32 {
        if self.max_poise <= 0.0 {
            return 0.0;
        }
        (self.poise / self.max_poise).clamp(0.0, 1.0)
    }

    /// Apply poise damage from a hit. Returns `true` when this hit broke the
    /// entity's poise and put it into the stunned state.
    ///
    /// Poise damage is ignored while already stunned. Only a hit that takes
    /// poise from above zero down to zero stuns.
    pub fn apply_poise_damage(
        &mut self,
        poise_damage: f32,
        knockback_dir: Option<Vec3>,
        knockback_power: f32,
    ) -> bool {
        if !self.alive || self.stunned {
            return false;
        }
        if !poise_damage.is_finite() || poise_damage <= 0.0 || self.poise <= 0.0 {
            return false;
        }

        self.poise = (self.poise - poise_damage).max(0.0);
        if self.poise > 0.0 {
            return false;
        }

        self.stunned = true;
        self.stun_timer = self.stun_duration;
        self.knockback_velocity = match knockback_dir {
            Some(dir) if knockback_power > 0.0 => {
                planar(dir).normalize_or_zero() * knockback_power
            }
            _ => Vec2::ZERO,
        };
        true
    }

    /// Advance the stun sub-state: slide along the knockback, decay it, and
    /// recover once the timer runs out. Returns `true` on the tick the entity
    /// recovers.
    pub fn tick_stun(
        &mut self,
        dt: f32,
        obstacles: &[StaticObstacle],
        collision: &CollisionConfig,
    ) -> bool {
        if !self.alive || !self.stunned {
            return false;
        }

        self.stun_timer -= dt;

        if self.knockback_velocity != Vec2::ZERO {
            let step = self.knockback_velocity * dt;
            resolve_horizontal_move(self, step, obstacles, collision);
            self.knockback_velocity *= self.knockback_damping;
            if self.knockback_velocity.length() < KNOCKBACK_STOP_SPEED {
                self.knockback_velocity = Vec2::ZERO;
            }
        }

        if self.stun_timer <= 0.0 {
            self.stunned = false;
            self.stun_timer = 0.0;
            self.knockback_velocity = Vec2::ZERO;
            self.poise = self.max_poise;
            return true;
        }
        false
    }

    /// Regenerate poise toward its maximum. Stunned entities do not regenerate.
    pub fn regenerate_poise(&mut self, dt: f32, rate: f32) {
        if !self.alive || self.stunned || rate <= 0.0 {
            return;
        }
        self.poise = (self.poise + rate * dt).min(self.max_poise);
    }

    /// Mark the entity dead. Returns `true` only for the call that killed it.
    pub fn die(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.alive = false;
        self.hp = self.hp.max(0.0);
        self.stunned = false;
        self.knockback_velocity = Vec2::ZERO;
        true
    }

    /// Bring the entity back at `position` with full hp and poise.
    pub fn restore(&mut self, position: Vec3) {
        self.hp = self.max_hp;
        self.poise = self.max_poise;
        self.stunned = false;
        self.stun_timer = 0.0;
        self.knockback_velocity = Vec2::ZERO;
        self.position = position;
        self.vertical_velocity = 0.0;
        self.grounded = true;
        self.alive = true;
    }

    /// Overwrite hp and poise with arbitrary values, clamped into bounds.
    pub fn set_vitals(&mut self, hp: f32, poise: f32) {
        if hp.is_finite() {
            self.hp = hp.clamp(0.0, self.max_hp);
        }
        if poise.is_finite() {
            self.poise = poise.clamp(0.0, self.max_poise);
        }
    }

    pub fn planar_distance_to(&self, point: Vec3) -> f32 {
        planar(point - self.position).length()
    }
}

/// Something a hit can land on.
pub trait Damageable {
    fn combatant(&self) -> Combatant;
    fn body(&self) -> &CombatEntity;
    fn body_mut(&mut self) -> &mut CombatEntity;

    /// Points awarded to whoever kills this.
    fn reward_points(&self) -> u32 {
        0
    }
}

/// Something whose poise can break. Returns `true` from `on_hit` when the
/// hit stunned it.
pub trait Stunnable: Damageable {
    fn on_hit(
        &mut self,
        poise_damage: f32,
        knockback_dir: Option<Vec3>,
        knockback_power: f32,
    ) -> bool {
        self.body_mut()
            .apply_poise_damage(poise_damage, knockback_dir, knockback_power)
    }
}

/// Something that attacks on a cooldown.
pub trait Attacking {
    fn attack_cooldown(&self) -> f32;

    fn is_attack_ready(&self) -> bool {
        self.attack_cooldown() <= 0.0
    }
}
