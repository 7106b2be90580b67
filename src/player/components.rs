//! Player record, intent, and configuration.

use bevy::prelude::*;
use serde::Deserialize;

use crate::combat::{
    CombatEntity, Combatant, Damageable, StaminaPool, StaminaSettings, Stunnable, WeaponKind,
    WeaponState, WeaponStats,
};
use crate::core::resolve_f32;

/// What the player asked for this tick, already mapped from raw input.
///
/// `movement` is a planar world-space direction (x → X, y → Z). The edge
/// flags (`jump`, `charge_pressed`, `charge_released`, `interact`) are cleared
/// by the driver after each tick.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct PlayerIntent {
    pub movement: Vec2,
    pub facing_yaw: Option<f32>,
    pub sprint_held: bool,
    pub jump: bool,
    pub charge_pressed: bool,
    pub charge_released: bool,
    pub interact: bool,
}

impl PlayerIntent {
    pub fn clear_edges(&mut self) {
        self.jump = false;
        self.charge_pressed = false;
        self.charge_released = false;
        self.interact = false;
    }
}

/// Stamina prices of the player's actions.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct StaminaCosts {
    pub jump: f32,
    pub dash: f32,
    pub charge_start: f32,
    /// Scaled by `0.5 + 0.5 * ratio` of the released swing.
    pub attack_base: f32,
    pub sprint_per_second: f32,
}

impl Default for StaminaCosts {
    fn default() -> Self {
        Self {
            jump: 12.0,
            dash: 12.0,
            charge_start: 5.0,
            attack_base: 18.0,
            sprint_per_second: 20.0,
        }
    }
}

impl StaminaCosts {
    pub fn attack(&self, ratio: f32) -> f32 {
        self.attack_base * (0.5 + 0.5 * ratio.clamp(0.0, 1.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashSettings {
    pub speed: f32,
    pub duration: f32,
    pub cooldown: f32,
}

impl Default for DashSettings {
    fn default() -> Self {
        Self {
            speed: 16.0,
            duration: 0.18,
            cooldown: 0.8,
        }
    }
}

/// Configuration for the player controller, read from `player.ron`.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Base movement speed in units per second
    pub move_speed: f32,
    /// Sprint speed multiplier
    pub sprint_multiplier: f32,
    /// How long sprint must be held before sprinting starts
    pub sprint_hold_time: f32,
    /// Jump velocity
    pub jump_speed: f32,
    pub radius: f32,
    pub max_hp: f32,
    pub max_poise: f32,
    /// Poise regained per second while not stunned
    pub poise_regen_rate: f32,
    pub stun_duration: f32,
    pub knockback_damping: f32,
    pub stamina: StaminaSettings,
    pub costs: StaminaCosts,
    pub dash: DashSettings,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 4.0,
            sprint_multiplier: 1.6,
            sprint_hold_time: 1.0,
            jump_speed: 6.0,
            radius: 0.5,
            max_hp: 100.0,
            max_poise: 50.0,
            poise_regen_rate: 20.0,
            stun_duration: 0.5,
            knockback_damping: 0.9,
            stamina: StaminaSettings::default(),
            costs: StaminaCosts::default(),
            dash: DashSettings::default(),
        }
    }
}

impl PlayerConfig {
    /// Replace every invalid number with its default.
    pub fn sanitized(self) -> Self {
        let base = Self::default();
        let owner = "player config";
        let check = |field: &str, value: f32, fallback: f32, min: f32, max: f32| {
            resolve_f32(owner, field, Some(value), fallback, min, max)
        };
        const UNBOUNDED: f32 = f32::MAX;

        Self {
            move_speed: check("move_speed", self.move_speed, base.move_speed, 0.0, UNBOUNDED),
            sprint_multiplier: check(
                "sprint_multiplier",
                self.sprint_multiplier,
                base.sprint_multiplier,
                0.0,
                UNBOUNDED,
            ),
            sprint_hold_time: check(
                "sprint_hold_time",
                self.sprint_hold_time,
                base.sprint_hold_time,
                0.0,
                UNBOUNDED,
            ),
            jump_speed: check("jump_speed", self.jump_speed, base.jump_speed, 0.0, UNBOUNDED),
            radius: check("radius", self.radius, base.radius, 0.01, UNBOUNDED),
            max_hp: check("max_hp", self.max_hp, base.max_hp, 1.0, UNBOUNDED),
            max_poise: check("max_poise", self.max_poise, base.max_poise, 0.0, UNBOUNDED),
            poise_regen_rate: check(
                "poise_regen_rate",
                self.poise_regen_rate,
                base.poise_regen_rate,
                0.0,
                UNBOUNDED,
            ),
            stun_duration: check(
                "stun_duration",
                self.stun_duration,
                base.stun_duration,
                0.0,
                UNBOUNDED,
            ),
            knockback_damping: check(
                "knockback_damping",
                self.knockback_damping,
                base.knockback_damping,
                0.0,
                1.0,
            ),
            stamina: StaminaSettings {
                maximum: check(
                    "stamina.maximum",
                    self.stamina.maximum,
                    base.stamina.maximum,
                    0.0,
                    UNBOUNDED,
                ),
                regen_rate: check(
                    "stamina.regen_rate",
                    self.stamina.regen_rate,
                    base.stamina.regen_rate,
                    0.0,
                    UNBOUNDED,
                ),
                regen_delay: check(
                    "stamina.regen_delay",
                    self.stamina.regen_delay,
                    base.stamina.regen_delay,
                    0.0,
                    UNBOUNDED,
                ),
            },
            costs: StaminaCosts {
                jump: check("costs.jump", self.costs.jump, base.costs.jump, 0.0, UNBOUNDED),
                dash: check("costs.dash", self.costs.dash, base.costs.dash, 0.0, UNBOUNDED),
                charge_start: check(
                    "costs.charge_start",
                    self.costs.charge_start,
                    base.costs.charge_start,
                    0.0,
                    UNBOUNDED,
                ),
                attack_base: check(
                    "costs.attack_base",
                    self.costs.attack_base,
                    base.costs.attack_base,
                    0.0,
                    UNBOUNDED,
                ),
                sprint_per_second: check(
                    "costs.sprint_per_second",
                    self.costs.sprint_per_second,
                    base.costs.sprint_per_second,
                    0.0,
                    UNBOUNDED,
                ),
            },
            dash: DashSettings {
                speed: check("dash.speed", self.dash.speed, base.dash.speed, 0.0, UNBOUNDED),
                duration: check(
                    "dash.duration",
                    self.dash.duration,
                    base.dash.duration,
                    0.0,
                    UNBOUNDED,
                ),
                cooldown: check(
                    "dash.cooldown",
                    self.dash.cooldown,
                    base.dash.cooldown,
                    0.0,
                    UNBOUNDED,
                ),
            },
        }
    }
}

/// Tracks sprint, dash and ground state between ticks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovementState {
    pub sprint_was_held: bool,
    pub sprint_hold_time: f32,
    pub sprinting: bool,
    pub dashing: bool,
    pub dash_timer: f32,
    pub dash_cooldown: f32,
    /// Unit planar direction of the active dash.
    pub dash_direction: Vec2,
}

/// The controlled entity.
#[derive(Debug, Clone)]
pub struct Player {
    pub body: CombatEntity,
    pub stamina: StaminaPool,
    pub movement: MovementState,
    pub weapon: Option<WeaponState>,
    /// Facing around Y; 0 faces +Z.
    pub yaw: f32,
    pub respawn_point: Vec3,
    pub config: PlayerConfig,
}

impl Player {
    pub fn new(config: PlayerConfig, position: Vec3, yaw: f32) -> Self {
        let body = CombatEntity::new(config.max_hp, config.max_poise, config.radius, position)
            .with_stun(config.stun_duration, config.knockback_damping);
        Self {
            body,
            stamina: StaminaPool::new(config.stamina),
            movement: MovementState::default(),
            weapon: None,
            yaw,
            respawn_point: position,
            config,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.body.alive
    }

    /// Replace the weapon with fresh state. Any charge or swing in flight on
    /// the old weapon is dropped.
    pub fn equip(&mut self, kind: WeaponKind, stats: WeaponStats) {
        self.weapon = Some(WeaponState::new(kind, stats));
    }

    pub fn unequip(&mut self) -> Option<WeaponKind> {
        self.weapon.take().map(|weapon| weapon.kind())
    }

    pub fn charge_ratio(&self) -> f32 {
        self.weapon
            .as_ref()
            .map(|weapon| weapon.charge_ratio)
            .unwrap_or(0.0)
    }

    /// Start charging if the weapon allows it and the stamina is there.
    pub fn begin_charge(&mut self) -> bool {
        if !self.body.alive || self.body.stunned {
            return false;
        }
        let Some(weapon) = self.weapon.as_mut() else {
            return false;
        };
        if !weapon.can_start_charge() {
            return false;
        }
        if !self.stamina.try_consume(self.config.costs.charge_start) {
            return false;
        }
        weapon.start_charge()
    }

    /// Charge for a released swing. A short pool does not undo the swing.
    pub fn pay_for_swing(&mut self, ratio: f32) -> bool {
        self.stamina.try_consume(self.config.costs.attack(ratio))
    }

    /// Put the player back at `position` with full hp, poise and stamina and
    /// a fresh copy of the equipped weapon.
    /// Full hp, poise and stamina where the player stands. The weapon keeps
    /// its state.
    pub fn rest(&mut self) {
        let position = self.body.position;
        self.body.restore(position);
        self.stamina.refill();
    }

    pub fn respawn_at(&mut self, position: Vec3) {
        self.body.restore(position);
        self.stamina.refill();
        self.movement = MovementState::default();
        if let Some(weapon) = self.weapon.as_mut() {
            *weapon = WeaponState::new(weapon.kind(), *weapon.stats());
        }
    }
}

impl Damageable for Player {
    fn combatant(&self) -> Combatant {
        Combatant::Player
    }

    fn body(&self) -> &CombatEntity {
        &self.body
    }

    fn body_mut(&mut self) -> &mut CombatEntity {
        &mut self.body
    }
}

impl Stunnable for Player {
    fn on_hit(&mut self, poise_damage: f32, knockback_dir: Option<Vec3>, knockback_power: f32) -> bool {
        let stunned = self
            .body
            .apply_poise_damage(poise_damage, knockback_dir, knockback_power);
        if stunned {
            if let Some(weapon) = self.weapon.as_mut() {
                weapon.cancel_charge();
            }
            self.movement.dashing = false;
        }
        stunned
    }
}
