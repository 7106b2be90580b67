//! Weapon archetypes and the charge / swing state machine.
//!
//! A swing is charged by holding the attack input and resolves its hit at the
//! instant of release. The slash that follows is purely a timing window: it
//! locks movement until the recovery tail and blocks a new charge until the
//! cooldown has run out.
//!
//! Two consecutive swings form a combo when the second charge starts within
//! `combo_window` of the first swing ending. The flag is decided at charge
//! start, so a long hold still releases the branch that was chosen then, and
//! a combo swing never chains into another combo.

use bevy::prelude::*;

use super::components::{CombatEntity, DURATION_EPSILON};
use super::damage::Hit;
use super::hit::find_swing_target;

/// Closed set of weapon archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WeaponKind {
    BrokenSword,
    LongSword,
    Scythe,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 3] = [Self::BrokenSword, Self::LongSword, Self::Scythe];

    /// Key used in data files.
    pub fn key(self) -> &'static str {
        match self {
            Self::BrokenSword => "broken_sword",
            Self::LongSword => "long_sword",
            Self::Scythe => "scythe",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    /// Stats used when no data file overrides them.
    pub fn builtin_stats(self) -> WeaponStats {
        match self {
            Self::BrokenSword => WeaponStats::default(),
            Self::LongSword => WeaponStats {
                base_damage: 14.0,
                max_range: 4.2,
                cooldown_time: 0.5,
                attack_duration: 0.4,
                windup_fraction: 0.28,
                recovery_fraction: 0.22,
                charge_time_max: 0.8,
                charge_damage_mul: 2.3,
                charge_poise_mul: 2.6,
                min_charge_ratio: 0.0,
                combo_window: 0.8 + COMBO_GRACE,
                base_poise_damage: 32.0,
                base_knockback: 7.0,
                charge_move_speed_mul: 0.55,
            },
            Self::Scythe => WeaponStats {
                base_damage: 18.0,
                max_range: 4.8,
                cooldown_time: 0.7,
                attack_duration: 0.55,
                windup_fraction: 0.35,
                recovery_fraction: 0.22,
                charge_time_max: 1.2,
                charge_damage_mul: 3.0,
                charge_poise_mul: 3.2,
                min_charge_ratio: 0.1,
                combo_window: 1.2 + COMBO_GRACE,
                base_poise_damage: 45.0,
                base_knockback: 9.0,
                charge_move_speed_mul: 0.35,
            },
        }
    }
}

/// Added to `charge_time_max` when a weapon does not set its combo window.
pub const COMBO_GRACE: f32 = 0.6;

/// Immutable per-archetype weapon numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponStats {
    pub base_damage: f32,
    pub max_range: f32,
    pub cooldown_time: f32,
    pub attack_duration: f32,
    /// Share of the swing spent winding up. Charging already covers it.
    pub windup_fraction: f32,
    /// Share at the end of the swing during which movement is allowed again.
    pub recovery_fraction: f32,
    pub charge_time_max: f32,
    pub charge_damage_mul: f32,
    pub charge_poise_mul: f32,
    pub min_charge_ratio: f32,
    pub combo_window: f32,
    pub base_poise_damage: f32,
    pub base_knockback: f32,
    pub charge_move_speed_mul: f32,
}

impl Default for WeaponStats {
    fn default() -> Self {
        Self {
            base_damage: 10.0,
            max_range: 3.5,
            cooldown_time: 0.45,
            attack_duration: 0.35,
            windup_fraction: 0.25,
            recovery_fraction: 0.2,
            charge_time_max: 0.7,
            charge_damage_mul: 2.2,
            charge_poise_mul: 2.5,
            min_charge_ratio: 0.0,
            combo_window: 0.7 + COMBO_GRACE,
            base_poise_damage: 15.0,
            base_knockback: 6.0,
            charge_move_speed_mul: 0.4,
        }
    }
}

impl WeaponStats {
    pub fn damage_multiplier(&self, ratio: f32) -> f32 {
        1.0 + ratio * (self.charge_damage_mul - 1.0)
    }

    pub fn poise_multiplier(&self, ratio: f32) -> f32 {
        1.0 + ratio * (self.charge_poise_mul - 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeaponPhase {
    #[default]
    Idle,
    Charging,
    Swinging,
    CoolingDown,
}

/// A swing that connected, ready for the damage pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strike<K> {
    pub target: K,
    pub hit: Hit,
}

/// Result of [`WeaponState::release`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReleaseOutcome<K> {
    pub attacked: bool,
    pub ratio_used: f32,
    pub combo: bool,
    pub strike: Option<Strike<K>>,
}

impl<K> Default for ReleaseOutcome<K> {
    fn default() -> Self {
        Self {
            attacked: false,
            ratio_used: 0.0,
            combo: false,
            strike: None,
        }
    }
}

/// Runtime state of the equipped weapon. Created on equip, dropped on
/// unequip.
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponState {
    kind: WeaponKind,
    stats: WeaponStats,
    pub phase: WeaponPhase,
    pub charge_elapsed: f32,
    pub charge_ratio: f32,
    pub attack_cooldown_remaining: f32,
    /// Time left in the current slash.
    pub swing_remaining: f32,
    /// Starts just outside the combo window so a fresh weapon opens with a
    /// normal swing.
    pub time_since_last_swing_end: f32,
    pub pending_combo: bool,
    pub last_attack_was_combo: bool,
    active_combo: bool,
}

impl WeaponState {
    pub fn new(kind: WeaponKind, stats: WeaponStats) -> Self {
        Self {
            kind,
            stats,
            phase: WeaponPhase::Idle,
            charge_elapsed: 0.0,
            charge_ratio: 0.0,
            attack_cooldown_remaining: 0.0,
            swing_remaining: 0.0,
            time_since_last_swing_end: stats.combo_window.max(0.0) + 1.0,
            pending_combo: false,
            last_attack_was_combo: false,
            active_combo: false,
        }
    }

    pub fn kind(&self) -> WeaponKind {
        self.kind
    }

    pub fn stats(&self) -> &WeaponStats {
        &self.stats
    }

    pub fn tick(&mut self, dt: f32) {
        if self.attack_cooldown_remaining > 0.0 {
            self.attack_cooldown_remaining = (self.attack_cooldown_remaining - dt).max(0.0);
        }

        if self.phase == WeaponPhase::Swinging {
            self.time_since_last_swing_end = 0.0;
        } else {
            self.time_since_last_swing_end += dt;
        }

        match self.phase {
            WeaponPhase::Charging => {
                self.charge_elapsed += dt;
                let ratio =
                    (self.charge_elapsed / self.stats.charge_time_max.max(DURATION_EPSILON))
                        .clamp(0.0, 1.0);
                self.charge_ratio = self.charge_ratio.max(ratio);
            }
            WeaponPhase::Swinging => {
                self.swing_remaining -= dt;
                if self.swing_remaining <= 0.0 {
                    self.swing_remaining = 0.0;
                    self.active_combo = false;
                    self.phase = if self.attack_cooldown_remaining > 0.0 {
                        WeaponPhase::CoolingDown
                    } else {
                        WeaponPhase::Idle
                    };
                }
            }
            WeaponPhase::CoolingDown => {
                if self.attack_cooldown_remaining <= 0.0 {
                    self.phase = WeaponPhase::Idle;
                }
            }
            WeaponPhase::Idle => {}
        }
    }

    pub fn can_start_charge(&self) -> bool {
        self.attack_cooldown_remaining <= 0.0
            && !matches!(self.phase, WeaponPhase::Swinging | WeaponPhase::Charging)
    }

    /// Begin charging. Returns `false` (and changes nothing) when refused.
    pub fn start_charge(&mut self) -> bool {
        if !self.can_start_charge() {
            return false;
        }
        self.phase = WeaponPhase::Charging;
        self.charge_elapsed = 0.0;
        self.charge_ratio = 0.0;
        self.pending_combo = !self.last_attack_was_combo
            && self.time_since_last_swing_end <= self.stats.combo_window;
        true
    }

    /// Release the charge and resolve the hit immediately.
    ///
    /// `candidates` pairs a caller-chosen key with each body that could be
    /// hit. The nearest living body on the facing ray within range is struck.
    pub fn release<'a, K, I>(&mut self, origin: Vec3, yaw: f32, candidates: I) -> ReleaseOutcome<K>
    where
        I: IntoIterator<Item = (K, &'a CombatEntity)>,
    {
        if self.phase != WeaponPhase::Charging {
            return ReleaseOutcome::default();
        }

        let ratio = self
            .charge_ratio
            .max(self.stats.min_charge_ratio)
            .clamp(0.0, 1.0);
        let combo = self.pending_combo;
        self.last_attack_was_combo = combo;
        self.active_combo = combo;
        self.pending_combo = false;

        self.phase = WeaponPhase::Swinging;
        self.swing_remaining =
            self.stats.attack_duration.max(0.0) * (1.0 - self.stats.windup_fraction.clamp(0.0, 1.0));
        self.attack_cooldown_remaining = self.stats.cooldown_time.max(0.0);

        let poise_mul = self.stats.poise_multiplier(ratio);
        let strike = find_swing_target(
            origin,
            yaw,
            self.stats.max_range,
            candidates
                .into_iter()
                .map(|(key, body)| ((key, body.position), body)),
        )
        .map(|(target, position)| {
            let mut direction = position - origin;
            direction.y = 0.0;
            Strike {
                target,
                hit: Hit {
                    damage: self.stats.base_damage * self.stats.damage_multiplier(ratio),
                    poise_damage: self.stats.base_poise_damage * poise_mul,
                    knockback_dir: Some(direction),
                    knockback_power: self.stats.base_knockback * poise_mul,
                },
            }
        });

        ReleaseOutcome {
            attacked: true,
            ratio_used: ratio,
            combo,
            strike,
        }
    }

    /// Uncharged attack: start and release in one call.
    pub fn try_attack<'a, K, I>(&mut self, origin: Vec3, yaw: f32, candidates: I) -> ReleaseOutcome<K>
    where
        I: IntoIterator<Item = (K, &'a CombatEntity)>,
    {
        if !self.start_charge() {
            return ReleaseOutcome::default();
        }
        self.release(origin, yaw, candidates)
    }

    /// Drop an in-progress charge without attacking. Swings cannot be
    /// cancelled.
    pub fn cancel_charge(&mut self) {
        if self.phase != WeaponPhase::Charging {
            return;
        }
        self.phase = WeaponPhase::Idle;
        self.charge_elapsed = 0.0;
        self.charge_ratio = 0.0;
        self.pending_combo = false;
    }

    pub fn can_move(&self) -> bool {
        if self.phase != WeaponPhase::Swinging {
            return true;
        }
        let t = 1.0 - self.swing_remaining / self.stats.attack_duration.max(DURATION_EPSILON);
        t >= 1.0 - self.stats.recovery_fraction
    }

    pub fn move_speed_multiplier(&self) -> f32 {
        if self.phase == WeaponPhase::Charging {
            self.stats.charge_move_speed_mul
        } else {
            1.0
        }
    }

    pub fn is_charging(&self) -> bool {
        self.phase == WeaponPhase::Charging
    }

    pub fn is_charge_full(&self) -> bool {
        self.is_charging() && self.charge_ratio >= 0.999
    }

    /// Whether the swing in progress is the second hit of a combo.
    pub fn active_combo(&self) -> bool {
        self.active_combo
    }
}
