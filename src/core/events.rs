//! Global events used for cross-system communication.
//!
//! The simulation core pushes [`CombatEvent`]s into a plain [`CombatEvents`]
//! sink while it ticks. Once per frame the simulation plugin drains that sink
//! and re-sends each entry as one of the Bevy events below, so effects,
//! audio, UI and scoring can subscribe without touching the core.

use bevy::prelude::*;

use crate::combat::Combatant;
use crate::world::PickupKind;

/// Everything the core reports to the outside world during a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum CombatEvent {
    /// A hit removed a non-zero amount of hp.
    DamageDealt {
        attacker: Combatant,
        target: Combatant,
        amount: f32,
    },
    /// An entity's hp reached zero. Fired exactly once per entity life.
    Died {
        entity: Combatant,
        killed_by: Option<Combatant>,
        reward: u32,
        position: Vec3,
    },
    /// Poise broke and the entity entered the stunned state.
    Stunned {
        entity: Combatant,
        knockback: Vec2,
    },
    /// Stun expired and poise refilled.
    Recovered { entity: Combatant },
    /// The player released a charged swing.
    SwingReleased {
        ratio: f32,
        combo: bool,
        hit: Option<Combatant>,
    },
    /// A damage listener restored hp.
    Healed { entity: Combatant, amount: f32 },
    CheckpointActivated { index: usize, position: Vec3 },
    PickedUp { pickup: PickupKind },
    PointsRecovered { amount: u32 },
}

/// Typed event sink owned by the simulation.
#[derive(Debug, Default, Clone)]
pub struct CombatEvents {
    pending: Vec<CombatEvent>,
}

impl CombatEvents {
    pub fn push(&mut self, event: CombatEvent) {
        self.pending.push(event);
    }

    pub fn iter(&self) -> impl Iterator<Item = &CombatEvent> {
        self.pending.iter()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take every pending event, oldest first.
    pub fn drain(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.pending)
    }
}

/// Sent when a hit removes hp.
#[derive(Event, Debug, Clone)]
pub struct DamageDealtEvent {
    pub attacker: Combatant,
    pub target: Combatant,
    pub amount: f32,
}

/// Sent when an entity dies (health reaches 0).
///
/// Systems can listen for this to trigger death animations,
/// award points, or end the run.
#[derive(Event, Debug, Clone)]
pub struct DeathEvent {
    /// Entity that died
    pub entity: Combatant,
    /// Entity that killed them (if any)
    pub killed_by: Option<Combatant>,
    pub reward: u32,
    pub position: Vec3,
}

/// Sent when an entity's poise breaks, and again when it recovers.
#[derive(Event, Debug, Clone)]
pub struct StunnedEvent {
    pub entity: Combatant,
    /// `false` when this marks the end of the stun.
    pub stunned: bool,
    pub knockback: Vec2,
}

/// Sent when the player releases a swing.
#[derive(Event, Debug, Clone)]
pub struct SwingEvent {
    pub ratio: f32,
    pub combo: bool,
    pub hit: Option<Combatant>,
}

#[derive(Event, Debug, Clone)]
pub struct HealedEvent {
    pub entity: Combatant,
    pub amount: f32,
}

#[derive(Event, Debug, Clone)]
pub struct CheckpointEvent {
    pub index: usize,
    pub position: Vec3,
}

/// Sent when the player collects a pickup or recovers dropped points.
#[derive(Event, Debug, Clone)]
pub enum PickupEvent {
    Item(PickupKind),
    Points(u32),
}

/// Request to switch between `InGame` and `Paused`.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct TogglePause;

/// Request to respawn the player after death.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct RespawnRequest;
