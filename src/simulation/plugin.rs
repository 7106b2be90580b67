//! Simulation plugin - builds the simulation after loading and drives it
//! once per frame.

use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;

use super::archetypes::Archetypes;
use super::context::Simulation;
use crate::combat::{Combatant, WeaponKind, WeaponRegistry};
use crate::core::*;
use crate::enemies::EnemyRegistry;
use crate::player::{PlayerConfig, PlayerIntent};
use crate::world::{CollisionConfig, CurrentLevel, LevelRegistry};

/// Run-level settings, read from `simulation.ron`.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Seed for enemy attack jitter.
    pub seed: u64,
    /// Weapon key the player starts with. `None` starts unarmed.
    pub starting_weapon: Option<String>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            starting_weapon: Some(WeaponKind::BrokenSword.key().to_string()),
        }
    }
}

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulationSettings>()
            .add_systems(
                Startup,
                (
                    load_simulation_settings.in_set(LoadSet::Definitions),
                    setup_simulation.in_set(LoadSet::Setup),
                ),
            )
            .add_systems(
                Update,
                finish_loading
                    .run_if(in_state(GameState::Loading).and(resource_exists::<Simulation>)),
            )
            .add_systems(
                Update,
                (
                    advance_simulation.run_if(in_state(GameState::InGame)),
                    publish_events,
                    enter_game_over.run_if(in_state(GameState::InGame)),
                    handle_respawn_requests.run_if(in_state(GameState::GameOver)),
                )
                    .chain()
                    .run_if(resource_exists::<Simulation>),
            );
    }
}

/// Read assets/data/simulation.ron, keeping the defaults when it is missing.
pub fn load_simulation_settings(mut settings: ResMut<SimulationSettings>) {
    let path = Path::new(DATA_ROOT).join("simulation.ron");

    match read_ron_file::<SimulationSettings>(&path) {
        Ok(loaded) => {
            *settings = loaded;
            info!("Loaded simulation settings from {:?}", path);
        }
        Err(e) => warn!("{}, using default simulation settings", e),
    }
}

/// Resolve every registry into runtime tables and build the simulation.
#[allow(clippy::too_many_arguments)]
pub fn setup_simulation(
    mut commands: Commands,
    settings: Res<SimulationSettings>,
    weapons: Res<WeaponRegistry>,
    enemies: Res<EnemyRegistry>,
    levels: Res<LevelRegistry>,
    current_level: Res<CurrentLevel>,
    player_config: Res<PlayerConfig>,
    collision: Res<CollisionConfig>,
) {
    let level = levels.layout_or_builtin(&current_level.name);
    info!("Building level: {}", level.name);

    let mut simulation = Simulation::new(
        level,
        Archetypes::from_registries(&weapons, &enemies),
        player_config.clone(),
        *collision,
        settings.seed,
    );

    if let Some(key) = settings.starting_weapon.as_deref() {
        match WeaponKind::from_key(key) {
            Some(kind) => simulation.equip_weapon(kind),
            None => warn!("Unknown starting weapon '{}', starting unarmed", key),
        }
    }

    info!(
        "Simulation ready: {} enemies, seed {}",
        simulation.roster.len(),
        settings.seed
    );
    commands.insert_resource(simulation);
}

fn finish_loading(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::InGame);
}

/// Advance the simulation by the frame time and consume the intent's
/// one-shot flags.
pub fn advance_simulation(
    time: Res<Time>,
    mut simulation: ResMut<Simulation>,
    mut intent: ResMut<PlayerIntent>,
) {
    simulation.tick(time.delta_secs(), &intent);
    intent.clear_edges();
}

/// Forward everything the simulation reported as Bevy events.
pub fn publish_events(
    mut simulation: ResMut<Simulation>,
    mut damage: EventWriter<DamageDealtEvent>,
    mut deaths: EventWriter<DeathEvent>,
    mut stuns: EventWriter<StunnedEvent>,
    mut swings: EventWriter<SwingEvent>,
    mut heals: EventWriter<HealedEvent>,
    mut checkpoints: EventWriter<CheckpointEvent>,
    mut pickups: EventWriter<PickupEvent>,
) {
    if simulation.events.is_empty() {
        return;
    }

    for event in simulation.drain_events() {
        match event {
            CombatEvent::DamageDealt {
                attacker,
                target,
                amount,
            } => {
                damage.send(DamageDealtEvent {
                    attacker,
                    target,
                    amount,
                });
            }
            CombatEvent::Died {
                entity,
                killed_by,
                reward,
                position,
            } => {
                deaths.send(DeathEvent {
                    entity,
                    killed_by,
                    reward,
                    position,
                });
            }
            CombatEvent::Stunned { entity, knockback } => {
                stuns.send(StunnedEvent {
                    entity,
                    stunned: true,
                    knockback,
                });
            }
            CombatEvent::Recovered { entity } => {
                stuns.send(StunnedEvent {
                    entity,
                    stunned: false,
                    knockback: Vec2::ZERO,
                });
            }
            CombatEvent::SwingReleased { ratio, combo, hit } => {
                swings.send(SwingEvent { ratio, combo, hit });
            }
            CombatEvent::Healed { entity, amount } => {
                heals.send(HealedEvent { entity, amount });
            }
            CombatEvent::CheckpointActivated { index, position } => {
                checkpoints.send(CheckpointEvent { index, position });
            }
            CombatEvent::PickedUp { pickup } => {
                pickups.send(PickupEvent::Item(pickup));
            }
            CombatEvent::PointsRecovered { amount } => {
                pickups.send(PickupEvent::Points(amount));
            }
        }
    }
}

/// End the run when the player dies.
fn enter_game_over(
    mut deaths: EventReader<DeathEvent>,
    simulation: Res<Simulation>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let player_died = deaths
        .read()
        .any(|death| death.entity == Combatant::Player);

    if player_died || simulation.is_player_dead() {
        info!("Game over");
        next_state.set(GameState::GameOver);
    }
}

fn handle_respawn_requests(
    mut requests: EventReader<RespawnRequest>,
    mut simulation: ResMut<Simulation>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if requests.read().count() == 0 {
        return;
    }

    simulation.respawn();
    next_state.set(GameState::InGame);
}
