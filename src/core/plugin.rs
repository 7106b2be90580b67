//! Core plugin that sets up game states, events, and pause handling.

use bevy::prelude::*;

use super::events::*;
use super::states::*;

/// Startup ordering: every data file is read before the simulation is built.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum LoadSet {
    /// Weapon, enemy, player and level definitions.
    Definitions,
    /// Build the simulation from the loaded definitions.
    Setup,
}

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, InGame, Paused, GameOver)
/// - Global events forwarded from the simulation
/// - Pause toggling
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app
            // Initialize game states
            .init_state::<GameState>()
            .configure_sets(Startup, (LoadSet::Definitions, LoadSet::Setup).chain())

            // Register global events
            .add_event::<DamageDealtEvent>()
            .add_event::<DeathEvent>()
            .add_event::<StunnedEvent>()
            .add_event::<SwingEvent>()
            .add_event::<HealedEvent>()
            .add_event::<CheckpointEvent>()
            .add_event::<PickupEvent>()
            .add_event::<TogglePause>()
            .add_event::<RespawnRequest>()

            .add_systems(
                Update,
                handle_pause_requests
                    .run_if(in_state(GameState::InGame).or(in_state(GameState::Paused))),
            );
    }
}

/// Switch between InGame and Paused on request.
fn handle_pause_requests(
    mut requests: EventReader<TogglePause>,
    current_state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    // Two toggles in one frame cancel out.
    let toggles = requests.read().count();
    if toggles % 2 == 0 {
        return;
    }

    match current_state.get() {
        GameState::InGame => {
            info!("Game paused");
            next_state.set(GameState::Paused);
        }
        GameState::Paused => {
            info!("Game resumed");
            next_state.set(GameState::InGame);
        }
        _ => {}
    }
}
