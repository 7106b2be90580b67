//! Moonlit Maze - the combat, AI and collision core of a first-person
//! dungeon action game, run headless on Bevy.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Game states, global events, data file helpers
//! - **Combat**: Weapons, hits, poise and stun, the damage pipeline, stamina
//! - **Enemies**: Archetypes, AI, the enemy roster
//! - **Player**: The controlled body, its intent, locomotion
//! - **Progression**: Points and rings
//! - **World**: Collision, levels, checkpoints, pickups
//! - **Simulation**: The context object that ties it all together
//!
//! Everything under [`simulation::Simulation`] is plain data and can be
//! driven without an `App`; the plugins only load data, call
//! `Simulation::tick` once per frame, and forward its events.

pub mod combat;
pub mod core;
pub mod enemies;
pub mod player;
pub mod progression;
pub mod simulation;
pub mod world;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

/// Main game plugin that adds all sub-plugins.
pub struct MoonlitMazePlugin;

impl Plugin for MoonlitMazePlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            // Data-backed definitions
            .add_plugins(combat::CombatPlugin)
            .add_plugins(enemies::EnemyPlugin)
            .add_plugins(player::PlayerPlugin)
            .add_plugins(world::WorldPlugin)

            // Drives everything above
            .add_plugins(simulation::SimulationPlugin);
    }
}

/// Fixed frame length of the headless app.
pub const HEADLESS_FRAME: Duration = Duration::from_micros(16_667);

/// A windowless app with the whole game installed. Every `update()`
/// advances time by [`HEADLESS_FRAME`].
///
/// `seed` replaces the one from `simulation.ron` so runs replay exactly.
pub fn create_headless_app(seed: Option<u64>) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin))
        .insert_resource(TimeUpdateStrategy::ManualDuration(HEADLESS_FRAME))
        .add_plugins(MoonlitMazePlugin);

    if let Some(seed) = seed {
        app.add_systems(
            Startup,
            (move |mut settings: ResMut<simulation::SimulationSettings>| settings.seed = seed)
                .after(core::LoadSet::Definitions)
                .before(core::LoadSet::Setup),
        );
    }

    app
}
