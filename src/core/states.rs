//! Game state definitions that control the overall flow of the game.
//!
//! States determine which systems run at any given time. The simulation only
//! advances in `InGame`.

use bevy::prelude::*;

/// Main game states - controls overall game flow.
///
/// - Start in `Loading` while data files are read
/// - Enter `InGame` once the simulation exists
/// - `Paused` freezes the simulation clock
/// - `GameOver` when the player dies, until a respawn is requested
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Initial state - loading data files
    #[default]
    Loading,
    /// Active gameplay
    InGame,
    /// Game is paused
    Paused,
    /// Player has died
    GameOver,
}
