//! Simulation module - the context object that owns and advances the game.

mod archetypes;
mod context;
mod plugin;

pub use archetypes::Archetypes;
pub use context::Simulation;
pub use plugin::{advance_simulation, SimulationPlugin, SimulationSettings};
