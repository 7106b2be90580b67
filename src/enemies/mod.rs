//! Enemies module - archetypes, AI, and the active roster.

mod ai;
mod components;
pub mod data;
mod plugin;
mod roster;

pub use ai::{update_enemy, AiEnvironment};
pub use components::*;
pub use data::EnemyRegistry;
pub use plugin::EnemyPlugin;
pub use roster::EnemyRoster;
