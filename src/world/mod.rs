//! World module - static geometry, collision, levels, and interactables.

mod checkpoint;
mod collision;
pub mod data;
mod error;
mod pickups;
mod plugin;

pub use checkpoint::{Checkpoints, CHECKPOINT_RADIUS};
pub use collision::*;
pub use data::{CurrentLevel, EnemySpawn, LevelLayout, LevelRegistry, BUILTIN_LEVEL};
pub use error::DataLoadError;
pub use pickups::{nearest_pickup, Pickup, PickupKind, PICKUP_RADIUS};
pub use plugin::WorldPlugin;
