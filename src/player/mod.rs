//! Player module - the controlled entity, its intent, and locomotion.

mod components;
mod movement;
mod plugin;

pub use components::*;
pub use movement::{advance_movement, try_jump, try_start_dash};
pub use plugin::PlayerPlugin;
