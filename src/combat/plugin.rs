//! Combat plugin - weapon definitions.

use bevy::prelude::*;

use super::data::{load_weapon_definitions, WeaponRegistry};
use crate::core::LoadSet;

/// Combat plugin - loads weapon archetypes at startup. Swings, hits and
/// damage resolve inside the simulation tick.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WeaponRegistry>()
            .add_systems(Startup, load_weapon_definitions.in_set(LoadSet::Definitions));
    }
}
