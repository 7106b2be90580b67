//! Enemy plugin - registers enemy data loading.

use bevy::prelude::*;

use super::data::{load_enemy_definitions, EnemyRegistry};
use crate::core::LoadSet;

/// Enemy plugin - loads archetype definitions at startup. The AI itself runs
/// inside the simulation tick.
pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EnemyRegistry>()
            .add_systems(Startup, load_enemy_definitions.in_set(LoadSet::Definitions));
    }
}
