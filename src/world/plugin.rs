//! World plugin - level data and collision tunables.

use bevy::prelude::*;
use std::path::Path;

use super::collision::CollisionConfig;
use super::data::{load_level_definitions, CurrentLevel, LevelRegistry};
use crate::core::{read_ron_file, LoadSet, DATA_ROOT};

/// World plugin - loads levels and the collision configuration.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LevelRegistry>()
            .init_resource::<CurrentLevel>()
            .init_resource::<CollisionConfig>()
            .add_systems(
                Startup,
                (load_level_definitions, load_collision_config).in_set(LoadSet::Definitions),
            );
    }
}

/// Read assets/data/collision.ron, keeping the defaults when it is missing.
pub fn load_collision_config(mut config: ResMut<CollisionConfig>) {
    let path = Path::new(DATA_ROOT).join("collision.ron");

    match read_ron_file::<CollisionConfig>(&path) {
        Ok(loaded) if loaded.gravity.is_finite() && loaded.step_tolerance >= 0.0 => {
            *config = loaded;
            info!("Loaded collision config from {:?}", path);
        }
        Ok(_) => warn!("Invalid values in {:?}, using default collision config", path),
        Err(e) => warn!("{}, using default collision config", e),
    }
}
