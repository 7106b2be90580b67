//! Player plugin - player configuration and intent resources.

use bevy::prelude::*;
use std::path::Path;

use super::components::*;
use crate::core::{read_ron_file, LoadSet, DATA_ROOT};

/// Player plugin - loads `player.ron` and owns the per-frame intent.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerConfig>()
            .init_resource::<PlayerIntent>()
            .add_systems(Startup, load_player_config.in_set(LoadSet::Definitions));
    }
}

/// Read assets/data/player.ron, keeping the defaults when it is missing.
pub fn load_player_config(mut config: ResMut<PlayerConfig>) {
    let path = Path::new(DATA_ROOT).join("player.ron");

    match read_ron_file::<PlayerConfig>(&path) {
        Ok(loaded) => {
            *config = loaded.sanitized();
            info!("Loaded player config from {:?}", path);
        }
        Err(e) => warn!("{}, using default player config", e),
    }
}
