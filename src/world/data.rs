//! Level data structures and RON loading.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use super::collision::StaticObstacle;
use super::error::DataLoadError;
use super::pickups::{Pickup, PickupKind};
use crate::combat::WeaponKind;
use crate::core::{load_ron_directory, DATA_ROOT};
use crate::enemies::EnemyKind;
use crate::progression::RingId;

/// Name of the level used when nothing else is selected.
pub const BUILTIN_LEVEL: &str = "crypt";

// === Geometry Types ===

/// The kind of a solid block in the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum GeometryKind {
    Floor,
    Wall,
    Pillar,
    Platform,
    Void,
}

impl GeometryKind {
    /// Whether this kind produces a collision box.
    pub fn is_solid(&self) -> bool {
        matches!(
            self,
            GeometryKind::Wall | GeometryKind::Pillar | GeometryKind::Platform
        )
    }
}

/// Definition of a geometry tile in the palette.
#[derive(Debug, Clone, Deserialize)]
pub struct GeometryTileDef {
    pub kind: GeometryKind,
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub base_y: Option<f32>,
}

/// A box placed by hand, in world units.
#[derive(Debug, Clone, Deserialize)]
pub struct ObstacleDef {
    pub kind: GeometryKind,
    pub x: f32,
    pub z: f32,
    /// Full width, height and depth.
    pub size: (f32, f32, f32),
    #[serde(default)]
    pub base_y: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnemySpawnDef {
    /// Enemy type identifier (matches an `EnemyKind` key).
    pub enemy_type: String,
    pub x: f32,
    pub z: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub enum PickupItemDef {
    Weapon(String),
    Ring(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct PickupDef {
    pub item: PickupItemDef,
    pub x: f32,
    pub z: f32,
}

// === Level Definition ===

fn default_tile_size() -> f32 {
    2.0
}

fn default_wall_height() -> f32 {
    4.0
}

fn default_platform_height() -> f32 {
    1.0
}

/// Raw level definition as read from RON.
#[derive(Debug, Clone, Deserialize)]
pub struct LevelDefinitionRaw {
    pub name: String,
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,
    #[serde(default = "default_wall_height")]
    pub default_wall_height: f32,
    #[serde(default = "default_platform_height")]
    pub default_platform_height: f32,
    pub player_start: (f32, f32),
    #[serde(default)]
    pub player_yaw: f32,

    #[serde(default)]
    pub obstacles: Vec<ObstacleDef>,

    // Optional tile grid, one character per tile, origin at the world origin.
    #[serde(default)]
    pub geometry_palette: HashMap<char, GeometryTileDef>,
    #[serde(default)]
    pub geometry: Vec<String>,

    #[serde(default)]
    pub enemies: Vec<EnemySpawnDef>,
    #[serde(default)]
    pub checkpoints: Vec<(f32, f32)>,
    #[serde(default)]
    pub pickups: Vec<PickupDef>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemySpawn {
    pub kind: EnemyKind,
    pub position: Vec3,
}

/// Processed level, ready for the simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelLayout {
    pub name: String,
    pub player_start: Vec3,
    pub player_yaw: f32,
    pub obstacles: Vec<StaticObstacle>,
    pub enemy_spawns: Vec<EnemySpawn>,
    pub checkpoints: Vec<Vec3>,
    pub pickups: Vec<Pickup>,
}

impl LevelLayout {
    /// Create from a raw definition, turning the grid into boxes.
    ///
    /// Malformed grids fail the whole level. Spawns and pickups naming
    /// unknown archetypes are skipped with a warning.
    pub fn from_raw(raw: LevelDefinitionRaw) -> Result<Self, DataLoadError> {
        let mut obstacles: Vec<StaticObstacle> = raw
            .obstacles
            .iter()
            .filter_map(|def| {
                if !def.kind.is_solid() {
                    warn!("{}: obstacle of kind {:?} ignored", raw.name, def.kind);
                    return None;
                }
                let (w, h, d) = def.size;
                Some(StaticObstacle::standing(
                    def.x,
                    def.z,
                    Vec3::new(w, h, d),
                    def.base_y.unwrap_or(0.0),
                ))
            })
            .collect();

        obstacles.extend(grid_obstacles(&raw)?);

        let enemy_spawns = raw
            .enemies
            .iter()
            .filter_map(|def| match resolve_enemy_type(&def.enemy_type) {
                Ok(kind) => Some(EnemySpawn {
                    kind,
                    position: Vec3::new(def.x, 0.0, def.z),
                }),
                Err(e) => {
                    warn!("{}: {}, spawn skipped", raw.name, e);
                    None
                }
            })
            .collect();

        let pickups = raw
            .pickups
            .iter()
            .filter_map(|def| {
                let kind = match &def.item {
                    PickupItemDef::Weapon(key) => WeaponKind::from_key(key).map(PickupKind::Weapon),
                    PickupItemDef::Ring(key) => RingId::from_key(key).map(PickupKind::Ring),
                };
                if kind.is_none() {
                    warn!("{}: unknown pickup {:?}, skipped", raw.name, def.item);
                }
                kind.map(|kind| Pickup::new(kind, Vec3::new(def.x, 0.0, def.z)))
            })
            .collect();

        Ok(Self {
            player_start: Vec3::new(raw.player_start.0, 0.0, raw.player_start.1),
            player_yaw: raw.player_yaw,
            obstacles,
            enemy_spawns,
            checkpoints: raw
                .checkpoints
                .iter()
                .map(|&(x, z)| Vec3::new(x, 0.0, z))
                .collect(),
            pickups,
            name: raw.name,
        })
    }

    /// Small walled crypt used when no level files are present.
    pub fn builtin() -> Self {
        let wall = |x: f32, z: f32, w: f32, d: f32| {
            StaticObstacle::standing(x, z, Vec3::new(w, 4.0, d), 0.0)
        };

        Self {
            name: BUILTIN_LEVEL.to_string(),
            player_start: Vec3::ZERO,
            player_yaw: 0.0,
            obstacles: vec![
                wall(0.0, 13.0, 26.0, 2.0),
                wall(0.0, -13.0, 26.0, 2.0),
                wall(13.0, 0.0, 2.0, 26.0),
                wall(-13.0, 0.0, 2.0, 26.0),
                wall(6.0, 4.0, 1.0, 1.0),
                StaticObstacle::standing(-6.0, 6.0, Vec3::new(3.0, 1.0, 3.0), 0.0),
            ],
            enemy_spawns: vec![
                EnemySpawn {
                    kind: EnemyKind::Husk,
                    position: Vec3::new(0.0, 0.0, 8.0),
                },
                EnemySpawn {
                    kind: EnemyKind::Spearman,
                    position: Vec3::new(7.0, 0.0, 9.0),
                },
                EnemySpawn {
                    kind: EnemyKind::Warden,
                    position: Vec3::new(0.0, 0.0, 11.0),
                },
            ],
            checkpoints: vec![Vec3::new(0.0, 0.0, -3.0)],
            pickups: vec![
                Pickup::new(PickupKind::Weapon(WeaponKind::LongSword), Vec3::new(3.0, 0.0, -2.0)),
                Pickup::new(PickupKind::Ring(RingId::Mystic), Vec3::new(-3.0, 0.0, -2.0)),
            ],
        }
    }
}

/// Look up an enemy archetype by its data key.
pub fn resolve_enemy_type(name: &str) -> Result<EnemyKind, DataLoadError> {
    EnemyKind::from_key(name).ok_or_else(|| DataLoadError::UnknownEnemyType {
        name: name.to_string(),
    })
}

fn grid_obstacles(raw: &LevelDefinitionRaw) -> Result<Vec<StaticObstacle>, DataLoadError> {
    let height = raw.geometry.len();
    let width = raw
        .geometry
        .first()
        .map(|row| row.chars().count())
        .unwrap_or(0);
    let tile = raw.tile_size;

    let mut obstacles = Vec::new();
    for (z, row) in raw.geometry.iter().enumerate() {
        let row_width = row.chars().count();
        if row_width != width {
            return Err(DataLoadError::GridMismatch {
                expected_width: width,
                expected_height: height,
                actual_width: row_width,
                actual_height: height,
            });
        }

        for (x, c) in row.chars().enumerate() {
            if c == '.' || c == ' ' {
                continue;
            }
            let Some(def) = raw.geometry_palette.get(&c) else {
                return Err(DataLoadError::UnknownPaletteEntry { character: c, x, z });
            };

            let center_x = x as f32 * tile + tile / 2.0;
            let center_z = z as f32 * tile + tile / 2.0;
            let base_y = def.base_y.unwrap_or(0.0);
            let size = match def.kind {
                GeometryKind::Wall => {
                    Vec3::new(tile, def.height.unwrap_or(raw.default_wall_height), tile)
                }
                GeometryKind::Pillar => Vec3::new(
                    tile * 0.5,
                    def.height.unwrap_or(raw.default_wall_height),
                    tile * 0.5,
                ),
                GeometryKind::Platform => Vec3::new(
                    tile,
                    def.height.unwrap_or(raw.default_platform_height),
                    tile,
                ),
                GeometryKind::Floor | GeometryKind::Void => continue,
            };
            obstacles.push(StaticObstacle::standing(center_x, center_z, size, base_y));
        }
    }

    Ok(obstacles)
}

/// Resource storing all loaded levels.
#[derive(Resource, Default)]
pub struct LevelRegistry {
    pub levels: HashMap<String, LevelLayout>,
}

impl LevelRegistry {
    /// Get a level by name.
    pub fn get(&self, name: &str) -> Option<&LevelLayout> {
        self.levels.get(name)
    }

    /// The named level, or the built-in one when it was never loaded.
    pub fn layout_or_builtin(&self, name: &str) -> LevelLayout {
        match self.get(name) {
            Some(level) => level.clone(),
            None => {
                warn!("Level '{}' not found, using built-in level", name);
                LevelLayout::builtin()
            }
        }
    }
}

/// Resource indicating which level to load.
#[derive(Resource)]
pub struct CurrentLevel {
    pub name: String,
}

impl Default for CurrentLevel {
    fn default() -> Self {
        Self {
            name: BUILTIN_LEVEL.to_string(),
        }
    }
}

/// Load all level definitions from assets/data/levels/.
pub fn load_level_definitions(mut registry: ResMut<LevelRegistry>) {
    let levels_dir = Path::new(DATA_ROOT).join("levels");

    match load_ron_directory::<LevelDefinitionRaw>(&levels_dir) {
        Ok(levels) => {
            for (stem, raw) in levels {
                let level_name = stem.strip_suffix(".level").unwrap_or(&stem).to_string();
                match LevelLayout::from_raw(raw) {
                    Ok(level) => {
                        info!(
                            "Loaded level: {} ({} obstacles, {} spawns)",
                            level_name,
                            level.obstacles.len(),
                            level.enemy_spawns.len()
                        );
                        registry.levels.insert(level_name, level);
                    }
                    Err(e) => error!("Failed to process level '{}': {}", level_name, e),
                }
            }
        }
        Err(e) => warn!("{}, using built-in level", e),
    }

    info!("Loaded {} levels", registry.levels.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> LevelDefinitionRaw {
        ron::from_str(source).expect("valid level ron")
    }

    #[test]
    fn grid_and_list_become_boxes() {
        let raw = parse(
            r##"#![enable(implicit_some)]
            (
                name: "test",
                player_start: (1.0, 1.0),
                obstacles: [
                    (kind: Platform, x: 10.0, z: 0.0, size: (2.0, 1.0, 2.0), base_y: 0.5),
                ],
                geometry_palette: {
                    '#': (kind: Wall),
                    'o': (kind: Pillar, height: 3.0),
                },
                geometry: [
                    "#o",
                    "..",
                ],
                enemies: [
                    (enemy_type: "spearman", x: 3.0, z: 4.0),
                    (enemy_type: "dragon", x: 0.0, z: 0.0),
                ],
                checkpoints: [(0.0, -2.0)],
                pickups: [
                    (item: Weapon("scythe"), x: 1.0, z: 1.0),
                    (item: Ring("mystic"), x: 2.0, z: 1.0),
                    (item: Ring("bogus"), x: 2.0, z: 1.0),
                ],
            )"##,
        );

        let level = LevelLayout::from_raw(raw).expect("level resolves");
        assert_eq!(level.obstacles.len(), 3);

        let platform = level.obstacles[0];
        assert_eq!(platform.bottom(), 0.5);
        assert_eq!(platform.top(), 1.5);

        let wall = level.obstacles[1];
        assert_eq!(wall.center.x, 1.0);
        assert_eq!(wall.center.z, 1.0);
        assert_eq!(wall.top(), 4.0);

        let pillar = level.obstacles[2];
        assert_eq!(pillar.center.x, 3.0);
        assert_eq!(pillar.half_extent.x, 0.5);
        assert_eq!(pillar.top(), 3.0);

        assert_eq!(level.enemy_spawns.len(), 1);
        assert_eq!(level.enemy_spawns[0].kind, EnemyKind::Spearman);
        assert_eq!(level.checkpoints, vec![Vec3::new(0.0, 0.0, -2.0)]);
        assert_eq!(level.pickups.len(), 2);
        assert_eq!(level.pickups[0].kind, PickupKind::Weapon(WeaponKind::Scythe));
    }

    #[test]
    fn ragged_grid_is_rejected() {
        let raw = parse(
            r###"(
                name: "ragged",
                player_start: (0.0, 0.0),
                geometry_palette: { '#': (kind: Wall) },
                geometry: ["##", "#"],
            )"###,
        );
        assert!(matches!(
            LevelLayout::from_raw(raw),
            Err(DataLoadError::GridMismatch { actual_width: 1, .. })
        ));
    }

    #[test]
    fn unknown_palette_character_is_rejected() {
        let raw = parse(
            r#"(
                name: "typo",
                player_start: (0.0, 0.0),
                geometry: [".X"],
            )"#,
        );
        assert!(matches!(
            LevelLayout::from_raw(raw),
            Err(DataLoadError::UnknownPaletteEntry { character: 'X', x: 1, z: 0 })
        ));
    }

    #[test]
    fn unknown_enemy_type_error() {
        assert_eq!(resolve_enemy_type("warden").ok(), Some(EnemyKind::Warden));
        assert!(matches!(
            resolve_enemy_type("slime"),
            Err(DataLoadError::UnknownEnemyType { .. })
        ));
    }

    #[test]
    fn builtin_level_is_populated() {
        let level = LevelLayout::builtin();
        assert_eq!(level.name, BUILTIN_LEVEL);
        assert_eq!(level.enemy_spawns.len(), 3);
        assert!(!level.checkpoints.is_empty());
        assert!(level.obstacles.iter().all(|o| !o.overlaps_footprint(level.player_start, 0.5)));
    }
}
