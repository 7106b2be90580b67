//! Moonlit Maze - headless runner.
//!
//! Plays a short scripted run against the loaded level and logs what
//! happens: the player walks to the nearest enemy, charges, and swings.
//! Dying requests a respawn.
//!
//! Usage: `moonlit-maze [frames] [seed]`

use bevy::log::LogPlugin;
use bevy::prelude::*;

use moonlit_maze::combat::{yaw_toward, WeaponPhase};
use moonlit_maze::core::{GameState, RespawnRequest};
use moonlit_maze::player::PlayerIntent;
use moonlit_maze::simulation::{advance_simulation, Simulation};

const DEFAULT_FRAMES: u32 = 60 * 60;

/// Swing when the enemy is this close.
const ENGAGE_DISTANCE: f32 = 2.5;

fn main() {
    let mut args = std::env::args().skip(1);
    let frames = args
        .next()
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(DEFAULT_FRAMES);
    let seed = args.next().and_then(|arg| arg.parse().ok());

    let mut app = moonlit_maze::create_headless_app(seed);
    app.add_plugins(LogPlugin::default())
        .add_systems(
            Update,
            scripted_player
                .before(advance_simulation)
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(
            Update,
            request_respawn.run_if(in_state(GameState::GameOver)),
        );

    for _ in 0..frames {
        app.update();
    }

    if let Some(simulation) = app.world().get_resource::<Simulation>() {
        info!(
            "Run finished after {:.1}s: hp {:.0}/{:.0}, points {}, {} enemies left",
            simulation.elapsed(),
            simulation.player.body.hp,
            simulation.player.body.max_hp,
            simulation.wallet.current,
            simulation.roster.alive_count()
        );
    }
}

/// Chase the nearest enemy and hit it with full charges.
fn scripted_player(simulation: Res<Simulation>, mut intent: ResMut<PlayerIntent>) {
    let player = &simulation.player;
    let position = player.body.position;

    let Some(target) = simulation
        .roster
        .iter()
        .filter(|enemy| enemy.is_alive())
        .map(|enemy| enemy.body.position)
        .min_by(|a, b| {
            a.distance_squared(position)
                .total_cmp(&b.distance_squared(position))
        })
    else {
        *intent = PlayerIntent::default();
        return;
    };

    let to_target = Vec2::new(target.x - position.x, target.z - position.z);
    let distance = to_target.length();
    intent.facing_yaw = Some(yaw_toward(position, target));
    intent.movement = if distance > ENGAGE_DISTANCE {
        to_target.normalize_or_zero()
    } else {
        Vec2::ZERO
    };

    let Some(weapon) = player.weapon.as_ref() else {
        return;
    };
    match weapon.phase {
        WeaponPhase::Idle if distance <= ENGAGE_DISTANCE => intent.charge_pressed = true,
        WeaponPhase::Charging if weapon.is_charge_full() => intent.charge_released = true,
        _ => {}
    }
}

fn request_respawn(mut requests: EventWriter<RespawnRequest>) {
    requests.send(RespawnRequest);
}
