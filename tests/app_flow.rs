//! App-level flow: loading, pausing, game over and respawn through the
//! plugins and Bevy events.

use bevy::prelude::*;
use moonlit_maze::core::{CheckpointEvent, GameState, RespawnRequest, TogglePause};
use moonlit_maze::create_headless_app;
use moonlit_maze::player::PlayerIntent;
use moonlit_maze::simulation::Simulation;

fn state(app: &App) -> GameState {
    *app.world().resource::<State<GameState>>().get()
}

fn elapsed(app: &App) -> f32 {
    app.world().resource::<Simulation>().elapsed()
}

fn started_app() -> App {
    let mut app = create_headless_app(Some(42));
    for _ in 0..3 {
        app.update();
    }
    assert_eq!(state(&app), GameState::InGame);
    app
}

#[test]
fn loading_builds_simulation_and_enters_game() {
    let app = started_app();
    let simulation = app.world().resource::<Simulation>();

    assert!(simulation.player.weapon.is_some());
    assert!(!simulation.roster.is_empty());
    assert!(simulation.player.is_alive());
}

#[test]
fn simulation_advances_only_while_in_game() {
    let mut app = started_app();
    for _ in 0..5 {
        app.update();
    }
    let running = elapsed(&app);
    assert!(running > 0.0);

    app.world_mut().send_event(TogglePause);
    app.update();
    app.update();
    assert_eq!(state(&app), GameState::Paused);

    let paused_at = elapsed(&app);
    for _ in 0..5 {
        app.update();
    }
    assert_eq!(elapsed(&app), paused_at);

    app.world_mut().send_event(TogglePause);
    app.update();
    app.update();
    assert_eq!(state(&app), GameState::InGame);
    app.update();
    assert!(elapsed(&app) > paused_at);
}

#[test]
fn player_death_ends_run_until_respawn() {
    let mut app = started_app();
    let start = app.world().resource::<Simulation>().player.respawn_point;

    app.world_mut()
        .resource_mut::<Simulation>()
        .set_player_state(0.0, 0.0, start, 0.0);
    app.update();
    app.update();
    assert_eq!(state(&app), GameState::GameOver);

    app.world_mut().send_event(RespawnRequest);
    app.update();
    app.update();
    assert_eq!(state(&app), GameState::InGame);

    let simulation = app.world().resource::<Simulation>();
    assert!(simulation.player.is_alive());
    assert_eq!(simulation.player.body.hp, simulation.player.body.max_hp);
    assert_eq!(simulation.player.body.position, start);
}

#[test]
fn interacting_at_start_activates_checkpoint() {
    let mut app = started_app();

    app.world_mut().resource_mut::<PlayerIntent>().interact = true;
    app.update();

    assert!(!app.world().resource::<PlayerIntent>().interact);

    let events = app.world().resource::<Events<CheckpointEvent>>();
    let mut cursor = events.get_cursor();
    let activated: Vec<usize> = cursor.read(events).map(|event| event.index).collect();
    assert_eq!(activated, vec![0]);

    let simulation = app.world().resource::<Simulation>();
    assert_eq!(simulation.checkpoints.active().map(|(index, _)| index), Some(0));
}
