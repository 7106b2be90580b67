//! Headless combat scenarios driven through `Simulation::tick`.

use bevy::prelude::*;
use moonlit_maze::combat::{Combatant, WeaponKind, WeaponPhase};
use moonlit_maze::core::CombatEvent;
use moonlit_maze::enemies::EnemyKind;
use moonlit_maze::player::{PlayerConfig, PlayerIntent};
use moonlit_maze::progression::RingId;
use moonlit_maze::simulation::{Archetypes, Simulation};
use moonlit_maze::world::{CollisionConfig, EnemySpawn, LevelLayout};

const DT: f32 = 0.05;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

/// Open floor, player at the origin facing +Z with the broken sword.
fn arena(enemy_spawns: Vec<EnemySpawn>) -> Simulation {
    let level = LevelLayout {
        name: "arena".to_string(),
        player_start: Vec3::ZERO,
        player_yaw: 0.0,
        obstacles: Vec::new(),
        enemy_spawns,
        checkpoints: Vec::new(),
        pickups: Vec::new(),
    };
    let mut sim = Simulation::new(
        level,
        Archetypes::builtin(),
        PlayerConfig::default(),
        CollisionConfig::default(),
        7,
    );
    sim.equip_weapon(WeaponKind::BrokenSword);
    sim
}

fn husk_at(z: f32) -> EnemySpawn {
    EnemySpawn {
        kind: EnemyKind::Husk,
        position: Vec3::new(0.0, 0.0, z),
    }
}

fn idle() -> PlayerIntent {
    PlayerIntent::default()
}

fn press() -> PlayerIntent {
    PlayerIntent {
        charge_pressed: true,
        ..default()
    }
}

fn release() -> PlayerIntent {
    PlayerIntent {
        charge_released: true,
        ..default()
    }
}

fn interact() -> PlayerIntent {
    PlayerIntent {
        interact: true,
        ..default()
    }
}

/// Press, hold for `hold` seconds, release.
fn charged_swing(sim: &mut Simulation, hold: f32) {
    sim.tick(DT, &press());
    let ticks = (hold / DT).round() as usize;
    for _ in 0..ticks {
        sim.tick(DT, &idle());
    }
    sim.tick(DT, &release());
}

fn swings(events: &[CombatEvent]) -> Vec<(f32, bool, Option<Combatant>)> {
    events
        .iter()
        .filter_map(|event| match event {
            CombatEvent::SwingReleased { ratio, combo, hit } => Some((*ratio, *combo, *hit)),
            _ => None,
        })
        .collect()
}

#[test]
fn full_charge_stuns_husk_on_release() {
    let mut sim = arena(vec![husk_at(2.0)]);
    let husk = sim.roster.iter().next().map(|enemy| enemy.id).expect("husk spawned");

    charged_swing(&mut sim, 1.0);

    let enemy = sim.roster.get(husk).expect("husk survives");
    assert!(approx(enemy.body.hp, 28.0), "hp was {}", enemy.body.hp);
    assert!(enemy.body.stunned);

    let events = sim.drain_events();
    let released = swings(&events);
    assert_eq!(released.len(), 1);
    assert_eq!(released[0].0, 1.0);
    assert!(!released[0].1);
    assert_eq!(released[0].2, Some(Combatant::Enemy(husk)));
    assert!(events.iter().any(|event| matches!(
        event,
        CombatEvent::Stunned { entity: Combatant::Enemy(id), .. } if *id == husk
    )));

    // Charge start plus the swing itself.
    let stamina = sim.player.stamina.current;
    assert!(stamina > 75.0 && stamina < 85.0, "stamina was {}", stamina);
}

#[test]
fn quick_swings_alternate_combo() {
    let mut sim = arena(Vec::new());

    for _ in 0..3 {
        sim.tick(DT, &press());
        sim.tick(DT, &release());
        for _ in 0..10 {
            sim.tick(DT, &idle());
        }
    }

    let combos: Vec<bool> = swings(&sim.drain_events())
        .into_iter()
        .map(|(_, combo, _)| combo)
        .collect();
    assert_eq!(combos, vec![false, true, false]);
}

#[test]
fn missed_swing_still_costs_stamina() {
    let mut sim = arena(Vec::new());
    sim.tick(DT, &press());
    sim.tick(DT, &release());

    let released = swings(&sim.drain_events());
    assert_eq!(released.len(), 1);
    assert_eq!(released[0].2, None);
    assert!(sim.player.stamina.current < 95.0);
}

#[test]
fn charge_refused_without_stamina() {
    let mut sim = arena(Vec::new());
    sim.set_player_state(100.0, 50.0, Vec3::ZERO, 3.0);
    sim.tick(DT, &press());

    let weapon = sim.player.weapon.as_ref().expect("weapon equipped");
    assert_eq!(weapon.phase, WeaponPhase::Idle);
}

#[test]
fn lifesteal_ring_heals_on_hit() {
    let mut sim = arena(vec![husk_at(2.0)]);
    assert!(!sim.equip_ring(Some(RingId::Mystic)));
    sim.give_ring(RingId::Mystic);
    assert!(sim.equip_ring(Some(RingId::Mystic)));
    sim.set_player_state(50.0, 50.0, Vec3::ZERO, 100.0);

    charged_swing(&mut sim, 1.0);

    assert!(approx(sim.player.body.hp, 52.2), "hp was {}", sim.player.body.hp);
    assert!(sim.drain_events().iter().any(|event| matches!(
        event,
        CombatEvent::Healed { entity: Combatant::Player, .. }
    )));
}

#[test]
fn kill_awards_points_and_prunes() {
    let mut sim = arena(vec![husk_at(2.0)]);
    let husk = sim.roster.iter().next().map(|enemy| enemy.id).expect("husk spawned");
    if let Some(enemy) = sim.roster.get_mut(husk) {
        enemy.body.hp = 5.0;
    }

    sim.tick(DT, &press());
    sim.tick(DT, &release());

    assert_eq!(sim.wallet.current, 10);
    assert!(sim.roster.is_empty());

    let deaths: Vec<_> = sim
        .drain_events()
        .into_iter()
        .filter(|event| matches!(event, CombatEvent::Died { .. }))
        .collect();
    assert_eq!(deaths.len(), 1);
    assert!(matches!(
        deaths[0],
        CombatEvent::Died {
            entity: Combatant::Enemy(id),
            killed_by: Some(Combatant::Player),
            reward: 10,
            ..
        } if id == husk
    ));
}

#[test]
fn death_drops_points_and_respawn_recovers_them() {
    let mut sim = arena(Vec::new());
    sim.wallet.add(25);
    sim.spawn_enemy(EnemyKind::Spearman, Vec3::new(0.0, 0.0, 1.5));
    sim.set_player_state(5.0, 50.0, Vec3::ZERO, 100.0);

    sim.tick(DT, &idle());

    assert!(sim.is_player_dead());
    assert_eq!(sim.wallet.current, 0);
    assert_eq!(sim.wallet.drop.map(|drop| drop.amount), Some(25));

    // A dead player ignores input.
    let position = sim.player.body.position;
    sim.tick(
        DT,
        &PlayerIntent {
            movement: Vec2::X,
            ..default()
        },
    );
    assert_eq!(sim.player.body.position, position);

    sim.respawn();
    assert!(!sim.is_player_dead());
    assert_eq!(sim.player.body.hp, sim.player.body.max_hp);
    assert_eq!(sim.player.stamina.current, sim.player.stamina.maximum);
    assert!(sim.roster.is_empty());

    sim.drain_events();
    sim.tick(DT, &interact());
    assert_eq!(sim.wallet.current, 25);
    assert!(sim
        .drain_events()
        .contains(&CombatEvent::PointsRecovered { amount: 25 }));
}

#[test]
fn warden_breaks_player_poise_and_cancels_charge() {
    let mut sim = arena(vec![EnemySpawn {
        kind: EnemyKind::Warden,
        position: Vec3::new(0.0, 0.0, 2.0),
    }]);
    sim.set_player_state(100.0, 10.0, Vec3::ZERO, 100.0);

    sim.tick(DT, &press());

    assert!(sim.player.body.stunned);
    assert!(approx(sim.player.body.hp, 85.0));
    let weapon = sim.player.weapon.as_ref().expect("weapon equipped");
    assert_eq!(weapon.phase, WeaponPhase::Idle);
    assert!(sim.drain_events().iter().any(|event| matches!(
        event,
        CombatEvent::Stunned { entity: Combatant::Player, .. }
    )));

    // Knocked away from the warden.
    sim.tick(DT, &idle());
    assert!(sim.player.body.position.z < 0.0);
}

#[test]
fn overlapping_enemies_are_pushed_apart() {
    let mut sim = arena(vec![
        EnemySpawn {
            kind: EnemyKind::Husk,
            position: Vec3::new(20.0, 0.0, 20.0),
        },
        EnemySpawn {
            kind: EnemyKind::Husk,
            position: Vec3::new(20.2, 0.0, 20.0),
        },
    ]);

    sim.tick(DT, &idle());

    let positions: Vec<Vec3> = sim.roster.iter().map(|enemy| enemy.body.position).collect();
    let gap = (positions[1] - positions[0]).length();
    assert!(gap >= 0.8 - 1e-4, "gap was {}", gap);
}

#[test]
fn same_seed_replays_exactly() {
    fn run(seed: u64) -> String {
        let mut sim = Simulation::builtin(seed);
        sim.equip_weapon(WeaponKind::LongSword);
        for frame in 0..600 {
            let intent = PlayerIntent {
                movement: Vec2::new(0.0, 1.0),
                charge_pressed: frame % 40 == 0,
                charge_released: frame % 40 == 20,
                ..default()
            };
            sim.tick(1.0 / 60.0, &intent);
        }
        format!("{:?} {:?} {:?}", sim.player.body, sim.roster, sim.wallet)
    }

    assert_eq!(run(42), run(42));
}
