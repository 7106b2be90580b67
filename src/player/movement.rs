//! Player locomotion: walking, sprint and dash from one input, jumping, and
//! gravity.

use bevy::prelude::*;

use super::components::{Player, PlayerIntent};
use crate::combat::yaw_forward;
use crate::world::{resolve_horizontal_move, resolve_vertical, CollisionConfig, StaticObstacle};

/// Handle sprint/dash, walking, jumping and gravity for one tick.
///
/// Dead players do nothing. Stunned players only slide along their knockback
/// and fall.
pub fn advance_movement(
    player: &mut Player,
    dt: f32,
    intent: &PlayerIntent,
    obstacles: &[StaticObstacle],
    collision: &CollisionConfig,
) {
    if !player.body.alive {
        return;
    }

    let movement = &mut player.movement;
    if movement.dash_cooldown > 0.0 {
        movement.dash_cooldown = (movement.dash_cooldown - dt).max(0.0);
    }

    if player.body.stunned {
        player.movement.sprinting = false;
        player.movement.sprint_was_held = intent.sprint_held;
        player.body.tick_stun(dt, obstacles, collision);
        resolve_vertical(&mut player.body, dt, obstacles, collision);
        return;
    }

    update_sprint(player, dt, intent);

    if player.movement.dashing {
        player.movement.dash_timer -= dt;
        let step = player.movement.dash_direction * player.config.dash.speed * dt;
        resolve_horizontal_move(&mut player.body, step, obstacles, collision);
        if player.movement.dash_timer <= 0.0 {
            player.movement.dashing = false;
        }
    } else {
        walk(player, dt, intent, obstacles, collision);
    }

    if intent.jump {
        try_jump(player);
    }

    resolve_vertical(&mut player.body, dt, obstacles, collision);
}

/// Sprint starts after holding long enough; a short press dashes on release.
fn update_sprint(player: &mut Player, dt: f32, intent: &PlayerIntent) {
    let hold_time = player.config.sprint_hold_time;
    let was_held = player.movement.sprint_was_held;
    player.movement.sprint_was_held = intent.sprint_held;

    match (was_held, intent.sprint_held) {
        (false, true) => {
            player.movement.sprint_hold_time = 0.0;
        }
        (true, true) => {
            player.movement.sprint_hold_time += dt;
            if !player.movement.sprinting && player.movement.sprint_hold_time >= hold_time {
                debug!("Sprinting");
                player.movement.sprinting = true;
            }
        }
        (true, false) => {
            if player.movement.sprint_hold_time < hold_time {
                try_start_dash(player, intent);
            }
            player.movement.sprinting = false;
        }
        (false, false) => {}
    }
}

/// Dash along the intended movement, or backwards when standing still.
pub fn try_start_dash(player: &mut Player, intent: &PlayerIntent) -> bool {
    if player.movement.dashing || player.movement.dash_cooldown > 0.0 {
        return false;
    }
    if !player.stamina.try_consume(player.config.costs.dash) {
        return false;
    }

    let direction = if intent.movement.length_squared() > 0.0 {
        intent.movement.normalize()
    } else {
        -yaw_forward(player.yaw)
    };

    player.movement.dashing = true;
    player.movement.dash_timer = player.config.dash.duration;
    player.movement.dash_cooldown = player.config.dash.cooldown;
    player.movement.dash_direction = direction;
    true
}

fn walk(
    player: &mut Player,
    dt: f32,
    intent: &PlayerIntent,
    obstacles: &[StaticObstacle],
    collision: &CollisionConfig,
) {
    let can_move = player
        .weapon
        .as_ref()
        .map_or(true, |weapon| weapon.can_move());
    if !can_move || intent.movement.length_squared() == 0.0 {
        return;
    }

    let mut speed = player.config.move_speed;
    if let Some(weapon) = player.weapon.as_ref() {
        speed *= weapon.move_speed_multiplier();
    }

    if player.movement.sprinting && player.stamina.current > 0.0 {
        speed *= player.config.sprint_multiplier;
        player
            .stamina
            .consume_continuous(player.config.costs.sprint_per_second * dt);
    }

    let step = intent.movement.normalize() * speed * dt;
    resolve_horizontal_move(&mut player.body, step, obstacles, collision);
}

/// Jump when grounded and the stamina is there.
pub fn try_jump(player: &mut Player) -> bool {
    if !player.body.grounded || player.body.stunned || !player.body.alive {
        return false;
    }
    if !player.stamina.try_consume(player.config.costs.jump) {
        return false;
    }
    player.body.vertical_velocity = player.config.jump_speed;
    player.body.grounded = false;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{WeaponKind, WeaponStats};
    use crate::player::PlayerConfig;

    const DT: f32 = 0.01;

    fn player() -> Player {
        Player::new(PlayerConfig::default(), Vec3::ZERO, 0.0)
    }

    fn step(player: &mut Player, intent: &PlayerIntent) {
        advance_movement(player, DT, intent, &[], &CollisionConfig::default());
    }

    #[test]
    fn walks_at_base_speed() {
        let mut player = player();
        let intent = PlayerIntent {
            movement: Vec2::new(0.0, 1.0),
            ..default()
        };
        for _ in 0..100 {
            step(&mut player, &intent);
        }
        assert!((player.body.position.z - 4.0).abs() < 1e-3);
        assert_eq!(player.stamina.current, 100.0);
    }

    #[test]
    fn charging_slows_movement() {
        let mut player = player();
        player.equip(WeaponKind::BrokenSword, WeaponStats::default());
        player.begin_charge();
        let intent = PlayerIntent {
            movement: Vec2::new(1.0, 0.0),
            ..default()
        };
        step(&mut player, &intent);
        assert!((player.body.position.x - 4.0 * 0.4 * DT).abs() < 1e-6);
    }

    #[test]
    fn short_press_dashes() {
        let mut player = player();
        let held = PlayerIntent {
            sprint_held: true,
            movement: Vec2::new(1.0, 0.0),
            ..default()
        };
        let released = PlayerIntent {
            movement: Vec2::new(1.0, 0.0),
            ..default()
        };

        step(&mut player, &held);
        step(&mut player, &held);
        step(&mut player, &released);

        assert!(player.movement.dashing);
        assert_eq!(player.stamina.current, 88.0);
        assert!(player.movement.dash_cooldown > 0.0);

        let before = player.body.position.x;
        step(&mut player, &released);
        assert!((player.body.position.x - before - 16.0 * DT).abs() < 1e-5);
    }

    #[test]
    fn dash_without_movement_goes_backwards() {
        let mut player = player();
        let idle = PlayerIntent::default();
        assert!(try_start_dash(&mut player, &idle));
        assert!((player.movement.dash_direction - Vec2::new(0.0, -1.0)).length() < 1e-6);
        // Cooldown blocks an immediate second dash.
        player.movement.dashing = false;
        assert!(!try_start_dash(&mut player, &idle));
    }

    #[test]
    fn long_hold_sprints_and_drains() {
        let mut player = player();
        let held = PlayerIntent {
            sprint_held: true,
            movement: Vec2::new(1.0, 0.0),
            ..default()
        };
        for _ in 0..110 {
            step(&mut player, &held);
        }
        assert!(player.movement.sprinting);
        assert!(player.stamina.current < 100.0);

        let released = PlayerIntent {
            movement: Vec2::new(1.0, 0.0),
            ..default()
        };
        step(&mut player, &released);
        assert!(!player.movement.sprinting);
        assert!(!player.movement.dashing);
    }

    #[test]
    fn jump_needs_ground_and_stamina() {
        let mut player = player();
        let jump = PlayerIntent {
            jump: true,
            ..default()
        };
        step(&mut player, &jump);
        assert!(player.body.position.y > 0.0);
        assert_eq!(player.stamina.current, 88.0);

        // Airborne: a second jump is refused.
        step(&mut player, &jump);
        assert_eq!(player.stamina.current, 88.0);

        let mut tired = self::player();
        tired.stamina.current = 5.0;
        step(&mut tired, &jump);
        assert_eq!(tired.body.position.y, 0.0);
    }

    #[test]
    fn stunned_player_cannot_move() {
        let mut player = player();
        player.body.apply_poise_damage(100.0, None, 0.0);
        let intent = PlayerIntent {
            movement: Vec2::new(1.0, 0.0),
            jump: true,
            ..default()
        };
        step(&mut player, &intent);
        assert_eq!(player.body.position, Vec3::ZERO);
        assert_eq!(player.stamina.current, 100.0);
    }
}
