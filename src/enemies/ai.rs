//! Enemy AI: straight-line pursuit, melee on a jittered cooldown, and the
//! stunned sub-state.

use bevy::prelude::*;
use rand::Rng;

use super::components::{AiState, Enemy};
use crate::combat::{Attacking, DamagePipeline, Damageable, Hit, Stunnable};
use crate::core::{CombatEvent, CombatEvents};
use crate::world::{planar, resolve_horizontal_move, CollisionConfig, StaticObstacle};

/// Read-only level data an enemy moves through.
#[derive(Clone, Copy)]
pub struct AiEnvironment<'a> {
    pub obstacles: &'a [StaticObstacle],
    pub collision: &'a CollisionConfig,
}

/// Advance one enemy by `dt` against `target`.
///
/// Dead enemies are skipped. A stunned enemy only slides along its knockback
/// and counts down its stun. Otherwise it regenerates poise, faces and
/// closes on the target when inside chase range, and strikes when inside
/// attack range with its cooldown spent.
pub fn update_enemy<T, R>(
    enemy: &mut Enemy,
    target: &mut T,
    dt: f32,
    env: AiEnvironment<'_>,
    pipeline: &mut DamagePipeline,
    events: &mut CombatEvents,
    rng: &mut R,
) where
    T: Stunnable + ?Sized,
    R: Rng,
{
    if !enemy.body.alive {
        return;
    }

    if enemy.attack_cooldown_remaining > 0.0 {
        enemy.attack_cooldown_remaining = (enemy.attack_cooldown_remaining - dt).max(0.0);
    }

    if enemy.body.stunned {
        enemy.ai_state = AiState::Stunned;
        if enemy.body.tick_stun(dt, env.obstacles, env.collision) {
            debug!("{:?} recovered from stun", enemy.id);
            enemy.ai_state = AiState::Chasing;
            events.push(CombatEvent::Recovered {
                entity: enemy.combatant(),
            });
        }
        return;
    }

    enemy
        .body
        .regenerate_poise(dt, enemy.profile.poise_regen_rate);

    let to_target = planar(target.body().position - enemy.body.position);
    let distance = to_target.length();

    if distance > enemy.profile.chase_range {
        enemy.ai_state = AiState::Idle;
        return;
    }

    enemy.ai_state = AiState::Chasing;
    if distance > 0.0 {
        enemy.yaw = to_target.x.atan2(to_target.y);
    }

    if distance > enemy.profile.stop_distance {
        let step = to_target / distance * enemy.profile.move_speed * dt;
        resolve_horizontal_move(&mut enemy.body, step, env.obstacles, env.collision);
    }

    if distance <= enemy.profile.attack_range && enemy.is_attack_ready() && target.body().alive {
        let direction = Vec3::new(to_target.x, 0.0, to_target.y);
        let hit = Hit {
            damage: enemy.profile.attack_damage,
            poise_damage: enemy.profile.attack_poise_damage,
            knockback_dir: (enemy.profile.attack_knockback > 0.0).then_some(direction),
            knockback_power: enemy.profile.attack_knockback,
        };
        let attacker = enemy.combatant();
        pipeline.apply_hit(attacker, Some(&mut enemy.body), target, &hit, events);

        let jitter = if enemy.profile.attack_interval_jitter_max > 0.0 {
            rng.gen_range(0.0..enemy.profile.attack_interval_jitter_max)
        } else {
            0.0
        };
        enemy.attack_cooldown_remaining = enemy.profile.attack_interval_base.max(0.0) + jitter;
        enemy.ai_state = AiState::Attacking;
    }
}
