//! The simulation context: every piece of mutable game state, advanced by one
//! call per frame.
//!
//! Tick order:
//!
//! 1. Player facing and weapon timers.
//! 2. Charge input. A release resolves its hit immediately through the
//!    damage pipeline.
//! 3. Player locomotion, then stamina and poise regeneration.
//! 4. Interaction (point drop, then pickup, then checkpoint).
//! 5. Enemy AI, separation, and pruning of the dead.
//! 6. Deaths reported during the tick settle points.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::archetypes::Archetypes;
use crate::combat::{Combatant, DamagePipeline, EnemyId, ReleaseOutcome, WeaponKind};
use crate::core::{CombatEvent, CombatEvents};
use crate::enemies::{AiEnvironment, EnemyKind, EnemyRoster};
use crate::player::{advance_movement, Player, PlayerConfig, PlayerIntent};
use crate::progression::{PointWallet, RingId, RingInventory};
use crate::world::{
    nearest_pickup, Checkpoints, CollisionConfig, LevelLayout, Pickup, PickupKind, StaticObstacle,
};

/// Owns the player, the enemies, the level and the event sink.
#[derive(Resource)]
pub struct Simulation {
    pub player: Player,
    pub roster: EnemyRoster,
    pub pipeline: DamagePipeline,
    pub events: CombatEvents,
    pub wallet: PointWallet,
    pub rings: RingInventory,
    pub checkpoints: Checkpoints,
    pub pickups: Vec<Pickup>,
    obstacles: Vec<StaticObstacle>,
    collision: CollisionConfig,
    archetypes: Archetypes,
    level: LevelLayout,
    rng: ChaCha8Rng,
    elapsed: f32,
}

impl Simulation {
    /// Build a fresh run of `level`: player at the level start, every enemy
    /// spawn populated, nothing collected.
    pub fn new(
        level: LevelLayout,
        archetypes: Archetypes,
        player_config: PlayerConfig,
        collision: CollisionConfig,
        seed: u64,
    ) -> Self {
        let player = Player::new(player_config, level.player_start, level.player_yaw);

        let mut simulation = Self {
            player,
            roster: EnemyRoster::default(),
            pipeline: DamagePipeline::default(),
            events: CombatEvents::default(),
            wallet: PointWallet::default(),
            rings: RingInventory::default(),
            checkpoints: Checkpoints::new(level.checkpoints.clone()),
            pickups: level.pickups.clone(),
            obstacles: level.obstacles.clone(),
            collision,
            archetypes,
            level,
            rng: ChaCha8Rng::seed_from_u64(seed),
            elapsed: 0.0,
        };
        simulation.reset_enemies();
        simulation
    }

    /// Built-in level, tables and player with the given seed.
    pub fn builtin(seed: u64) -> Self {
        Self::new(
            LevelLayout::builtin(),
            Archetypes::builtin(),
            PlayerConfig::default(),
            CollisionConfig::default(),
            seed,
        )
    }

    /// Advance everything by `dt` seconds.
    pub fn tick(&mut self, dt: f32, intent: &PlayerIntent) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.elapsed += dt;
        let first_new_event = self.events.len();

        if self.player.is_alive() {
            self.update_player(dt, intent);
        }

        let env = AiEnvironment {
            obstacles: &self.obstacles,
            collision: &self.collision,
        };
        self.roster.tick(
            dt,
            &mut self.player,
            env,
            &mut self.pipeline,
            &mut self.events,
            &mut self.rng,
        );

        self.settle_deaths(first_new_event);
    }

    fn update_player(&mut self, dt: f32, intent: &PlayerIntent) {
        if let Some(yaw) = intent.facing_yaw.filter(|yaw| yaw.is_finite()) {
            self.player.yaw = yaw;
        }

        if let Some(weapon) = self.player.weapon.as_mut() {
            weapon.tick(dt);
            if self.player.body.stunned {
                weapon.cancel_charge();
            }
        }

        if intent.charge_pressed {
            self.player.begin_charge();
        }
        if intent.charge_released {
            self.release_swing();
        }

        advance_movement(&mut self.player, dt, intent, &self.obstacles, &self.collision);
        self.player.stamina.regenerate(dt);
        let poise_regen_rate = self.player.config.poise_regen_rate;
        self.player.body.regenerate_poise(dt, poise_regen_rate);

        if intent.interact {
            self.interact();
        }
    }

    /// Release the current charge and resolve the hit, if any.
    fn release_swing(&mut self) -> Option<ReleaseOutcome<EnemyId>> {
        let origin = self.player.body.position;
        let yaw = self.player.yaw;
        let weapon = self.player.weapon.as_mut()?;

        let outcome = weapon.release(origin, yaw, self.roster.hit_candidates());
        if !outcome.attacked {
            return None;
        }

        let target = outcome
            .strike
            .map(|strike| strike.target)
            .filter(|id| self.roster.get(*id).is_some());
        self.events.push(CombatEvent::SwingReleased {
            ratio: outcome.ratio_used,
            combo: outcome.combo,
            hit: target.map(Combatant::Enemy),
        });

        match outcome.strike {
            Some(strike) => {
                if let Some(enemy) = self.roster.get_mut(strike.target) {
                    let report = self.pipeline.apply_hit(
                        Combatant::Player,
                        Some(&mut self.player.body),
                        enemy,
                        &strike.hit,
                        &mut self.events,
                    );
                    debug!(
                        "Swing hit {:?} for {:.1} (ratio {:.2}, combo {})",
                        strike.target, report.dealt, outcome.ratio_used, outcome.combo
                    );
                }
            }
            None => debug!("Swing missed (ratio {:.2})", outcome.ratio_used),
        }

        self.player.pay_for_swing(outcome.ratio_used);
        Some(outcome)
    }

    fn interact(&mut self) {
        let position = self.player.body.position;

        let recovered = self.wallet.try_recover(position);
        if recovered > 0 {
            info!("Recovered {} dropped points", recovered);
            self.events
                .push(CombatEvent::PointsRecovered { amount: recovered });
            return;
        }

        if let Some(index) = nearest_pickup(&self.pickups, position) {
            self.collect(index);
            return;
        }

        if let Some(index) = self.checkpoints.nearest_in_reach(position) {
            self.rest_at_checkpoint(index);
        }
    }

    /// Make the checkpoint the respawn point, restore the player in place
    /// and repopulate the level.
    fn rest_at_checkpoint(&mut self, index: usize) {
        let Some(checkpoint) = self.checkpoints.activate(index) else {
            return;
        };
        self.player.respawn_point = checkpoint;
        self.player.rest();
        self.reset_enemies();
        info!("Rested at checkpoint {}", index);
        self.events.push(CombatEvent::CheckpointActivated {
            index,
            position: checkpoint,
        });
    }

    fn collect(&mut self, index: usize) {
        let Some(pickup) = self.pickups.get_mut(index) else {
            return;
        };
        pickup.collected = true;
        let kind = pickup.kind;

        match kind {
            PickupKind::Weapon(weapon) => self.equip_weapon(weapon),
            PickupKind::Ring(ring) => {
                self.rings.add(ring);
                if self.rings.equipped().is_none() {
                    self.equip_ring(Some(ring));
                }
            }
        }

        info!("Picked up {:?}", kind);
        self.events.push(CombatEvent::PickedUp { pickup: kind });
    }

    /// Award rewards for enemies killed by the player and drop the player's
    /// points where they fell.
    fn settle_deaths(&mut self, first_new_event: usize) {
        let deaths: Vec<_> = self
            .events
            .iter()
            .skip(first_new_event)
            .filter_map(|event| match event {
                CombatEvent::Died {
                    entity,
                    killed_by,
                    reward,
                    position,
                } => Some((*entity, *killed_by, *reward, *position)),
                _ => None,
            })
            .collect();

        for (entity, killed_by, reward, position) in deaths {
            match entity {
                Combatant::Enemy(id) => {
                    if killed_by == Some(Combatant::Player) {
                        self.wallet.add(reward);
                    }
                    info!("{:?} killed, reward {} points", id, reward);
                }
                Combatant::Player => {
                    self.wallet.drop_on_death(position);
                    if let Some(weapon) = self.player.weapon.as_mut() {
                        weapon.cancel_charge();
                    }
                    info!("Player died at {:?}", position);
                }
            }
        }
    }

    /// Equip a fresh weapon of `kind`, discarding the old one's state.
    pub fn equip_weapon(&mut self, kind: WeaponKind) {
        let stats = self.archetypes.weapon(kind);
        self.player.equip(kind, stats);
        info!("Equipped {:?}", kind);
    }

    pub fn unequip_weapon(&mut self) -> Option<WeaponKind> {
        self.player.unequip()
    }

    /// Add a ring to the owned set without wearing it.
    pub fn give_ring(&mut self, ring: RingId) -> bool {
        self.rings.add(ring)
    }

    /// Wear an owned ring (or none) and install its lifesteal.
    pub fn equip_ring(&mut self, ring: Option<RingId>) -> bool {
        if !self.rings.equip(ring) {
            return false;
        }
        self.pipeline.set_lifesteal(self.rings.lifesteal_ratio());
        true
    }

    pub fn spawn_enemy(&mut self, kind: EnemyKind, position: Vec3) -> EnemyId {
        let profile = self.archetypes.enemy(kind);
        self.roster.spawn(kind, profile, position)
    }

    /// Replace every enemy with a fresh one at each level spawn point.
    pub fn reset_enemies(&mut self) {
        self.roster.clear();
        let spawns = self.level.enemy_spawns.clone();
        for spawn in spawns {
            self.spawn_enemy(spawn.kind, spawn.position);
        }
    }

    /// Bring the player back at the respawn point and repopulate the level.
    pub fn respawn(&mut self) {
        let position = self.player.respawn_point;
        self.player.respawn_at(position);
        self.reset_enemies();
        info!("Player respawned at {:?}", position);
    }

    /// Apply externally stored player values, clamped into range.
    pub fn set_player_state(&mut self, hp: f32, poise: f32, position: Vec3, stamina: f32) {
        let body = &mut self.player.body;
        body.set_vitals(hp, poise);
        if position.is_finite() {
            body.position = position;
        }
        if body.hp <= 0.0 {
            body.die();
        }
        self.player.stamina.set(stamina);
    }

    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        self.events.drain()
    }

    pub fn is_player_dead(&self) -> bool {
        !self.player.is_alive()
    }

    pub fn level(&self) -> &LevelLayout {
        &self.level
    }

    pub fn obstacles(&self) -> &[StaticObstacle] {
        &self.obstacles
    }

    pub fn collision(&self) -> &CollisionConfig {
        &self.collision
    }

    pub fn archetypes(&self) -> &Archetypes {
        &self.archetypes
    }

    /// Seconds simulated since the run started. Respawning does not reset it.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
