//! The active enemy roster.

use bevy::prelude::*;
use rand::Rng;

use super::ai::{update_enemy, AiEnvironment};
use super::components::{Enemy, EnemyKind, EnemyProfile};
use crate::combat::{CombatEntity, DamagePipeline, EnemyId, Stunnable};
use crate::core::CombatEvents;
use crate::world::resolve_entity_separation;

/// Living enemies in stable spawn order.
#[derive(Debug, Default, Clone)]
pub struct EnemyRoster {
    enemies: Vec<Enemy>,
    next_id: u32,
}

impl EnemyRoster {
    pub fn spawn(&mut self, kind: EnemyKind, profile: EnemyProfile, position: Vec3) -> EnemyId {
        let id = EnemyId(self.next_id);
        self.next_id += 1;
        self.enemies.push(Enemy::new(id, kind, profile, position));
        id
    }

    pub fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|enemy| enemy.id == id)
    }

    pub fn get_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|enemy| enemy.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter()
    }

    /// Bodies that a swing could hit, keyed by id.
    pub fn hit_candidates(&self) -> impl Iterator<Item = (EnemyId, &CombatEntity)> {
        self.enemies.iter().map(|enemy| (enemy.id, &enemy.body))
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    pub fn alive_count(&self) -> usize {
        self.enemies.iter().filter(|enemy| enemy.is_alive()).count()
    }

    pub fn clear(&mut self) {
        self.enemies.clear();
    }

    /// Drop dead enemies. Returns how many were removed.
    pub fn prune_dead(&mut self) -> usize {
        let before = self.enemies.len();
        self.enemies.retain(Enemy::is_alive);
        before - self.enemies.len()
    }

    /// One AI pass: prune, update each enemy in roster order, separate
    /// overlapping bodies, prune again.
    pub fn tick<T, R>(
        &mut self,
        dt: f32,
        target: &mut T,
        env: AiEnvironment<'_>,
        pipeline: &mut DamagePipeline,
        events: &mut CombatEvents,
        rng: &mut R,
    ) where
        T: Stunnable + ?Sized,
        R: Rng,
    {
        self.prune_dead();

        for enemy in &mut self.enemies {
            update_enemy(enemy, target, dt, env, pipeline, events, rng);
        }

        resolve_entity_separation(&mut self.enemies);
        self.prune_dead();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_stable_across_pruning() {
        let mut roster = EnemyRoster::default();
        let a = roster.spawn(EnemyKind::Husk, EnemyProfile::default(), Vec3::ZERO);
        let b = roster.spawn(EnemyKind::Husk, EnemyProfile::default(), Vec3::X * 3.0);

        if let Some(enemy) = roster.get_mut(a) {
            enemy.body.die();
        }
        assert_eq!(roster.alive_count(), 1);
        assert_eq!(roster.prune_dead(), 1);

        assert!(roster.get(a).is_none());
        assert_eq!(roster.get(b).map(|enemy| enemy.id), Some(b));

        let c = roster.spawn(EnemyKind::Husk, EnemyProfile::default(), Vec3::ZERO);
        assert_ne!(c, a);
    }
}
