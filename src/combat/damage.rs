//! Damage pipeline: turns a hit into hp, poise and death changes, then runs
//! the "damage dealt" subscribers.

use bevy::prelude::*;

use super::components::{CombatEntity, Combatant, Stunnable};
use crate::core::{CombatEvent, CombatEvents};

/// One resolved hit, before it touches the target.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hit {
    pub damage: f32,
    pub poise_damage: f32,
    pub knockback_dir: Option<Vec3>,
    pub knockback_power: f32,
}

impl Hit {
    pub fn new(damage: f32, poise_damage: f32) -> Self {
        Self {
            damage,
            poise_damage,
            ..default()
        }
    }

    pub fn with_knockback(mut self, dir: Vec3, power: f32) -> Self {
        self.knockback_dir = Some(dir);
        self.knockback_power = power;
        self
    }
}

/// What a hit did to its target.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HitReport {
    /// Hp actually removed.
    pub dealt: f32,
    pub stunned: bool,
    pub killed: bool,
}

/// Payload handed to every damage listener.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageDealt {
    pub attacker: Combatant,
    pub target: Combatant,
    /// Damage the hit carried.
    pub raw_damage: f32,
    /// Hp the target actually lost.
    pub amount: f32,
}

/// Subscriber evaluated synchronously inside [`DamagePipeline::apply_hit`].
pub trait DamageListener: Send + Sync {
    /// Name used to unsubscribe.
    fn label(&self) -> &'static str;

    fn on_damage_dealt(
        &mut self,
        dealt: &DamageDealt,
        attacker: Option<&mut CombatEntity>,
        events: &mut CombatEvents,
    );
}

/// Heals the attacker by a share of the damage each hit carried.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lifesteal {
    pub ratio: f32,
}

impl Lifesteal {
    pub const LABEL: &'static str = "lifesteal";
}

impl DamageListener for Lifesteal {
    fn label(&self) -> &'static str {
        Self::LABEL
    }

    fn on_damage_dealt(
        &mut self,
        dealt: &DamageDealt,
        attacker: Option<&mut CombatEntity>,
        events: &mut CombatEvents,
    ) {
        if self.ratio <= 0.0 {
            return;
        }
        let Some(body) = attacker else {
            return;
        };

        let healed = body.heal(dealt.raw_damage * self.ratio);
        if healed > 0.0 {
            debug!("{:?} healed {:.1} by lifesteal", dealt.attacker, healed);
            events.push(CombatEvent::Healed {
                entity: dealt.attacker,
                amount: healed,
            });
        }
    }
}

/// Owns the list of "damage dealt" subscribers.
#[derive(Default)]
pub struct DamagePipeline {
    listeners: Vec<Box<dyn DamageListener>>,
}

impl DamagePipeline {
    pub fn subscribe(&mut self, listener: Box<dyn DamageListener>) {
        self.listeners.push(listener);
    }

    /// Remove every listener with this label. Returns how many were removed.
    pub fn unsubscribe(&mut self, label: &str) -> usize {
        let before = self.listeners.len();
        self.listeners.retain(|listener| listener.label() != label);
        before - self.listeners.len()
    }

    /// Replace the lifesteal subscriber. `None` or a ratio of zero removes it.
    pub fn set_lifesteal(&mut self, ratio: Option<f32>) {
        self.unsubscribe(Lifesteal::LABEL);
        if let Some(ratio) = ratio.filter(|ratio| *ratio > 0.0) {
            self.subscribe(Box::new(Lifesteal { ratio }));
        }
    }

    pub fn has_listener(&self, label: &str) -> bool {
        self.listeners.iter().any(|listener| listener.label() == label)
    }

    /// Resolve `hit` against `target`.
    ///
    /// Order: hp loss, poise and stun, death (at most once), then the damage
    /// dealt subscribers. Dead targets are left untouched.
    pub fn apply_hit<T: Stunnable + ?Sized>(
        &mut self,
        attacker: Combatant,
        mut attacker_body: Option<&mut CombatEntity>,
        target: &mut T,
        hit: &Hit,
        events: &mut CombatEvents,
    ) -> HitReport {
        if !target.body().alive {
            return HitReport::default();
        }

        let target_id = target.combatant();
        let dealt = target.body_mut().take_damage(hit.damage);
        let stunned = target.on_hit(hit.poise_damage, hit.knockback_dir, hit.knockback_power);

        let mut killed = false;
        if target.body().hp <= 0.0 {
            let reward = target.reward_points();
            let position = target.body().position;
            if target.body_mut().die() {
                killed = true;
                debug!("{:?} killed by {:?}", target_id, attacker);
                events.push(CombatEvent::Died {
                    entity: target_id,
                    killed_by: Some(attacker),
                    reward,
                    position,
                });
            }
        }

        if stunned && !killed {
            debug!("{:?} stunned", target_id);
            events.push(CombatEvent::Stunned {
                entity: target_id,
                knockback: target.body().knockback_velocity,
            });
        }

        if hit.damage > 0.0 {
            let payload = DamageDealt {
                attacker,
                target: target_id,
                raw_damage: hit.damage,
                amount: dealt,
            };
            events.push(CombatEvent::DamageDealt {
                attacker,
                target: target_id,
                amount: dealt,
            });
            for listener in &mut self.listeners {
                listener.on_damage_dealt(&payload, attacker_body.as_deref_mut(), events);
            }
        }

        HitReport {
            dealt,
            stunned,
            killed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{Damageable, EnemyId};

    struct Dummy {
        id: Combatant,
        body: CombatEntity,
        reward: u32,
    }

    impl Damageable for Dummy {
        fn combatant(&self) -> Combatant {
            self.id
        }

        fn body(&self) -> &CombatEntity {
            &self.body
        }

        fn body_mut(&mut self) -> &mut CombatEntity {
            &mut self.body
        }

        fn reward_points(&self) -> u32 {
            self.reward
        }
    }

    impl Stunnable for Dummy {}

    fn enemy(hp: f32, poise: f32) -> Dummy {
        Dummy {
            id: Combatant::Enemy(EnemyId(7)),
            body: CombatEntity::new(hp, poise, 0.4, Vec3::ZERO),
            reward: 10,
        }
    }

    fn count_deaths(events: &CombatEvents) -> usize {
        events
            .iter()
            .filter(|event| matches!(event, CombatEvent::Died { .. }))
            .count()
    }

    #[test]
    fn hit_removes_hp_and_reports_damage() {
        let mut pipeline = DamagePipeline::default();
        let mut events = CombatEvents::default();
        let mut target = enemy(50.0, 25.0);

        let report = pipeline.apply_hit(
            Combatant::Player,
            None,
            &mut target,
            &Hit::new(12.0, 5.0),
            &mut events,
        );

        assert_eq!(report.dealt, 12.0);
        assert!(!report.stunned);
        assert_eq!(target.body.hp, 38.0);
        assert_eq!(target.body.poise, 20.0);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn lethal_hit_dies_exactly_once() {
        let mut pipeline = DamagePipeline::default();
        let mut events = CombatEvents::default();
        let mut target = enemy(10.0, 25.0);

        let first = pipeline.apply_hit(
            Combatant::Player,
            None,
            &mut target,
            &Hit::new(30.0, 0.0),
            &mut events,
        );
        let second = pipeline.apply_hit(
            Combatant::Player,
            None,
            &mut target,
            &Hit::new(30.0, 0.0),
            &mut events,
        );

        assert!(first.killed);
        assert_eq!(first.dealt, 10.0);
        assert_eq!(second, HitReport::default());
        assert!(!target.body.alive);
        assert_eq!(target.body.hp, 0.0);
        assert_eq!(count_deaths(&events), 1);

        let reward = events.iter().find_map(|event| match event {
            CombatEvent::Died { reward, .. } => Some(*reward),
            _ => None,
        });
        assert_eq!(reward, Some(10));
    }

    #[test]
    fn poise_break_reports_stun_with_knockback() {
        let mut pipeline = DamagePipeline::default();
        let mut events = CombatEvents::default();
        let mut target = enemy(50.0, 25.0);

        let hit = Hit::new(10.0, 37.5).with_knockback(Vec3::Z, 15.0);
        let report = pipeline.apply_hit(Combatant::Player, None, &mut target, &hit, &mut events);

        assert!(report.stunned);
        assert!(target.body.stunned);
        assert_eq!(target.body.knockback_velocity, Vec2::new(0.0, 15.0));
        assert!(events
            .iter()
            .any(|event| matches!(event, CombatEvent::Stunned { .. })));
    }

    #[test]
    fn lifesteal_heals_attacker_and_clamps() {
        let mut pipeline = DamagePipeline::default();
        pipeline.set_lifesteal(Some(0.1));
        assert!(pipeline.has_listener(Lifesteal::LABEL));

        let mut events = CombatEvents::default();
        let mut attacker = CombatEntity::new(100.0, 10.0, 0.5, Vec3::ZERO);
        attacker.hp = 50.0;
        let mut target = enemy(200.0, 80.0);

        pipeline.apply_hit(
            Combatant::Player,
            Some(&mut attacker),
            &mut target,
            &Hit::new(22.0, 0.0),
            &mut events,
        );
        assert!((attacker.hp - 52.2).abs() < 1e-4);

        attacker.hp = 99.5;
        pipeline.apply_hit(
            Combatant::Player,
            Some(&mut attacker),
            &mut target,
            &Hit::new(22.0, 0.0),
            &mut events,
        );
        assert_eq!(attacker.hp, 100.0);
    }

    #[test]
    fn zero_damage_skips_listeners() {
        let mut pipeline = DamagePipeline::default();
        pipeline.set_lifesteal(Some(0.5));

        let mut events = CombatEvents::default();
        let mut attacker = CombatEntity::new(100.0, 10.0, 0.5, Vec3::ZERO);
        attacker.hp = 40.0;
        let mut target = enemy(50.0, 25.0);

        pipeline.apply_hit(
            Combatant::Player,
            Some(&mut attacker),
            &mut target,
            &Hit::new(0.0, 5.0),
            &mut events,
        );
        assert_eq!(attacker.hp, 40.0);
        assert!(events.is_empty());
    }

    #[test]
    fn unsubscribe_removes_lifesteal() {
        let mut pipeline = DamagePipeline::default();
        pipeline.set_lifesteal(Some(0.1));
        assert_eq!(pipeline.unsubscribe(Lifesteal::LABEL), 1);
        pipeline.set_lifesteal(Some(0.0));
        assert!(!pipeline.has_listener(Lifesteal::LABEL));
    }
}
