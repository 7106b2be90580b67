//! Stamina pool gating the player's actions.

use serde::Deserialize;

/// Stamina resource for player actions.
///
/// Discrete actions (jump, dash, attack) either pay their full cost or are
/// refused. Continuous drains (sprinting) always succeed and floor at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct StaminaPool {
    pub current: f32,
    pub maximum: f32,
    pub regen_rate: f32,
    /// Delay before stamina starts regenerating after use
    pub regen_delay: f32,
    pub regen_delay_remaining: f32,
}

impl Default for StaminaPool {
    fn default() -> Self {
        Self::new(StaminaSettings::default())
    }
}

impl StaminaPool {
    pub fn new(settings: StaminaSettings) -> Self {
        let maximum = settings.maximum.max(0.0);
        Self {
            current: maximum,
            maximum,
            regen_rate: settings.regen_rate.max(0.0),
            regen_delay: settings.regen_delay.max(0.0),
            regen_delay_remaining: 0.0,
        }
    }

    /// Pay `cost` if the pool holds at least that much.
    pub fn try_consume(&mut self, cost: f32) -> bool {
        if !cost.is_finite() || cost < 0.0 {
            return false;
        }
        if self.current >= cost {
            self.current = (self.current - cost).max(0.0);
            self.regen_delay_remaining = self.regen_delay;
            true
        } else {
            false
        }
    }

    /// Drain `amount` unconditionally.
    pub fn consume_continuous(&mut self, amount: f32) {
        if !amount.is_finite() || amount <= 0.0 {
            return;
        }
        self.current = (self.current - amount).max(0.0);
        self.regen_delay_remaining = self.regen_delay;
    }

    pub fn regenerate(&mut self, delta: f32) {
        if self.regen_delay_remaining > 0.0 {
            self.regen_delay_remaining = (self.regen_delay_remaining - delta).max(0.0);
        } else {
            self.current = (self.current + self.regen_rate * delta).min(self.maximum);
        }
    }

    pub fn ratio(&self) -> f32 {
        if self.maximum <= 0.0 {
            return 0.0;
        }
        (self.current / self.maximum).clamp(0.0, 1.0)
    }

    pub fn refill(&mut self) {
        self.current = self.maximum;
        self.regen_delay_remaining = 0.0;
    }

    pub fn set(&mut self, value: f32) {
        if value.is_finite() {
            self.current = value.clamp(0.0, self.maximum);
        }
    }
}

/// Size and regeneration of the stamina pool, as read from `player.ron`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct StaminaSettings {
    pub maximum: f32,
    pub regen_rate: f32,
    pub regen_delay: f32,
}

impl Default for StaminaSettings {
    fn default() -> Self {
        Self {
            maximum: 100.0,
            regen_rate: 30.0,
            regen_delay: 0.8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_with(current: f32) -> StaminaPool {
        let mut pool = StaminaPool::default();
        pool.current = current;
        pool
    }

    #[test]
    fn discrete_cost_above_current_is_refused() {
        let mut pool = pool_with(10.0);
        assert!(!pool.try_consume(12.0));
        assert_eq!(pool.current, 10.0);
        assert_eq!(pool.regen_delay_remaining, 0.0);
    }

    #[test]
    fn discrete_cost_equal_to_current_empties_pool() {
        let mut pool = pool_with(10.0);
        assert!(pool.try_consume(10.0));
        assert_eq!(pool.current, 0.0);
        assert_eq!(pool.regen_delay_remaining, pool.regen_delay);
    }

    #[test]
    fn continuous_drain_floors_at_zero() {
        let mut pool = pool_with(3.0);
        pool.consume_continuous(5.0);
        assert_eq!(pool.current, 0.0);
        pool.consume_continuous(5.0);
        assert_eq!(pool.current, 0.0);
    }

    #[test]
    fn regeneration_waits_for_delay() {
        let mut pool = pool_with(50.0);
        pool.try_consume(10.0);

        // 0.8 s of delay must elapse before anything comes back.
        for _ in 0..8 {
            pool.regenerate(0.1);
        }
        assert!((pool.current - 40.0).abs() < 1e-4);

        pool.regenerate(0.1);
        pool.regenerate(0.1);
        assert!(pool.current > 40.0);
        assert!(pool.current <= pool.maximum);
    }

    #[test]
    fn regeneration_caps_at_maximum() {
        let mut pool = pool_with(99.0);
        pool.regenerate(5.0);
        assert_eq!(pool.current, 100.0);
    }
}
