//! Points earned from kills, dropped on death, and recovered on interact.

use bevy::prelude::*;

use crate::world::planar;

/// How close the player must be to recover dropped points.
pub const DROP_RECOVER_RADIUS: f32 = 2.0;

/// Points left where the player died.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointDrop {
    pub position: Vec3,
    pub amount: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointWallet {
    pub current: u32,
    pub drop: Option<PointDrop>,
}

impl PointWallet {
    pub fn add(&mut self, amount: u32) {
        self.current = self.current.saturating_add(amount);
    }

    pub fn set(&mut self, value: u32) {
        self.current = value;
    }

    /// Drop everything at `position`, replacing any older drop.
    pub fn drop_on_death(&mut self, position: Vec3) {
        self.drop = (self.current > 0).then_some(PointDrop {
            position,
            amount: self.current,
        });
        self.current = 0;
    }

    pub fn can_recover(&self, position: Vec3) -> bool {
        self.drop
            .is_some_and(|drop| planar(drop.position - position).length() <= DROP_RECOVER_RADIUS)
    }

    /// Pick up the drop when in reach. Returns the amount recovered.
    pub fn try_recover(&mut self, position: Vec3) -> u32 {
        if !self.can_recover(position) {
            return 0;
        }
        let amount = self.drop.take().map_or(0, |drop| drop.amount);
        self.add(amount);
        amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn death_moves_points_into_a_drop() {
        let mut wallet = PointWallet::default();
        wallet.add(45);
        wallet.drop_on_death(Vec3::new(3.0, 0.0, 3.0));

        assert_eq!(wallet.current, 0);
        assert_eq!(wallet.drop.map(|drop| drop.amount), Some(45));

        assert_eq!(wallet.try_recover(Vec3::new(10.0, 0.0, 3.0)), 0);
        assert_eq!(wallet.try_recover(Vec3::new(4.5, 0.0, 3.0)), 45);
        assert_eq!(wallet.current, 45);
        assert!(wallet.drop.is_none());
    }

    #[test]
    fn second_death_replaces_old_drop() {
        let mut wallet = PointWallet::default();
        wallet.add(30);
        wallet.drop_on_death(Vec3::ZERO);
        wallet.add(5);
        wallet.drop_on_death(Vec3::X * 10.0);

        let drop = wallet.drop.expect("drop exists");
        assert_eq!(drop.amount, 5);
        assert_eq!(drop.position, Vec3::X * 10.0);
    }

    #[test]
    fn dying_broke_clears_drop() {
        let mut wallet = PointWallet::default();
        wallet.add(10);
        wallet.drop_on_death(Vec3::ZERO);
        wallet.drop_on_death(Vec3::ZERO);
        assert!(wallet.drop.is_none());
    }
}
