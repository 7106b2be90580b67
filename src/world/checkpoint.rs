//! Checkpoints: respawn points the player activates by interacting.

use bevy::prelude::*;

use super::collision::planar;

/// How close the player must stand to activate a checkpoint.
pub const CHECKPOINT_RADIUS: f32 = 2.5;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Checkpoints {
    positions: Vec<Vec3>,
    active: Option<usize>,
}

impl Checkpoints {
    pub fn new(positions: Vec<Vec3>) -> Self {
        Self {
            positions,
            active: None,
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Index and position of the last activated checkpoint.
    pub fn active(&self) -> Option<(usize, Vec3)> {
        self.active
            .and_then(|index| self.positions.get(index).map(|pos| (index, *pos)))
    }

    /// Closest checkpoint within reach of `position`.
    pub fn nearest_in_reach(&self, position: Vec3) -> Option<usize> {
        self.positions
            .iter()
            .enumerate()
            .map(|(index, checkpoint)| (index, planar(*checkpoint - position).length()))
            .filter(|(_, distance)| *distance <= CHECKPOINT_RADIUS)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    /// Make `index` the active checkpoint. Returns its position.
    pub fn activate(&mut self, index: usize) -> Option<Vec3> {
        let position = *self.positions.get(index)?;
        self.active = Some(index);
        Some(position)
    }

    pub fn deactivate(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> Checkpoints {
        Checkpoints::new(vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(4.0, 0.0, 0.0)])
    }

    #[test]
    fn nearest_within_radius() {
        let checkpoints = line();
        assert_eq!(checkpoints.nearest_in_reach(Vec3::new(2.2, 0.0, 0.0)), Some(1));
        assert_eq!(checkpoints.nearest_in_reach(Vec3::new(1.8, 0.0, 0.0)), Some(0));
        assert_eq!(checkpoints.nearest_in_reach(Vec3::new(0.0, 0.0, 3.0)), None);
    }

    #[test]
    fn activation_tracks_latest() {
        let mut checkpoints = line();
        assert_eq!(checkpoints.active(), None);
        assert_eq!(checkpoints.activate(1), Some(Vec3::new(4.0, 0.0, 0.0)));
        assert_eq!(checkpoints.activate(7), None);
        assert_eq!(checkpoints.active().map(|(index, _)| index), Some(1));
    }
}
