//! Rings: collected passives, at most one worn at a time.

use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RingId {
    /// Heals the wearer for a share of the damage they deal.
    Mystic,
}

impl RingId {
    pub const ALL: [RingId; 1] = [Self::Mystic];

    pub fn key(self) -> &'static str {
        match self {
            Self::Mystic => "mystic",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ring| ring.key() == key)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Mystic => "Mystic Ring",
        }
    }

    pub fn lifesteal_ratio(self) -> f32 {
        match self {
            Self::Mystic => 0.10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RingInventory {
    owned: BTreeSet<RingId>,
    equipped: Option<RingId>,
}

impl RingInventory {
    /// Returns `false` if the ring was already owned.
    pub fn add(&mut self, ring: RingId) -> bool {
        self.owned.insert(ring)
    }

    pub fn owns(&self, ring: RingId) -> bool {
        self.owned.contains(&ring)
    }

    pub fn owned(&self) -> impl Iterator<Item = RingId> + '_ {
        self.owned.iter().copied()
    }

    pub fn equipped(&self) -> Option<RingId> {
        self.equipped
    }

    /// Wear `ring`, or take the current one off with `None`. Rings that are
    /// not owned cannot be worn; the call then changes nothing.
    pub fn equip(&mut self, ring: Option<RingId>) -> bool {
        match ring {
            Some(ring) if !self.owns(ring) => false,
            _ => {
                self.equipped = ring;
                true
            }
        }
    }

    /// Lifesteal of the worn ring, if any.
    pub fn lifesteal_ratio(&self) -> Option<f32> {
        self.equipped.map(RingId::lifesteal_ratio)
    }

    pub fn clear(&mut self) {
        self.owned.clear();
        self.equipped = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn must_own_before_equipping() {
        let mut rings = RingInventory::default();
        assert!(!rings.equip(Some(RingId::Mystic)));
        assert_eq!(rings.lifesteal_ratio(), None);

        assert!(rings.add(RingId::Mystic));
        assert!(!rings.add(RingId::Mystic));
        assert!(rings.equip(Some(RingId::Mystic)));
        assert_eq!(rings.lifesteal_ratio(), Some(0.10));

        assert!(rings.equip(None));
        assert_eq!(rings.equipped(), None);
    }
}
