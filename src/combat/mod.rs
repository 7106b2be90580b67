//! Combat module - combat records, stamina, weapons, and damage.

mod components;
mod damage;
pub mod data;
mod hit;
mod plugin;
mod stamina;
mod weapon;

pub use components::*;
pub use damage::*;
pub use data::WeaponRegistry;
pub use hit::{find_swing_target, yaw_forward, yaw_toward};
pub use plugin::CombatPlugin;
pub use stamina::*;
pub use weapon::*;
