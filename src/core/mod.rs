//! Core game module - states, events, and data file helpers.
//!
//! This module provides the foundation that all other game systems build upon.

mod data;
mod events;
mod plugin;
mod states;

pub use data::*;
pub use events::*;
pub use plugin::{CorePlugin, LoadSet};
pub use states::*;
