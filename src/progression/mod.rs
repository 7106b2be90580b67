//! Progression module - points and rings.

mod points;
mod rings;

pub use points::*;
pub use rings::*;
