//! Command implementations

pub mod change;
pub mod check;
pub mod strength;
