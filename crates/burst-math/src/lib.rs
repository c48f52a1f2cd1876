//! Burst level math utilities.

pub mod math;

pub use math::exponential::*;
pub use math::levels::*;
