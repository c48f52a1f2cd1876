//! Core math modules.

pub mod exponential;
pub mod levels;
