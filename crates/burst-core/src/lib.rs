//! Burst level inference over event inter-arrival gaps.
//!
//! Given a strictly increasing sequence of event timestamps, assign each
//! inter-event gap to a discrete activity level. Level `j` models arrivals
//! as exponential with rate `s^j`; moving up one level costs `gamma`, moving
//! down is free. The minimum-cost level path is found with a Viterbi pass
//! over a `(n+1) x (k+1)` trellis.
//!
//! Modules:
//! - `input`: timestamp parsing and interval derivation
//! - `inference`: the trellis solver and its trace hook
//! - `report`: run-length segments and output rendering
//! - `config`, `logging`, `error`, `exit_codes`: the surrounding plumbing

pub mod config;
pub mod error;
pub mod exit_codes;
pub mod inference;
pub mod input;
pub mod logging;
pub mod report;

pub use error::{BurstError, Result};
pub use inference::{solve, solve_traced, Algorithm, LevelPath, Trellis, TrellisParams};
pub use report::{segments, Segment};
