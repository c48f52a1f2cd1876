//! Burst level inference.
//!
//! Submodules:
//! - `trellis`: the lattice fill and backtrace
//! - `trace`: the optional per-cell / per-column observability hook

pub mod trace;
pub mod trellis;

pub use trace::{
    format_column, CellTrace, RecordingSink, TraceGranularity, TraceSink, TracingSink,
};
pub use trellis::{solve, solve_traced, LevelPath, Trellis, TrellisParams};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Evaluation strategy. Both run the same lattice fill and return the same
/// path; they differ only in the shape of their debug trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Batch form; traces one cost column per time step.
    #[default]
    Viterbi,
    /// Annotated form; traces the derivation of every cell.
    Trellis,
}

impl Algorithm {
    /// Trace detail this strategy emits.
    pub fn granularity(self) -> TraceGranularity {
        match self {
            Algorithm::Viterbi => TraceGranularity::Columns,
            Algorithm::Trellis => TraceGranularity::Cells,
        }
    }

    /// Solve, forwarding this strategy's trace to `tracing` when `trace` is set.
    pub fn run(self, intervals: &[f64], params: &TrellisParams, trace: bool) -> Result<LevelPath> {
        if trace {
            let mut sink = TracingSink::new(self.granularity());
            solve_traced(intervals, params, &mut sink)
        } else {
            solve(intervals, params)
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Algorithm::Viterbi => write!(f, "viterbi"),
            Algorithm::Trellis => write!(f, "trellis"),
        }
    }
}
