//! Minimum-cost level segmentation over a (time step × rate level) lattice.
//!
//! # Model
//!
//! - Observations: inter-event gaps `x_1 .. x_n`, all strictly positive.
//! - Levels: `0 ..= k` with `k = ceil(log_s(n))`; level `j` hypothesizes
//!   arrivals at rate `s^j`.
//! - Emission cost of gap `x` at level `j`: `-ln(s^j · e^(-s^j·x))`.
//! - Transition cost from level `l` to `j`: `gamma · (j - l)` when `j > l`,
//!   otherwise free. Escalating to a burstier level must be paid for;
//!   falling back is not.
//!
//! The lattice `C[t][j]` holds the minimum cumulative cost of explaining
//! the first `t` gaps and ending at level `j`. `C[0]` pins the start to
//! level 0. Each cell scans every predecessor level in ascending order and
//! keeps the first strict minimum, and the final level is the first
//! minimum of `C[n]`, so the recovered path is fully deterministic.
//!
//! # Example
//!
//! ```
//! use burst_core::inference::{solve, TrellisParams};
//!
//! let params = TrellisParams::default();
//! let path = solve(&[1.0, 1.0, 0.01, 0.01, 1.0], &params)?;
//! assert_eq!(path.levels, vec![0, 0, 0, 3, 3, 0]);
//! # Ok::<(), burst_core::error::BurstError>(())
//! ```

use burst_math::{exponential_neg_log_density, level_count, level_rates};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::trace::{CellTrace, TraceSink};
use crate::error::{BurstError, Result};
use crate::input::check_intervals;

/// Growth factor and switch penalty for the solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrellisParams {
    s: f64,
    gamma: f64,
}

impl TrellisParams {
    /// Default growth factor between adjacent levels.
    pub const DEFAULT_S: f64 = 2.0;
    /// Default cost per level of escalation.
    pub const DEFAULT_GAMMA: f64 = 1.0;

    /// Validate and build parameters.
    ///
    /// `s` must be finite and greater than 1; `gamma` finite and non-negative.
    pub fn new(s: f64, gamma: f64) -> Result<Self> {
        if !s.is_finite() || s <= 1.0 {
            return Err(BurstError::InvalidParameter {
                name: "s",
                value: s,
                reason: "growth factor must be a finite number greater than 1",
            });
        }
        if !gamma.is_finite() || gamma < 0.0 {
            return Err(BurstError::InvalidParameter {
                name: "gamma",
                value: gamma,
                reason: "switch penalty must be a finite number >= 0",
            });
        }
        Ok(Self { s, gamma })
    }

    pub fn s(&self) -> f64 {
        self.s
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Cost of moving from level `from` to level `to`.
    pub fn transition_penalty(&self, from: usize, to: usize) -> f64 {
        if to > from {
            self.gamma * (to - from) as f64
        } else {
            0.0
        }
    }
}

impl Default for TrellisParams {
    fn default() -> Self {
        Self {
            s: Self::DEFAULT_S,
            gamma: Self::DEFAULT_GAMMA,
        }
    }
}

/// Most likely level sequence recovered from a filled lattice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelPath {
    /// `levels[0]` is the synthetic start state; `levels[t]` labels interval `t - 1`.
    pub levels: Vec<usize>,
    /// Cost of the whole path, `min_j C[n][j]`.
    pub total_cost: f64,
    /// Highest level the lattice considered (`k`).
    pub max_level: usize,
}

impl LevelPath {
    /// Number of observed intervals the path explains.
    pub fn intervals(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }

    /// Number of adjacent positions whose levels differ.
    pub fn changes(&self) -> usize {
        self.levels.windows(2).filter(|w| w[0] != w[1]).count()
    }

    /// Total number of levels climbed, `Σ max(0, S[t] - S[t-1])`.
    pub fn upward_movement(&self) -> usize {
        self.levels
            .windows(2)
            .map(|w| w[1].saturating_sub(w[0]))
            .sum()
    }

    /// Highest level actually used.
    pub fn peak_level(&self) -> usize {
        self.levels.iter().copied().max().unwrap_or(0)
    }
}

/// Filled cost and predecessor lattices.
#[derive(Debug, Clone, PartialEq)]
pub struct Trellis {
    params: TrellisParams,
    /// `costs[t][j]`, `t in 0..=n`.
    costs: Vec<Vec<f64>>,
    /// `predecessors[j][t]`, `t in 0..=n`; column 0 is unused.
    predecessors: Vec<Vec<usize>>,
}

impl Trellis {
    /// Build and fill the lattice for `intervals`.
    ///
    /// Every interval must be a positive finite number. With no intervals the
    /// lattice is the single start cell. Inputs whose level count would
    /// exceed [`burst_math::MAX_LEVEL`] are rejected before anything is allocated.
    pub fn fill(
        intervals: &[f64],
        params: &TrellisParams,
        mut sink: Option<&mut dyn TraceSink>,
    ) -> Result<Self> {
        check_intervals(intervals)?;

        let n = intervals.len();
        let max_level = if n == 0 {
            0
        } else {
            // s is already validated, so a missing count means the ladder
            // would need more than MAX_LEVEL levels
            level_count(n, params.s).ok_or(BurstError::InvalidParameter {
                name: "s",
                value: params.s,
                reason: "growth factor too close to 1 for this input (over 4096 levels)",
            })?
        };
        let rates = level_rates(params.s, max_level);
        debug!(
            steps = n,
            levels = max_level + 1,
            s = params.s,
            gamma = params.gamma,
            "filling trellis"
        );

        let mut costs = Vec::with_capacity(n + 1);
        let mut start = vec![f64::INFINITY; max_level + 1];
        start[0] = 0.0;
        costs.push(start);
        let mut predecessors = vec![vec![0usize; n + 1]; max_level + 1];

        for t in 1..=n {
            let gap = intervals[t - 1];
            let prev = &costs[t - 1];
            let mut column = vec![f64::INFINITY; max_level + 1];

            for (j, rate) in rates.iter().enumerate() {
                let emission = exponential_neg_log_density(gap, *rate);
                let mut best_cost = f64::INFINITY;
                let mut best_prev = 0;
                for (l, prev_cost) in prev.iter().enumerate() {
                    let candidate = emission + prev_cost + params.transition_penalty(l, j);
                    if candidate < best_cost {
                        best_cost = candidate;
                        best_prev = l;
                    }
                }
                column[j] = best_cost;
                predecessors[j][t] = best_prev;

                if let Some(sink) = sink.as_deref_mut() {
                    sink.on_cell(&CellTrace {
                        t,
                        level: j,
                        cost: best_cost,
                        predecessor: best_prev,
                        predecessor_cost: prev[best_prev],
                        step_cost: emission + params.transition_penalty(best_prev, j),
                    });
                }
            }

            if let Some(sink) = sink.as_deref_mut() {
                sink.on_column(t, &column);
            }
            costs.push(column);
        }

        Ok(Self {
            params: *params,
            costs,
            predecessors,
        })
    }

    pub fn params(&self) -> &TrellisParams {
        &self.params
    }

    /// Number of observed intervals (`n`).
    pub fn steps(&self) -> usize {
        self.costs.len() - 1
    }

    /// Highest level index (`k`).
    pub fn max_level(&self) -> usize {
        self.predecessors.len() - 1
    }

    /// Number of levels (`k + 1`).
    pub fn level_count(&self) -> usize {
        self.predecessors.len()
    }

    /// `C[t][j]`.
    pub fn cost(&self, t: usize, j: usize) -> f64 {
        self.costs[t][j]
    }

    /// `P[j][t]`.
    pub fn predecessor(&self, j: usize, t: usize) -> usize {
        self.predecessors[j][t]
    }

    /// The full cost lattice, indexed `[t][j]`.
    pub fn costs(&self) -> &[Vec<f64>] {
        &self.costs
    }

    /// The full predecessor lattice, indexed `[j][t]`.
    pub fn predecessors(&self) -> &[Vec<usize>] {
        &self.predecessors
    }

    /// `C[n][·]`.
    pub fn final_costs(&self) -> &[f64] {
        &self.costs[self.steps()]
    }

    /// Follow predecessor pointers from the cheapest final cell back to `t = 0`.
    pub fn backtrace(&self) -> LevelPath {
        let n = self.steps();
        let (best_level, best_cost) = first_min(self.final_costs());

        let mut levels = vec![0usize; n + 1];
        levels[n] = best_level;
        for t in (1..=n).rev() {
            levels[t - 1] = self.predecessors[levels[t]][t];
        }

        LevelPath {
            levels,
            total_cost: best_cost,
            max_level: self.max_level(),
        }
    }
}

/// Index and value of the first minimum (lowest index on ties).
fn first_min(values: &[f64]) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (idx, &value) in values.iter().enumerate() {
        if value < best.1 {
            best = (idx, value);
        }
    }
    best
}

/// Most likely level sequence for `intervals`, without tracing.
pub fn solve(intervals: &[f64], params: &TrellisParams) -> Result<LevelPath> {
    Ok(Trellis::fill(intervals, params, None)?.backtrace())
}

/// Same as [`solve`], reporting every cell and column to `sink`.
pub fn solve_traced(
    intervals: &[f64],
    params: &TrellisParams,
    sink: &mut dyn TraceSink,
) -> Result<LevelPath> {
    Ok(Trellis::fill(intervals, params, Some(sink))?.backtrace())
}
