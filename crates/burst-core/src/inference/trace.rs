//! Observability hook for the trellis fill.
//!
//! The solver reports each finished cell and each finished column to an
//! optional [`TraceSink`]. Sinks only observe: they cannot change the
//! lattice, so traced and silent runs produce identical results.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::logging::event_names;

/// Derivation record for one lattice cell `C[t][level]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellTrace {
    /// Time step (1-based; step `t` explains interval `t - 1`).
    pub t: usize,
    /// Level of this cell.
    pub level: usize,
    /// Minimum cumulative cost stored in the cell.
    pub cost: f64,
    /// Level at step `t - 1` the minimum came from.
    pub predecessor: usize,
    /// `C[t - 1][predecessor]`.
    pub predecessor_cost: f64,
    /// Transition penalty plus emission cost added on top of `predecessor_cost`.
    pub step_cost: f64,
}

/// Receiver for trellis derivation records.
pub trait TraceSink {
    /// Called after `C[t][level]` and its predecessor are final.
    fn on_cell(&mut self, _cell: &CellTrace) {}

    /// Called after every cell of column `t` is final.
    fn on_column(&mut self, _t: usize, _costs: &[f64]) {}
}

/// How much detail a [`TracingSink`] emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceGranularity {
    /// One record per time step with the whole cost column.
    Columns,
    /// One record per (time step, level) cell.
    Cells,
}

/// Forwards trace records to `tracing` at DEBUG level.
#[derive(Debug, Clone, Copy)]
pub struct TracingSink {
    granularity: TraceGranularity,
}

impl TracingSink {
    pub fn new(granularity: TraceGranularity) -> Self {
        Self { granularity }
    }

    pub fn granularity(&self) -> TraceGranularity {
        self.granularity
    }
}

impl TraceSink for TracingSink {
    fn on_cell(&mut self, cell: &CellTrace) {
        if self.granularity != TraceGranularity::Cells {
            return;
        }
        debug!(
            target: event_names::TRELLIS_CELL,
            t = cell.t,
            level = cell.level,
            cost = cell.cost,
            predecessor = cell.predecessor,
            predecessor_cost = cell.predecessor_cost,
            step_cost = cell.step_cost,
            "({}, {}) {:.2} from ({}, {}) {:.2} + {:.2}",
            cell.t,
            cell.level,
            cell.cost,
            cell.t - 1,
            cell.predecessor,
            cell.predecessor_cost,
            cell.step_cost
        );
    }

    fn on_column(&mut self, t: usize, costs: &[f64]) {
        if self.granularity != TraceGranularity::Columns {
            return;
        }
        debug!(
            target: event_names::TRELLIS_COLUMN,
            t = t,
            "{}",
            format_column(costs)
        );
    }
}

/// Keeps every record in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub cells: Vec<CellTrace>,
    pub columns: Vec<(usize, Vec<f64>)>,
}

impl TraceSink for RecordingSink {
    fn on_cell(&mut self, cell: &CellTrace) {
        self.cells.push(*cell);
    }

    fn on_column(&mut self, t: usize, costs: &[f64]) {
        self.columns.push((t, costs.to_vec()));
    }
}

/// Render a cost column as `[c0, c1, ...]` with two decimals.
pub fn format_column(costs: &[f64]) -> String {
    let cells: Vec<String> = costs.iter().map(|c| format!("{:.2}", c)).collect();
    format!("[{}]", cells.join(", "))
}
