//! Run-length reporting of a level path.
//!
//! Level `S[t]` (t >= 1) labels the interval `[ts[t-1], ts[t])`. Maximal
//! runs of equal levels become segments; the synthetic start state `S[0]`
//! covers no time and never opens a segment of its own. Consecutive
//! segments share their boundary timestamp, so the segments tile
//! `[ts[0], ts[n])` with no gaps or overlaps.
//!
//! Timestamps in the human format are written with Rust's `{}` rendering
//! of `f64`: the shortest decimal that parses back to the same value, with
//! no trailing `.0` and never in exponent notation. So `2.0` prints as `2`
//! and `1e21` prints as `1000000000000000000000`. The JSON format carries
//! the same values as JSON numbers.

use std::io::{self, Write};

use burst_math::level_rate;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{BurstError, Result};
use crate::inference::{Algorithm, LevelPath, TrellisParams};

/// Schema version of the JSON report.
pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

/// One constant-level run, half-open `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub level: usize,
    pub start: f64,
    pub end: f64,
    /// Number of intervals in the run.
    pub intervals: usize,
}

impl Segment {
    /// Length of the run in timestamp units, `end - start`.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{} {})", self.level, self.start, self.end)
    }
}

/// Collapse `levels` (length n+1) over `times` (length n+1) into segments.
pub fn segments(levels: &[usize], times: &[f64]) -> Result<Vec<Segment>> {
    if levels.len() != times.len() {
        return Err(BurstError::Internal(format!(
            "level path has {} entries for {} timestamps",
            levels.len(),
            times.len()
        )));
    }
    if levels.len() < 2 {
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    let mut current = Segment {
        level: levels[1],
        start: times[0],
        end: times[1],
        intervals: 1,
    };
    for t in 2..levels.len() {
        if levels[t] == current.level {
            current.end = times[t];
            current.intervals += 1;
        } else {
            out.push(current);
            current = Segment {
                level: levels[t],
                start: times[t - 1],
                end: times[t],
                intervals: 1,
            };
        }
    }
    out.push(current);
    Ok(out)
}

/// Supported output formats for the segment report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One `<level> [<start> <end>)` line per segment
    #[default]
    Human,
    /// Structured JSON document
    Json,
    /// One-line summary
    Summary,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Human => write!(f, "human"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Summary => write!(f, "summary"),
        }
    }
}

/// Segment with its implied arrival rate, as written in JSON reports.
#[derive(Debug, Clone, Serialize)]
pub struct RatedSegment {
    #[serde(flatten)]
    pub segment: Segment,
    /// `s^level`.
    pub rate: f64,
    /// `end - start`.
    pub duration: f64,
}

/// Everything one run produced.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub schema_version: &'static str,
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub algorithm: Algorithm,
    pub params: TrellisParams,
    /// Number of levels the lattice considered (`k + 1`).
    pub level_count: usize,
    pub intervals: usize,
    pub total_cost: f64,
    pub segments: Vec<RatedSegment>,
}

impl Report {
    pub fn new(
        run_id: impl Into<String>,
        algorithm: Algorithm,
        params: TrellisParams,
        path: &LevelPath,
        times: &[f64],
    ) -> Result<Self> {
        let segments = segments(&path.levels, times)?
            .into_iter()
            .map(|segment| RatedSegment {
                rate: level_rate(params.s(), segment.level),
                duration: segment.duration(),
                segment,
            })
            .collect();
        Ok(Self {
            schema_version: REPORT_SCHEMA_VERSION,
            run_id: run_id.into(),
            generated_at: Utc::now(),
            algorithm,
            params,
            level_count: path.max_level + 1,
            intervals: path.intervals(),
            total_cost: path.total_cost,
            segments,
        })
    }

    pub fn peak_level(&self) -> usize {
        self.segments
            .iter()
            .map(|s| s.segment.level)
            .max()
            .unwrap_or(0)
    }

    /// Write the report to `out` in `format`.
    pub fn write(&self, format: OutputFormat, out: &mut dyn Write) -> io::Result<()> {
        match format {
            OutputFormat::Human => {
                for rated in &self.segments {
                    writeln!(out, "{}", rated.segment)?;
                }
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, self)?;
                writeln!(out)?;
            }
            OutputFormat::Summary => {
                writeln!(
                    out,
                    "{} segments over {} intervals, peak level {} of {}",
                    self.segments.len(),
                    self.intervals,
                    self.peak_level(),
                    self.level_count.saturating_sub(1)
                )?;
            }
        }
        Ok(())
    }
}
