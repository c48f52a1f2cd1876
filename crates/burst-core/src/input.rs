//! Timestamp input and interval preprocessing.
//!
//! The input file holds one absolute event timestamp per line. Lines are
//! trimmed and parsed strictly as a single floating-point value; anything
//! else (including blank lines and non-finite values) is malformed.
//!
//! Observations for the solver are the gaps between consecutive
//! timestamps. Gaps must be strictly positive: the exponential density
//! has no finite log at zero, so equal or decreasing timestamps are
//! rejected here instead of leaking ±∞ into the cost lattice.

use std::path::Path;

use tracing::debug;

use crate::error::{BurstError, Result};
use crate::logging::event_names;

/// Minimum number of timestamps needed to form one interval.
pub const MIN_TIMESTAMPS: usize = 2;

/// Parse newline-delimited timestamps.
pub fn parse_timestamps(content: &str) -> Result<Vec<f64>> {
    let mut times = Vec::new();
    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            return Err(BurstError::malformed_at(idx + 1, "empty line"));
        }
        let value: f64 = line.parse().map_err(|_| {
            BurstError::malformed_at(idx + 1, format!("cannot parse {:?} as a number", line))
        })?;
        if !value.is_finite() {
            return Err(BurstError::malformed_at(
                idx + 1,
                format!("timestamp {:?} is not finite", line),
            ));
        }
        times.push(value);
    }
    Ok(times)
}

/// Read and parse a timestamp file.
pub fn read_timestamps(path: &Path) -> Result<Vec<f64>> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        BurstError::malformed(format!("cannot read {}: {}", path.display(), err))
    })?;
    let times = parse_timestamps(&content)?;
    debug!(
        target: event_names::INPUT_PARSED,
        path = %path.display(),
        count = times.len(),
        "parsed timestamp file"
    );
    Ok(times)
}

/// Gaps between consecutive timestamps: `interval[i] = times[i + 1] - times[i]`.
///
/// Fails with `MalformedInput` for fewer than two timestamps and with
/// `NumericDomain` for the first gap that is not a positive finite value.
pub fn intervals(times: &[f64]) -> Result<Vec<f64>> {
    if times.len() < MIN_TIMESTAMPS {
        return Err(BurstError::malformed(format!(
            "need at least {} timestamps to form an interval, got {}",
            MIN_TIMESTAMPS,
            times.len()
        )));
    }
    let gaps: Vec<f64> = times.windows(2).map(|w| w[1] - w[0]).collect();
    check_intervals(&gaps)?;
    Ok(gaps)
}

/// Reject any interval the exponential cost cannot evaluate.
pub fn check_intervals(intervals: &[f64]) -> Result<()> {
    match intervals
        .iter()
        .position(|&gap| !(gap > 0.0 && gap.is_finite()))
    {
        Some(index) => Err(BurstError::NumericDomain {
            index,
            value: intervals[index],
        }),
        None => Ok(()),
    }
}
