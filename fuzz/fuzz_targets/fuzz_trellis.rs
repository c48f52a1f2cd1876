//! Fuzz target for the trellis solver.
//!
//! Builds an interval sequence and parameters from arbitrary bytes and
//! checks the structural guarantees of the returned path.

#![no_main]

use arbitrary::Arbitrary;
use burst_core::inference::{solve, solve_traced, RecordingSink, TrellisParams};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    s: f64,
    gamma: f64,
    intervals: Vec<f64>,
}

fuzz_target!(|input: Input| {
    // Keep the lattice small enough for the fuzzer to move quickly. The
    // solver caps the ladder at MAX_LEVEL but fills near that cap are slow
    if input.intervals.len() > 512 || input.s < 1.1 {
        return;
    }
    let Ok(params) = TrellisParams::new(input.s, input.gamma) else {
        return;
    };
    let Ok(path) = solve(&input.intervals, &params) else {
        return;
    };

    assert_eq!(path.levels.len(), input.intervals.len() + 1);
    assert_eq!(path.levels[0], 0);
    assert!(path.levels.iter().all(|&l| l <= path.max_level));

    let mut sink = RecordingSink::default();
    let traced = solve_traced(&input.intervals, &params, &mut sink).expect("accepted once");
    assert_eq!(path.levels, traced.levels);
});
