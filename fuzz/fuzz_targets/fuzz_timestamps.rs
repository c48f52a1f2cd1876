//! Fuzz target for timestamp file parsing.
//!
//! Arbitrary text must either parse or fail with an error, and anything
//! that parses must also make it through interval derivation without
//! panicking.

#![no_main]

use burst_core::input::{intervals, parse_timestamps};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(times) = parse_timestamps(text) {
        assert!(times.iter().all(|t| t.is_finite()));
        if let Ok(gaps) = intervals(&times) {
            assert!(gaps.iter().all(|g| *g > 0.0 && g.is_finite()));
        }
    }
});
