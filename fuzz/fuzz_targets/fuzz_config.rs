//! Fuzz target for config.json parsing.

#![no_main]

use burst_core::config::SolverConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Parsing and validation should never panic, only return an error
    if let Ok(config) = serde_json::from_slice::<SolverConfig>(data) {
        let _ = config.params();
    }
});
