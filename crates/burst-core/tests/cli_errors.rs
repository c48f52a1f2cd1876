//! CLI error handling tests for burst-core.
//!
//! Invalid arguments, unreadable or malformed input and out-of-domain
//! intervals must fail with a message on stderr, nothing on stdout, and
//! the documented exit code.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// burst-core with config discovery and log env isolated from the host.
fn burst_core(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("burst-core").expect("burst-core binary should exist");
    cmd.env_remove("BURST_CONFIG")
        .env_remove("BURST_CONFIG_DIR")
        .env_remove("BURST_LOG")
        .env_remove("BURST_LOG_FORMAT")
        .env_remove("RUST_LOG")
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("xdg"));
    cmd
}

fn write_input(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

// ============================================================================
// Argument errors (exit 10)
// ============================================================================

mod arguments {
    use super::*;

    #[test]
    fn s_of_one_rejected() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "ts.txt", "0\n1\n2\n");
        burst_core(&dir)
            .args(["-s", "1", "viterbi"])
            .arg(&input)
            .assert()
            .code(10)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("invalid parameter s"));
    }

    #[test]
    fn growth_factor_near_one_rejected_promptly() {
        let dir = TempDir::new().unwrap();
        let content: String = (0..1000).map(|i| format!("{i}\n")).collect();
        let input = write_input(&dir, "ts.txt", &content);
        burst_core(&dir)
            .args(["-s", "1.000000000001", "trellis"])
            .arg(&input)
            .timeout(std::time::Duration::from_secs(20))
            .assert()
            .code(10)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("too close to 1"));
    }

    #[test]
    fn negative_gamma_rejected() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "ts.txt", "0\n1\n2\n");
        burst_core(&dir)
            .args(["-g", "-1", "viterbi"])
            .arg(&input)
            .assert()
            .code(10)
            .stderr(predicate::str::contains("gamma"));
    }

    #[test]
    fn missing_explicit_config_rejected() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "ts.txt", "0\n1\n2\n");
        burst_core(&dir)
            .arg("--config")
            .arg(dir.path().join("nope.json"))
            .arg("viterbi")
            .arg(&input)
            .assert()
            .code(10)
            .stderr(predicate::str::contains("Config file not found"));
    }

    #[test]
    fn invalid_config_value_rejected() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "ts.txt", "0\n1\n2\n");
        let config = write_input(&dir, "config.json", r#"{"s": 0.5}"#);
        burst_core(&dir)
            .arg("--config")
            .arg(&config)
            .arg("viterbi")
            .arg(&input)
            .assert()
            .code(10);
    }

    #[test]
    fn unknown_algorithm_is_usage_error() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "ts.txt", "0\n1\n2\n");
        burst_core(&dir)
            .arg("bellman")
            .arg(&input)
            .assert()
            .code(2)
            .stderr(predicate::str::contains("invalid value"));
    }

    #[test]
    fn missing_file_argument_is_usage_error() {
        let dir = TempDir::new().unwrap();
        burst_core(&dir)
            .arg("viterbi")
            .assert()
            .code(2)
            .stderr(predicate::str::contains("OFFSETS_FILE"));
    }
}

// ============================================================================
// Input errors (exit 11)
// ============================================================================

mod input {
    use super::*;

    #[test]
    fn nonexistent_file() {
        let dir = TempDir::new().unwrap();
        burst_core(&dir)
            .arg("viterbi")
            .arg(dir.path().join("missing.txt"))
            .assert()
            .code(11)
            .stderr(predicate::str::contains("cannot read"));
    }

    #[test]
    fn single_timestamp() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "ts.txt", "5.0\n");
        burst_core(&dir)
            .arg("trellis")
            .arg(&input)
            .assert()
            .code(11)
            .stdout(predicate::str::is_empty());
    }

    #[test]
    fn empty_file() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "ts.txt", "");
        burst_core(&dir).arg("viterbi").arg(&input).assert().code(11);
    }

    #[test]
    fn unparsable_line_reports_line_number() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "ts.txt", "0\n1\nabc\n3\n");
        burst_core(&dir)
            .arg("viterbi")
            .arg(&input)
            .assert()
            .code(11)
            .stderr(predicate::str::contains("line 3"));
    }

    #[test]
    fn blank_line_in_the_middle() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "ts.txt", "0\n\n1\n");
        burst_core(&dir).arg("viterbi").arg(&input).assert().code(11);
    }
}

// ============================================================================
// Domain errors (exit 12)
// ============================================================================

mod domain {
    use super::*;

    #[test]
    fn duplicate_timestamps() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "ts.txt", "0\n1\n1\n2\n");
        burst_core(&dir)
            .arg("viterbi")
            .arg(&input)
            .assert()
            .code(12)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("index 1"));
    }

    #[test]
    fn decreasing_timestamps() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "ts.txt", "5\n4\n");
        burst_core(&dir).arg("trellis").arg(&input).assert().code(12);
    }
}

// ============================================================================
// JSON error document
// ============================================================================

mod json_errors {
    use super::*;

    #[test]
    fn json_format_reports_structured_error() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "ts.txt", "0\n0\n");
        let output = burst_core(&dir)
            .args(["--format", "json", "-q", "viterbi"])
            .arg(&input)
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(12));
        assert!(output.stdout.is_empty());

        let stderr = String::from_utf8_lossy(&output.stderr);
        let value: serde_json::Value = serde_json::from_str(stderr.trim()).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["error"]["kind"], "numeric_domain");
        assert_eq!(value["error"]["code"], "ERR_DOMAIN");
        assert_eq!(value["error"]["stage"], "parse");
        assert_eq!(value["error"]["exit_code"], 12);
    }
}
