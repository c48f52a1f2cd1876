//! End-to-end segment output tests for burst-core.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

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

fn write_input(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("offsets.txt");
    fs::write(&path, content).unwrap();
    path
}

const LOW_HIGH_LOW: &str = "0\n1\n2\n2.01\n2.02\n3.02\n";
const LOW_HIGH_LOW_SEGMENTS: &str = "0 [0 2)\n3 [2 2.02)\n0 [2.02 3.02)\n";

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "{:?}", output);
    String::from_utf8(output.stdout).unwrap()
}

mod human {
    use super::*;

    #[test]
    fn burst_in_the_middle() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, LOW_HIGH_LOW);
        burst_core(&dir)
            .arg("viterbi")
            .arg(&input)
            .assert()
            .success()
            .stdout(LOW_HIGH_LOW_SEGMENTS);
    }

    #[test]
    fn strategies_print_identical_segments() {
        let dir = TempDir::new().unwrap();
        let input = write_input(
            &dir,
            "10\n10.3\n10.5\n10.51\n10.53\n10.545\n12.545\n13.545\n",
        );
        let viterbi = stdout_of(burst_core(&dir).args(["-s", "3", "-g", "0.5", "viterbi"]).arg(&input));
        let trellis = stdout_of(burst_core(&dir).args(["-s", "3", "-g", "0.5", "trellis"]).arg(&input));
        assert_eq!(viterbi, trellis);
        assert_eq!(viterbi, "1 [10 10.5)\n2 [10.5 10.545)\n0 [10.545 13.545)\n");
    }

    #[test]
    fn high_penalty_flattens_everything() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, LOW_HIGH_LOW);
        burst_core(&dir)
            .args(["--gamma", "10", "trellis"])
            .arg(&input)
            .assert()
            .success()
            .stdout("0 [0 3.02)\n");
    }

    #[test]
    fn first_segment_starts_at_first_timestamp() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "100\n100.01\n100.02\n100.03\n101.03\n102.03\n");
        burst_core(&dir)
            .arg("viterbi")
            .arg(&input)
            .assert()
            .success()
            .stdout("3 [100 100.03)\n0 [100.03 102.03)\n");
    }

    #[test]
    fn whitespace_and_missing_trailing_newline() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "  0 \n\t1\n2\n2.01\n2.02\n3.02");
        burst_core(&dir)
            .arg("viterbi")
            .arg(&input)
            .assert()
            .success()
            .stdout(LOW_HIGH_LOW_SEGMENTS);
    }
}

mod config {
    use super::*;

    #[test]
    fn config_file_sets_gamma() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, LOW_HIGH_LOW);
        let config = dir.path().join("config.json");
        fs::write(&config, r#"{"gamma": 10}"#).unwrap();
        burst_core(&dir)
            .arg("--config")
            .arg(&config)
            .arg("viterbi")
            .arg(&input)
            .assert()
            .success()
            .stdout("0 [0 3.02)\n");
    }

    #[test]
    fn cli_flag_overrides_config_file() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, LOW_HIGH_LOW);
        let config = dir.path().join("config.json");
        fs::write(&config, r#"{"gamma": 10}"#).unwrap();
        burst_core(&dir)
            .env("BURST_CONFIG", &config)
            .args(["-g", "1", "viterbi"])
            .arg(&input)
            .assert()
            .success()
            .stdout(LOW_HIGH_LOW_SEGMENTS);
    }

    #[test]
    fn xdg_config_discovered() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, LOW_HIGH_LOW);
        let xdg = dir.path().join("xdg").join("burst-levels");
        fs::create_dir_all(&xdg).unwrap();
        fs::write(xdg.join("config.json"), r#"{"gamma": 10}"#).unwrap();
        // dirs::config_dir honors XDG_CONFIG_HOME on Linux only
        if cfg!(target_os = "linux") {
            burst_core(&dir)
                .arg("viterbi")
                .arg(&input)
                .assert()
                .success()
                .stdout("0 [0 3.02)\n");
        }
    }
}

mod formats {
    use super::*;

    #[test]
    fn json_document() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, LOW_HIGH_LOW);
        let stdout = stdout_of(burst_core(&dir).args(["-f", "json", "trellis"]).arg(&input));
        let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
        assert_eq!(value["schema_version"], "1.0.0");
        assert_eq!(value["algorithm"], "trellis");
        assert_eq!(value["level_count"], 4);
        assert_eq!(value["intervals"], 5);
        assert!(value["run_id"].as_str().unwrap().starts_with("run-"));
        let segments = value["segments"].as_array().unwrap();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[1]["level"], 3);
        assert_eq!(segments[1]["rate"], 8.0);
        assert_eq!(segments[1]["start"], 2.0);
        assert_eq!(segments[1]["end"], 2.02);
    }

    #[test]
    fn summary_line() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, LOW_HIGH_LOW);
        burst_core(&dir)
            .args(["--format", "summary", "viterbi"])
            .arg(&input)
            .assert()
            .success()
            .stdout("3 segments over 5 intervals, peak level 3 of 3\n");
    }
}

mod tracing_output {
    use super::*;

    #[test]
    fn silent_without_debug() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, LOW_HIGH_LOW);
        burst_core(&dir)
            .arg("viterbi")
            .arg(&input)
            .assert()
            .success()
            .stderr(predicate::str::contains("trellis.column").not());
    }

    #[test]
    fn viterbi_debug_traces_columns() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, LOW_HIGH_LOW);
        burst_core(&dir)
            .args(["--debug", "viterbi"])
            .arg(&input)
            .assert()
            .success()
            .stdout(LOW_HIGH_LOW_SEGMENTS)
            .stderr(predicate::str::contains("trellis.column"))
            .stderr(predicate::str::contains("trellis.cell").not());
    }

    #[test]
    fn trellis_debug_traces_cells() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, LOW_HIGH_LOW);
        burst_core(&dir)
            .args(["-d", "trellis"])
            .arg(&input)
            .assert()
            .success()
            .stdout(LOW_HIGH_LOW_SEGMENTS)
            .stderr(predicate::str::contains("trellis.cell"));
    }

    #[test]
    fn debug_flag_wins_over_rust_log() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, LOW_HIGH_LOW);
        burst_core(&dir)
            .env("RUST_LOG", "warn")
            .args(["--debug", "trellis"])
            .arg(&input)
            .assert()
            .success()
            .stdout(LOW_HIGH_LOW_SEGMENTS)
            .stderr(predicate::str::contains("trellis.cell"));
    }

    #[test]
    fn rust_log_applies_without_explicit_level() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, LOW_HIGH_LOW);
        burst_core(&dir)
            .env("RUST_LOG", "warn")
            .arg("viterbi")
            .arg(&input)
            .assert()
            .success()
            .stdout(LOW_HIGH_LOW_SEGMENTS)
            .stderr(predicate::str::contains("run.started").not());
    }

    #[test]
    fn jsonl_logs_carry_run_id() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, LOW_HIGH_LOW);
        let output = burst_core(&dir)
            .args(["--log-format", "jsonl", "viterbi"])
            .arg(&input)
            .output()
            .unwrap();
        assert!(output.status.success());
        let stderr = String::from_utf8_lossy(&output.stderr);
        let started = stderr
            .lines()
            .map(|line| serde_json::from_str::<serde_json::Value>(line).unwrap())
            .find(|v| v["event"] == "run.started")
            .expect("run.started logged");
        assert!(started["run_id"].as_str().unwrap().starts_with("run-"));
        assert_eq!(started["stage"], "init");
    }
}
