use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use tempfile::TempDir;

const IDEA: &str = "Cut your onboarding time in half";

fn cmd_in(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("copy-variants");
    cmd.current_dir(dir.path())
        .env("COPY_VARIANTS__LLM__OPENAI__API_KEY_ENV", "COPY_VARIANTS_CLI_TEST_KEY")
        .env_remove("COPY_VARIANTS_CLI_TEST_KEY")
        .env_remove("RUST_LOG");
    cmd
}

fn json_stdout(cmd: &mut assert_cmd::Command) -> Value {
    let output = cmd.output().expect("run command");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid json")
}

#[test]
fn config_init_writes_example_file() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = dir.path().join("config.toml");

    cmd_in(&dir)
        .args(["config", "init", "--path"])
        .arg(&config_path)
        .assert()
        .success();

    let content = fs::read_to_string(&config_path).expect("read config");
    assert!(content.contains("[llm.openai]"));
    assert!(content.contains("[brand]"));

    cmd_in(&dir)
        .args(["config", "init", "--path"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn plan_outputs_reproducible_json() {
    let dir = TempDir::new().expect("temp dir");
    let args = [
        "plan", "--idea", IDEA, "--platform", "x_post", "--platform", "tiktok_caption",
        "--seed", "11", "--count", "8",
    ];

    let first = json_stdout(cmd_in(&dir).args(args));
    let second = json_stdout(cmd_in(&dir).args(args));
    assert_eq!(first, second);

    let variants = first["variants"].as_array().expect("variants");
    assert_eq!(variants.len(), 8);
    for variant in variants {
        let platform = variant["platform"].as_str().expect("platform");
        assert!(platform == "x_post" || platform == "tiktok_caption");
    }
}

#[test]
fn plan_by_length_honors_budget() {
    let dir = TempDir::new().expect("temp dir");
    let plan = json_stdout(cmd_in(&dir).args([
        "plan", "--idea", IDEA, "--max-chars", "100", "--seed", "3", "--count", "5",
    ]));

    let variants = plan["variants"].as_array().expect("variants");
    assert_eq!(variants.len(), 5);
    for variant in variants {
        let target = variant["target_length"].as_u64().expect("target");
        assert!((95..=100).contains(&target));
    }
}

#[test]
fn plan_rejects_unknown_platform() {
    let dir = TempDir::new().expect("temp dir");
    cmd_in(&dir)
        .args(["plan", "--idea", IDEA, "--platform", "myspace"])
        .assert()
        .failure();
}

#[test]
fn generate_offline_stays_within_budget() {
    let dir = TempDir::new().expect("temp dir");
    let result = json_stdout(cmd_in(&dir).args([
        "generate", "--idea", IDEA, "--max-chars", "100", "--count", "20", "--offline", "--json",
    ]));

    let variants = result["variants"].as_array().expect("variants");
    assert_eq!(variants.len(), 20);

    let mut openings = HashSet::new();
    for variant in variants {
        let text = variant["text"].as_str().expect("text");
        assert!(text.chars().count() <= 100, "{}", text);
        assert!(!text.to_lowercase().contains("onboarding time in half"));

        let opening: Vec<String> = text
            .split_whitespace()
            .take(2)
            .map(|w| w.to_lowercase())
            .collect();
        openings.insert(opening.join(" "));
    }
    assert!(openings.len() > 1);
}

#[test]
fn generate_without_api_key_falls_back_silently() {
    let dir = TempDir::new().expect("temp dir");
    let args = ["generate", "--idea", IDEA, "--seed", "5", "--count", "4", "--json"];

    let online = json_stdout(cmd_in(&dir).args(args));
    let offline = json_stdout(cmd_in(&dir).args(args).arg("--offline"));
    assert_eq!(online, offline);
}

#[test]
fn generate_with_stub_provider_reports_forbidden_phrase() {
    let dir = TempDir::new().expect("temp dir");
    let result = json_stdout(
        cmd_in(&dir)
            .env("COPY_VARIANTS__LLM__PROVIDER", "stub")
            .args([
                "generate", "--idea", IDEA, "--platform", "x_post", "--count", "3",
                "--forbidden", "take", "--json",
            ]),
    );

    let variants = result["variants"].as_array().expect("variants");
    assert_eq!(variants.len(), 3);
    for variant in variants {
        let kinds: Vec<&str> = variant["warnings"]
            .as_array()
            .expect("warnings")
            .iter()
            .filter_map(|w| w["kind"].as_str())
            .collect();
        assert!(kinds.contains(&"forbidden_phrase"), "{}", variant);
    }
}

#[test]
fn generate_prints_human_readable_output() {
    let dir = TempDir::new().expect("temp dir");
    cmd_in(&dir)
        .args(["generate", "--idea", IDEA, "--platform", "x_post", "--count", "2", "--offline"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[x_post-1]"))
        .stdout(predicate::str::contains("/280 chars"));
}

#[test]
fn doctor_reports_missing_key_as_warning() {
    let dir = TempDir::new().expect("temp dir");
    let output = cmd_in(&dir)
        .args(["doctor", "--json"])
        .output()
        .expect("run doctor");

    assert!(output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(report["config"]["status"], "ok");
    assert_eq!(report["llm"]["status"], "warn");
    assert_eq!(report["overall"], "warn");
}

#[test]
fn doctor_fails_on_missing_config_file() {
    let dir = TempDir::new().expect("temp dir");
    cmd_in(&dir)
        .args(["--config", "missing.toml", "doctor"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Failed to load config"));
}
