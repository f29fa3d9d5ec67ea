//! Integration tests for the lifting binary.
//!
//! These tests verify end-to-end behavior including:
//! - CSV export of a generated cycle
//! - Program memory save, reuse and next cycle
//! - Sync against a mock Hevy server

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("lifting"));
    cmd.env_remove("HEVY_API_KEY");
    cmd
}

/// Write a config file into the temp dir so the user's config is never read
fn write_config(dir: &Path, extra: &str) -> PathBuf {
    let path = dir.join("config.toml");
    let contents = format!(
        "[data]\ndata_dir = {:?}\n\n[sync]\npacing_ms = 0\nbackoff_base_secs = 0\n{}",
        dir.join("data"),
        extra
    );
    fs::write(&path, contents).expect("Failed to write config");
    path
}

fn export(dir: &Path, args: &[&str]) -> String {
    let config = write_config(dir, "");
    let output = dir.join("plan.csv");

    cli()
        .arg("--config")
        .arg(&config)
        .arg("export")
        .args(args)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Program exported"));

    fs::read_to_string(&output).expect("Failed to read CSV")
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("5/3/1 Boring But Big"));
}

#[test]
fn test_export_writes_full_cycle() {
    let temp_dir = setup_test_dir();
    let csv = export(
        temp_dir.path(),
        &["--squat", "300", "--bench", "200", "--deadlift", "400", "--ohp", "135"],
    );
    let lines: Vec<_> = csv.lines().collect();

    assert_eq!(lines[0], "Week,Day,Exercise,Sets,Reps,Weight,Percentage");
    assert_eq!(lines[1], "1,1,Squat,1,5,120,40%");
    assert_eq!(lines[6], "1,1,Squat,1,5+,255,85%");
    assert_eq!(lines[7], "1,1,Squat,5,10,150,50%");
    assert_eq!(lines[8], "1,1,Leg Curl,5,10,,");

    // Weeks 1-3: 3 warmup + 3 working + BBB + accessory; deload: 3 + BBB + accessory
    assert_eq!(lines.len(), 1 + 12 * 8 + 4 * 5);
    assert!(csv.contains("4,4,Overhead Press,1,5,80,60%"));
}

#[test]
fn test_export_with_true_max_and_pairing() {
    let temp_dir = setup_test_dir();
    let csv = export(
        temp_dir.path(),
        &[
            "--squat", "333", "--bench", "200", "--deadlift", "400", "--ohp", "135",
            "--true-max",
            "--bbb-percent", "60",
            "--bbb-pair", "squat=deadlift",
            "--accessory", "squat=",
        ],
    );
    let lines: Vec<_> = csv.lines().collect();

    // 333 * 0.9 rounds to a 300 training max
    assert_eq!(lines[1], "1,1,Squat,1,5,120,40%");
    // Deadlift TM 360 * 60% = 216 -> 215
    assert_eq!(lines[7], "1,1,Deadlift,5,10,215,60%");
    // No accessory on squat day
    assert!(lines[8].starts_with("1,2,Bench Press"));
}

#[test]
fn test_export_custom_order() {
    let temp_dir = setup_test_dir();
    let csv = export(
        temp_dir.path(),
        &[
            "--squat", "300", "--bench", "200", "--deadlift", "400", "--ohp", "135",
            "--order", "deadlift,ohp,squat,bench",
        ],
    );

    assert!(csv.lines().nth(1).unwrap().starts_with("1,1,Deadlift"));
    assert!(csv.contains("1,2,Overhead Press"));
    assert!(csv.contains("1,4,Bench Press"));
}

#[test]
fn test_export_requires_all_maxes() {
    let temp_dir = setup_test_dir();
    let config = write_config(temp_dir.path(), "");

    cli()
        .arg("--config")
        .arg(&config)
        .arg("export")
        .args(["--squat", "300", "--bench", "200"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Deadlift, Overhead Press"));
}

#[test]
fn test_reuse_without_memory_fails() {
    let temp_dir = setup_test_dir();
    let config = write_config(temp_dir.path(), "");

    cli()
        .arg("--config")
        .arg(&config)
        .arg("export")
        .arg("--reuse")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no saved program memory"));
}

#[test]
fn test_save_memory_then_reuse_and_next_cycle() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();

    export(
        dir,
        &[
            "--squat", "300", "--bench", "200", "--deadlift", "400", "--ohp", "135",
            "--bbb-percent", "60",
            "--save-memory",
        ],
    );
    assert!(dir.join("data/531bbb_memory.json").exists());

    let config = write_config(dir, "");
    cli()
        .arg("--config")
        .arg(&config)
        .arg("show-memory")
        .assert()
        .success()
        .stdout(predicate::str::contains("Squat: 300"))
        .stdout(predicate::str::contains("BBB: 60%"));

    // Reuse keeps the saved maxes and BBB percentage
    let csv = export(dir, &["--reuse"]);
    assert_eq!(csv.lines().nth(7).unwrap(), "1,1,Squat,5,10,180,60%");

    // Next cycle adds 10 lbs to squat: 310 * 40% = 124 -> 125
    let csv = export(dir, &["--next-cycle"]);
    assert_eq!(csv.lines().nth(1).unwrap(), "1,1,Squat,1,5,125,40%");
}

#[test]
fn test_memory_file_override() {
    let temp_dir = setup_test_dir();
    let config = write_config(temp_dir.path(), "");
    let memory = temp_dir.path().join("elsewhere/memory.json");

    cli()
        .arg("--config")
        .arg(&config)
        .arg("--memory-file")
        .arg(&memory)
        .arg("export")
        .args(["--squat", "300", "--bench", "200", "--deadlift", "400", "--ohp", "135"])
        .arg("--save-memory")
        .arg("--output")
        .arg(temp_dir.path().join("plan.csv"))
        .assert()
        .success();

    assert!(memory.exists());
    assert!(!temp_dir.path().join("data/531bbb_memory.json").exists());
}

#[test]
fn test_show_memory_without_snapshot() {
    let temp_dir = setup_test_dir();
    let config = write_config(temp_dir.path(), "");

    cli()
        .arg("--config")
        .arg(&config)
        .arg("show-memory")
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved program memory"));
}

#[test]
fn test_sync_requires_api_key() {
    let temp_dir = setup_test_dir();
    let config = write_config(temp_dir.path(), "");

    cli()
        .arg("--config")
        .arg(&config)
        .arg("sync")
        .args(["--squat", "300", "--bench", "200", "--deadlift", "400", "--ohp", "135"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("API key"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_sync_keeps_saved_memory() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/exercise_templates"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let temp_dir = setup_test_dir();
    let dir = temp_dir.path().to_path_buf();
    export(
        &dir,
        &["--squat", "300", "--bench", "200", "--deadlift", "400", "--ohp", "135", "--save-memory"],
    );
    let memory = dir.join("data/531bbb_memory.json");
    let before = fs::read_to_string(&memory).unwrap();

    let config = write_config(&dir, "");
    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        for _ in 0..2 {
            cli()
                .arg("--config")
                .arg(&config)
                .arg("sync")
                .args(["--next-cycle", "--save-memory", "--api-key", "test-key"])
                .arg("--base-url")
                .arg(&uri)
                .assert()
                .failure();
        }
    })
    .await
    .unwrap();

    let after = fs::read_to_string(&memory).unwrap();
    assert_eq!(after, before);
    let snapshot: serde_json::Value = serde_json::from_str(&after).unwrap();
    assert_eq!(snapshot["config"]["training_maxes"]["Squat"], 300.0);
}

async fn mount_catalog(server: &MockServer) {
    let titles = [
        ("SQ", "Squat (Barbell)"),
        ("BP", "Bench Press (Barbell)"),
        ("DL", "Deadlift (Barbell)"),
        ("OHP", "Overhead Press (Barbell)"),
        ("LC", "Lying Leg Curl"),
        ("DBP", "Dumbbell Bench Press"),
        ("ROW", "Bent Over Row (Barbell)"),
        ("LR", "Lateral Raise (Dumbbell)"),
    ];
    let templates: Vec<_> = titles
        .iter()
        .map(|(id, title)| json!({"id": id, "title": title, "type": "weight_reps"}))
        .collect();

    Mock::given(method("GET"))
        .and(path("/exercise_templates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "page_count": 1,
            "exercise_templates": templates
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/routine_folders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "page_count": 1,
            "routine_folders": [{"id": 11, "title": "531 BBB Week 1"}]
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/routine_folders"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "routine_folder": {"id": 12, "title": "531 BBB Week N"}
        })))
        .expect(3)
        .mount(server)
        .await;
}

fn run_sync(config: PathBuf, base_url: String) -> assert_cmd::assert::Assert {
    cli()
        .arg("--config")
        .arg(&config)
        .arg("sync")
        .args(["--squat", "300", "--bench", "200", "--deadlift", "400", "--ohp", "135"])
        .args(["--api-key", "test-key"])
        .arg("--base-url")
        .arg(base_url)
        .assert()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sync_creates_and_updates_routines() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    Mock::given(method("GET"))
        .and(path("/routines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "page_count": 1,
            "routines": [{"id": "r-1", "title": "531 BBB W1D1 - Squat", "folder_id": 11}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/routines/r-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "routine": {"id": "r-1", "title": "531 BBB W1D1 - Squat"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/routines"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "routine": {"id": "new", "title": "created"}
        })))
        .expect(15)
        .mount(&server)
        .await;

    let temp_dir = setup_test_dir();
    let config = write_config(temp_dir.path(), "");
    let uri = server.uri();

    let assert = tokio::task::spawn_blocking(move || run_sync(config, uri))
        .await
        .unwrap();
    assert
        .success()
        .stdout(predicate::str::contains("Created: 15, Updated: 1"));

    // Every routine create carries a week folder
    let requests = server.received_requests().await.unwrap();
    let creates: Vec<_> = requests
        .iter()
        .filter(|r| r.method.as_str() == "POST" && r.url.path() == "/routines")
        .map(|r| serde_json::from_slice::<serde_json::Value>(&r.body).unwrap())
        .collect();
    assert_eq!(creates.len(), 15);
    assert!(creates.iter().all(|body| body["routine"]["folder_id"].is_i64()));
    assert_eq!(creates[0]["routine"]["title"], "531 BBB W1D2 - Bench Press");
    assert_eq!(creates[0]["routine"]["folder_id"], 11);
    assert_eq!(creates[14]["routine"]["folder_id"], 12);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sync_retries_rate_limited_create() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    Mock::given(method("GET"))
        .and(path("/routines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "page_count": 0,
            "routines": []
        })))
        .mount(&server)
        .await;

    // First attempt is throttled, the rest succeed
    Mock::given(method("POST"))
        .and(path("/routines"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limit exceeded"))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path_regex("^/routines$"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "routine": {"id": "new", "title": "created"}
        })))
        .expect(16)
        .mount(&server)
        .await;

    let temp_dir = setup_test_dir();
    let config = write_config(temp_dir.path(), "");
    let uri = server.uri();

    let assert = tokio::task::spawn_blocking(move || run_sync(config, uri))
        .await
        .unwrap();
    assert
        .success()
        .stdout(predicate::str::contains("Created: 16, Updated: 0"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sync_fails_on_unresolvable_exercise() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/exercise_templates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "page_count": 1,
            "exercise_templates": [{"id": "SQ", "title": "Squat (Barbell)"}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let temp_dir = setup_test_dir();
    let config = write_config(temp_dir.path(), "");
    let uri = server.uri();

    let assert = tokio::task::spawn_blocking(move || run_sync(config, uri))
        .await
        .unwrap();
    assert
        .failure()
        .stderr(predicate::str::contains("ExerciseNotFound"));
}
