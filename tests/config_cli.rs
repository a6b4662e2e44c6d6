use predicates::str::{contains, diff};
use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};

fn write_temp_file(contents: &str, extension: &str) -> std::path::PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time should be available")
        .as_nanos();
    path.push(format!("tile-sim-{}.{}", nanos, extension));
    fs::write(&path, contents).expect("file write should succeed");
    path
}

#[test]
fn config_file_toml_drives_simulation() {
    let config = r#"
finish_span_secs = 60
author_name = "ci-bot"
reference = { policy = "fixed-offset", offset_secs = 15 }
statuses = [
  { status = "ACTION_REQUIRED", hold_secs = 10 },
  { status = "FAILED", hold_secs = 10 },
]
"#;
    let path = write_temp_file(config, "toml");

    let expected = concat!(
        "Type: GITHUB-CHECKS\n",
        "Label: api @main\n",
        "Status: FAILED\n",
        "Previous status: SUCCESS\n",
        "Author: ci-bot <https://www.gravatar.com/avatar/00000000000000000000000000000000>\n",
        "Started at: 2024-03-01T07:50:00Z\n",
        "Finished at: 2024-03-01T07:51:00Z\n",
    );
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("tile-sim");
    cmd.args([
        "checks",
        "--config",
        path.to_str().unwrap(),
        "--owner",
        "acme",
        "--repository",
        "api",
        "--ref",
        "main",
        "--at",
        "2024-03-01T08:00:00Z",
    ]);
    cmd.assert().success().stdout(diff(expected));
}

#[test]
fn empty_status_table_is_rejected() {
    let path = write_temp_file("statuses = []\n", "toml");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("tile-sim");
    cmd.args(["show-config", "--config", path.to_str().unwrap()]);
    cmd.assert()
        .failure()
        .stderr(contains("Error: status table must not be empty"));
}

#[test]
fn repository_file_resolves_recorded_build() {
    let records = r#"{
  "jobs": [
    {
      "name": "deploy",
      "branch": "main",
      "builds": [
        {
          "number": 12,
          "result": "FAILED",
          "started_at": "2024-03-01T07:00:00Z",
          "duration_secs": 90,
          "author": { "name": "bob", "avatar_url": "https://example.test/bob.png" },
          "previous_result": "SUCCESS"
        }
      ]
    }
  ]
}"#;
    let path = write_temp_file(records, "json");

    let expected = concat!(
        "Type: JENKINS-BUILD\n",
        "Label: deploy @main\n",
        "Status: FAILED\n",
        "Previous status: SUCCESS\n",
        "Author: bob <https://example.test/bob.png>\n",
        "Started at: 2024-03-01T07:00:00Z\n",
        "Finished at: 2024-03-01T07:01:30Z\n",
    );
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("tile-sim");
    cmd.args([
        "build",
        "--job",
        "deploy",
        "--branch",
        "main",
        "--repository",
        path.to_str().unwrap(),
        "--at",
        "2024-03-01T08:00:00Z",
    ]);
    cmd.assert().success().stdout(diff(expected));
}

#[test]
fn repository_file_reports_missing_job() {
    let path = write_temp_file(r#"{ "jobs": [] }"#, "json");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("tile-sim");
    cmd.args([
        "build",
        "--job",
        "deploy",
        "--repository",
        path.to_str().unwrap(),
    ]);
    cmd.assert()
        .failure()
        .stderr(contains("Error: job 'deploy' not found (branch: '')"));
}

#[test]
fn oversized_hold_in_config_is_rejected() {
    let path = write_temp_file(
        "statuses = [{ status = \"SUCCESS\", hold_secs = 9223372036854775807 }]\n",
        "toml",
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("tile-sim");
    cmd.args(["show-config", "--config", path.to_str().unwrap()]);
    cmd.assert()
        .failure()
        .stderr(contains("Error: hold_secs must be within"));
}

#[test]
fn repository_build_without_result_is_rejected() {
    let records = r#"
[[jobs]]
name = "deploy"

[[jobs.builds]]
number = 4
started_at = "2024-03-01T07:00:00Z"
"#;
    let path = write_temp_file(records, "toml");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("tile-sim");
    cmd.args([
        "build",
        "--job",
        "deploy",
        "--repository",
        path.to_str().unwrap(),
    ]);
    cmd.assert()
        .failure()
        .stderr(contains("Error: build #4 of job 'deploy' has no result"));
}

#[test]
fn repository_failure_without_author_uses_configured_author() {
    let records = r#"{
  "jobs": [
    {
      "name": "deploy",
      "builds": [
        { "number": 2, "result": "FAILED", "started_at": "2024-03-01T07:00:00Z", "duration_secs": 60 }
      ]
    }
  ]
}"#;
    let repository = write_temp_file(records, "json");
    let config = write_temp_file(
        "author_name = \"ci-bot\"\nauthor_avatar_url = \"https://example.test/ci.png\"\n",
        "toml",
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("tile-sim");
    cmd.args([
        "build",
        "--job",
        "deploy",
        "--repository",
        repository.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
        "--at",
        "2024-03-01T08:00:00Z",
    ]);
    cmd.assert()
        .success()
        .stdout(contains("Author: ci-bot <https://example.test/ci.png>\n"));
}
