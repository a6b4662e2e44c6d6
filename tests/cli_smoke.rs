use predicates::str::diff;

const AT: &str = "2024-03-01T08:00:00Z";

fn checks_cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("tile-sim");
    cmd.args([
        "checks",
        "--owner",
        "acme",
        "--repository",
        "api",
        "--ref",
        "refs/heads/main",
        "--at",
        AT,
    ]);
    cmd
}

#[test]
fn simulated_running_tile_is_stable() {
    let expected = concat!(
        "Type: GITHUB-CHECKS\n",
        "Label: api @main\n",
        "Status: RUNNING\n",
        "Previous status: SUCCESS\n",
        "Duration: 100s\n",
        "Estimated duration: 300s\n",
        "Started at: 2024-03-01T07:58:20Z\n",
    );

    let mut cmd = checks_cmd();
    cmd.args(["--reference-offset", "100"]);
    cmd.assert().success().stdout(diff(expected));
}

#[test]
fn simulated_failed_tile_has_author_and_finish() {
    let expected = concat!(
        "Type: GITHUB-CHECKS\n",
        "Label: api @main\n",
        "Status: FAILED\n",
        "Previous status: SUCCESS\n",
        "Author: Faker <https://www.gravatar.com/avatar/00000000000000000000000000000000>\n",
        "Started at: 2024-03-01T07:50:00Z\n",
        "Finished at: 2024-03-01T07:55:00Z\n",
    );

    let mut cmd = checks_cmd();
    cmd.args(["--reference-offset", "45"]);
    cmd.assert().success().stdout(diff(expected));
}

#[test]
fn disabled_override_suppresses_fields() {
    let expected = concat!(
        "Type: GITHUB-CHECKS\n",
        "Label: api @main\n",
        "Status: DISABLED\n",
    );

    let mut cmd = checks_cmd();
    cmd.args(["--status", "disabled"]);
    cmd.assert().success().stdout(diff(expected));
}

#[test]
fn unstable_warning_reports_message_only() {
    let expected = concat!(
        "Type: GITHUB-CHECKS\n",
        "Label: api @main\n",
        "Status: WARNING\n",
        "Message: random error message\n",
    );

    let mut cmd = checks_cmd();
    cmd.args(["--status", "warning", "--unstable-probability", "1"]);
    cmd.assert().success().stdout(diff(expected));
}

#[test]
fn queued_tile_starts_at_fallback() {
    let expected = concat!(
        "Type: GITHUB-CHECKS\n",
        "Label: api @main\n",
        "Status: QUEUED\n",
        "Previous status: SUCCESS\n",
        "Started at: 2024-03-01T07:50:00Z\n",
    );

    let mut cmd = checks_cmd();
    cmd.args(["--status", "queued"]);
    cmd.assert().success().stdout(diff(expected));
}

#[test]
fn running_overrides_are_respected() {
    let expected = concat!(
        "Type: GITHUB-CHECKS\n",
        "Label: api @main\n",
        "Status: RUNNING\n",
        "Previous status: FAILED\n",
        "Duration: 100s\n",
        "Estimated duration: 600s\n",
        "Started at: 2024-03-01T07:58:20Z\n",
    );

    let mut cmd = checks_cmd();
    cmd.args([
        "--reference-offset",
        "100",
        "--status",
        "running",
        "--previous-status",
        "failed",
        "--estimated-duration",
        "600",
    ]);
    cmd.assert().success().stdout(diff(expected));
}

#[test]
fn build_tile_uses_job_label() {
    let expected = concat!(
        "Type: JENKINS-BUILD\n",
        "Label: deploy @release\n",
        "Status: SUCCESS\n",
        "Previous status: SUCCESS\n",
        "Started at: 2024-03-01T07:50:00Z\n",
        "Finished at: 2024-03-01T07:55:00Z\n",
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("tile-sim");
    cmd.args([
        "build",
        "--job",
        "deploy",
        "--branch",
        "release",
        "--at",
        AT,
        "--reference-offset",
        "0",
    ]);
    cmd.assert().success().stdout(diff(expected));
}

#[test]
fn issues_json_defaults_value() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("tile-sim");
    cmd.args(["issues", "--query", "is:open", "--format", "json"]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let value: serde_json::Value =
        serde_json::from_slice(&output).expect("output should be JSON");

    assert_eq!(value["type"], "GITHUB-ISSUES");
    assert_eq!(value["label"], "is:open");
    assert_eq!(value["status"], "SUCCESS");
    assert_eq!(value["values"], serde_json::json!([42.0]));
    assert!(value.get("started_at").is_none());
}
