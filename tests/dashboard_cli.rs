use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

const SCRIPT: &str = r#"
# end-to-end dashboard session
{"op":"create","ref":"a","task":{"title":"A","priority":"high","status":"todo","assignee":"Ana","dueDate":"2024-03-01"}}
{"op":"create","ref":"b","task":{"title":"B","priority":"low","status":"done","dueDate":"2024-03-01"}}
{"op":"create","ref":"c","task":{"title":"C","priority":"medium","status":"todo","dueDate":"2024-02-10","timeSpent":2.5}}
{"op":"delete","ref":"a"}
{"op":"delete","ref":"a"}
"#;

fn write_script(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("session.jsonl");
    fs::write(&path, body).expect("write script");
    path
}

fn taskdash(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("taskdash").expect("binary");
    cmd.current_dir(dir).env_remove("TASKDASH_CONFIG");
    cmd
}

fn json_output(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).expect("json output")
}

#[test]
fn list_filters_and_sorts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = write_script(&dir, SCRIPT);

    let value = json_output(
        taskdash(dir.path())
            .arg("list")
            .arg(&script)
            .args(["--status", "todo", "--json"]),
    );
    assert_eq!(value["command"], "list");
    assert_eq!(value["status"], "success");
    assert_eq!(value["data"]["total"], 2);
    let tasks = value["data"]["tasks"].as_array().expect("tasks");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "C");
    assert_eq!(tasks[0]["timeSpent"], 2.5);
    assert_eq!(value["data"]["query"]["filter"], "todo");
    assert_eq!(value["warnings"].as_array().expect("warnings").len(), 1);

    let value = json_output(
        taskdash(dir.path())
            .arg("list")
            .arg(&script)
            .args(["--sort", "priority", "--dir", "desc", "--json"]),
    );
    let titles: Vec<&str> = value["data"]["tasks"]
        .as_array()
        .expect("tasks")
        .iter()
        .map(|task| task["title"].as_str().expect("title"))
        .collect();
    assert_eq!(titles, vec!["C", "B"]);
    assert_eq!(value["data"]["query"]["direction"], "desc");
    assert_eq!(value["data"]["query"]["sort_key"], "priority");
}

#[test]
fn trend_reports_counts_per_due_date() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = write_script(&dir, SCRIPT);

    let value = json_output(taskdash(dir.path()).arg("trend").arg(&script).arg("--json"));
    let points = value["data"]["points"].as_array().expect("points");
    assert_eq!(points.len(), 2);
    assert_eq!(points[0]["date"], "2024-02-10");
    assert_eq!(points[0]["count"], 1);
    assert_eq!(points[1]["date"], "2024-03-01");
    assert_eq!(points[1]["count"], 1);
}

#[test]
fn trend_of_empty_session_is_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = write_script(&dir, "# nothing yet\n");

    taskdash(dir.path())
        .arg("trend")
        .arg(&script)
        .assert()
        .success()
        .stdout(contains("No tasks due"));
}

#[test]
fn stats_counts_statuses() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = write_script(&dir, SCRIPT);

    taskdash(dir.path())
        .arg("stats")
        .arg(&script)
        .assert()
        .success()
        .stdout(contains("- Total tasks: 2"))
        .stdout(contains("- To Do: 1"))
        .stdout(contains("- In Progress: 0"))
        .stdout(contains("- Done: 1"));
}

#[test]
fn replay_reports_each_step() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = write_script(&dir, SCRIPT);

    let value = json_output(taskdash(dir.path()).arg("replay").arg(&script).arg("--json"));
    let outcomes: Vec<&str> = value["data"]["steps"]
        .as_array()
        .expect("steps")
        .iter()
        .map(|step| step["outcome"].as_str().expect("outcome"))
        .collect();
    assert_eq!(
        outcomes,
        vec!["applied", "applied", "applied", "applied", "not_found"]
    );
    assert_eq!(value["data"]["steps"][0]["line"], 3);
    assert_eq!(value["data"]["tasks"].as_array().expect("tasks").len(), 2);
}

#[test]
fn replay_reads_stdin() {
    let dir = tempfile::tempdir().expect("tempdir");

    taskdash(dir.path())
        .args(["replay", "-"])
        .write_stdin("{\"op\":\"quick_add\"}\n")
        .assert()
        .success()
        .stdout(contains("Replayed 1 commands"))
        .stdout(contains("New Task"));
}

#[test]
fn config_changes_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = write_script(&dir, SCRIPT);
    fs::write(
        dir.path().join(".taskdash.toml"),
        "[tasks]\nid_prefix = \"ops\"\n\n[view]\nstatus = \"done\"\n",
    )
    .expect("write config");

    let value = json_output(taskdash(dir.path()).arg("list").arg(&script).arg("--json"));
    let tasks = value["data"]["tasks"].as_array().expect("tasks");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "B");
    assert!(tasks[0]["id"].as_str().expect("id").starts_with("ops-"));
}

#[test]
fn bad_script_line_is_a_user_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = write_script(&dir, "{\"op\":\"quick_add\"}\nnot json\n");

    let output = taskdash(dir.path())
        .arg("list")
        .arg(&script)
        .arg("--json")
        .assert()
        .code(2)
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output).expect("error json");
    assert_eq!(value["status"], "error");
    assert_eq!(value["error"]["kind"], "user_error");
    assert!(value["error"]["message"]
        .as_str()
        .expect("message")
        .contains("line 2"));
}

#[test]
fn invalid_sort_flag_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = write_script(&dir, SCRIPT);

    taskdash(dir.path())
        .arg("list")
        .arg(&script)
        .args(["--sort", "assignee"])
        .assert()
        .code(2)
        .stderr(contains("invalid sort key"));
}
