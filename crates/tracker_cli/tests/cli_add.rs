use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("tasktracker-{nanos}-{file_name}"))
}

fn run_session(store_path: &Path, input: &str) -> Output {
    let exe = env!("CARGO_BIN_EXE_tasktracker");

    let mut child = Command::new(exe)
        .env("TASKTRACKER_STORE_PATH", store_path)
        .env("TASKTRACKER_CONFIG_PATH", temp_path("no-config.json"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn interactive session");

    {
        let stdin = child.stdin.as_mut().expect("stdin");
        stdin
            .write_all(input.as_bytes())
            .expect("failed to write to stdin");
    }

    child
        .wait_with_output()
        .expect("failed to read session output")
}

fn read_store(store_path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(store_path).unwrap()).unwrap()
}

#[test]
fn add_persists_a_pending_task() {
    let store_path = temp_path("add.json");
    let output = run_session(&store_path, "1\nBuy milk\nhigh\nn\n\n6\n");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Task added: Buy milk (1)"));

    let stored = read_store(&store_path);
    std::fs::remove_file(&store_path).ok();

    let tasks = stored.as_array().expect("array of tasks");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"], 1);
    assert_eq!(tasks[0]["description"], "Buy milk");
    assert_eq!(tasks[0]["completed"], false);
    assert_eq!(tasks[0]["priority"], "high");
    assert!(tasks[0]["due_date"].is_null());
    assert!(tasks[0]["created_at"].is_string());
}

#[test]
fn add_reprompts_until_description_is_non_empty() {
    let store_path = temp_path("add-blank.json");
    let output = run_session(&store_path, "1\n\n   \nBuy milk\nlow\nn\n\n6\n");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Task description cannot be empty."));
    assert!(stdout.contains("Task added: Buy milk (1)"));

    let stored = read_store(&store_path);
    std::fs::remove_file(&store_path).ok();
    assert_eq!(stored.as_array().unwrap().len(), 1);
}

#[test]
fn add_reprompts_on_invalid_priority() {
    let store_path = temp_path("add-priority.json");
    let output = run_session(&store_path, "1\nBuy milk\nurgent\nHIGH\nn\n\n6\n");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("priority must be one of low, medium, high"));

    let stored = read_store(&store_path);
    std::fs::remove_file(&store_path).ok();
    assert_eq!(stored.as_array().unwrap()[0]["priority"], "high");
}

#[test]
fn add_rejects_past_due_dates_until_valid() {
    let store_path = temp_path("add-due.json");
    let output = run_session(
        &store_path,
        "1\nPay rent\nmedium\ny\nsoon\n2000-01-01\n2999-12-31\n\n6\n",
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("due date must be in YYYY-MM-DD format"));
    assert!(stdout.contains("Due date cannot be in the past."));

    let stored = read_store(&store_path);
    std::fs::remove_file(&store_path).ok();
    assert_eq!(stored.as_array().unwrap()[0]["due_date"], "2999-12-31");
}

#[test]
fn add_reprompts_due_date_gate_until_y_or_n() {
    let store_path = temp_path("add-gate.json");
    let output = run_session(&store_path, "1\nBuy milk\nlow\nmaybe\nn\n\n6\n");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Please answer y or n."));

    let stored = read_store(&store_path);
    std::fs::remove_file(&store_path).ok();
    assert!(stored.as_array().unwrap()[0]["due_date"].is_null());
}
