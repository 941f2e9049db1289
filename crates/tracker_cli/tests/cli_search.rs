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

fn write_store(store_path: &Path, tasks: serde_json::Value) {
    std::fs::write(store_path, serde_json::to_string_pretty(&tasks).unwrap()).unwrap();
}

fn sample_tasks() -> serde_json::Value {
    serde_json::json!([
        {
            "id": 1,
            "description": "Buy milk",
            "completed": false,
            "created_at": "2026-08-01 09:00:00",
            "priority": "high"
        },
        {
            "id": 2,
            "description": "Buy bread",
            "completed": true,
            "created_at": "2026-08-01 09:01:00",
            "completed_at": "2026-08-02 10:00:00",
            "priority": "low"
        },
        {
            "id": 3,
            "description": "Call mom",
            "completed": false,
            "created_at": "2026-08-01 09:02:00",
            "priority": "medium"
        }
    ])
}

#[test]
fn search_prints_matches_with_header_and_footer() {
    let store_path = temp_path("search.json");
    write_store(&store_path, sample_tasks());

    let output = run_session(&store_path, "5\nBUY\n\n6\n");
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Tasks matching 'BUY':"));
    assert!(stdout.contains("[ ] [1] Buy milk"));
    assert!(stdout.contains("[x] [2] Buy bread"));
    assert!(!stdout.contains("Call mom"));
    assert!(stdout.contains("Found 2 matching task(s)."));
}

#[test]
fn search_reports_no_matches() {
    let store_path = temp_path("search-none.json");
    write_store(&store_path, sample_tasks());

    let output = run_session(&store_path, "5\nzzz\n\n6\n");
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No tasks matching 'zzz'."));
}

#[test]
fn search_does_not_modify_the_store() {
    let store_path = temp_path("search-pure.json");
    write_store(&store_path, sample_tasks());
    let before = std::fs::read_to_string(&store_path).unwrap();

    let output = run_session(&store_path, "5\nmilk\n\n6\n");
    let after = std::fs::read_to_string(&store_path).unwrap();
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    assert_eq!(before, after);
}
