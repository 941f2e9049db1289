use crate::config::Config;
use crate::error::AppError;
use crate::model::Task;
use serde::Serialize;
use std::path::{Path, PathBuf};

const STORE_FILE_NAME: &str = "tasks.json";
const STORE_ENV_VAR: &str = "TASKTRACKER_STORE_PATH";

/// Result of a lenient load: a corrupt or unreadable store degrades to an
/// empty list, with the underlying error kept for the UI to report.
#[derive(Debug, Clone)]
pub struct StoreLoad {
    pub tasks: Vec<Task>,
    pub error: Option<AppError>,
}

/// Resolution order: explicit flag, `TASKTRACKER_STORE_PATH`, the config
/// file, then `tasks.json` in the working directory.
pub fn resolve_store_path(flag: Option<PathBuf>, config: &Config) -> PathBuf {
    if let Some(path) = flag {
        return path;
    }

    if let Ok(path) = std::env::var(STORE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return PathBuf::from(path);
    }

    if let Some(path) = config.store_path.as_ref() {
        return path.clone();
    }

    PathBuf::from(STORE_FILE_NAME)
}

pub fn load_tasks(path: &Path) -> Result<Vec<Task>, AppError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path).map_err(|err| AppError::io(err.to_string()))?;
    let tasks =
        serde_json::from_str(&content).map_err(|err| AppError::invalid_data(err.to_string()))?;
    Ok(tasks)
}

/// A missing file is a normal first run. Anything else that prevents a read
/// is demoted to an empty list so the session can still start; the file's
/// previous contents are lost on the next save.
pub fn load_tasks_with_fallback(path: &Path) -> StoreLoad {
    match load_tasks(path) {
        Ok(tasks) => StoreLoad { tasks, error: None },
        Err(err) => StoreLoad {
            tasks: Vec::new(),
            error: Some(err),
        },
    }
}

/// Overwrites the whole file in place; there is no atomic rename, so a
/// crash mid-write can corrupt the store.
pub fn save_tasks(path: &Path, tasks: &[Task]) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|err| AppError::io(err.to_string()))?;
    }

    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    tasks
        .serialize(&mut serializer)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    std::fs::write(path, buffer).map_err(|err| AppError::io(err.to_string()))?;

    Ok(())
}
