use crate::error::AppError;
use crate::model::{Priority, Task};
use crate::storage::json_store;
use std::path::{Path, PathBuf};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset};

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    All,
    Completed,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskCounts {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

/// The in-memory task collection for one session, bound to its backing
/// file. Constructed once at startup and handed to each command; commands
/// mutate it and then call [`TaskStore::persist`].
#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
}

#[derive(Debug)]
pub struct StoreOpen {
    pub store: TaskStore,
    pub error: Option<AppError>,
}

impl TaskStore {
    /// Opens the store leniently: a corrupt or unreadable file starts the
    /// session empty, with the load error surfaced for reporting.
    pub fn open(path: PathBuf) -> StoreOpen {
        let loaded = json_store::load_tasks_with_fallback(&path);
        StoreOpen {
            store: TaskStore {
                path,
                tasks: loaded.tasks,
            },
            error: loaded.error,
        }
    }

    pub fn with_tasks(path: PathBuf, tasks: Vec<Task>) -> Self {
        Self { path, tasks }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn find(&self, id: u32) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn persist(&self) -> Result<(), AppError> {
        json_store::save_tasks(&self.path, &self.tasks)
    }

    /// Appends a new pending task. The id is the new length of the
    /// collection; deletion renumbers, so the sequence stays dense and this
    /// never collides. A max-id scheme would behave identically under that
    /// invariant.
    pub fn add(
        &mut self,
        description: &str,
        priority: Priority,
        due_date: Option<Date>,
    ) -> Result<Task, AppError> {
        let trimmed = description.trim();
        if trimmed.is_empty() {
            return Err(AppError::invalid_input("task description cannot be empty"));
        }

        if let Some(due) = due_date
            && due < today()
        {
            return Err(AppError::invalid_input("due date cannot be in the past"));
        }

        let task = Task {
            id: self.tasks.len() as u32 + 1,
            description: trimmed.to_string(),
            completed: false,
            created_at: now_stamp()?,
            completed_at: None,
            priority,
            due_date: due_date.map(format_due_date).transpose()?,
        };

        self.tasks.push(task.clone());
        Ok(task)
    }

    /// First match wins; completion is one-way and stamps `completed_at`
    /// exactly once.
    pub fn complete(&mut self, id: u32) -> Result<Task, AppError> {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            return Err(AppError::not_found(format!("task {id} not found")));
        };

        if task.completed {
            return Err(AppError::invalid_input(format!(
                "task {id} is already completed"
            )));
        }

        let stamp = now_stamp()?;
        task.completed = true;
        task.completed_at = Some(stamp);
        Ok(task.clone())
    }

    /// Removes the task and renumbers every survivor to its 1-based
    /// position, keeping ids dense and positional.
    pub fn delete(&mut self, id: u32) -> Result<Task, AppError> {
        let index = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| AppError::not_found(format!("task {id} not found")))?;

        let removed = self.tasks.remove(index);
        for (position, task) in self.tasks.iter_mut().enumerate() {
            task.id = position as u32 + 1;
        }
        Ok(removed)
    }

    pub fn filter(&self, kind: FilterKind) -> Vec<&Task> {
        filter_tasks(&self.tasks, kind)
    }

    pub fn search(&self, term: &str) -> Vec<&Task> {
        search_tasks(&self.tasks, term)
    }

    pub fn counts(&self) -> TaskCounts {
        let completed = self.tasks.iter().filter(|task| task.completed).count();
        TaskCounts {
            total: self.tasks.len(),
            completed,
            pending: self.tasks.len() - completed,
        }
    }
}

/// Pure derived view; relative order is preserved.
pub fn filter_tasks(tasks: &[Task], kind: FilterKind) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| match kind {
            FilterKind::All => true,
            FilterKind::Completed => task.completed,
            FilterKind::Pending => !task.completed,
        })
        .collect()
}

/// Case-insensitive substring match on descriptions.
pub fn search_tasks<'a>(tasks: &'a [Task], term: &str) -> Vec<&'a Task> {
    let needle = term.trim().to_lowercase();
    tasks
        .iter()
        .filter(|task| task.description.to_lowercase().contains(&needle))
        .collect()
}

fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

pub fn today() -> Date {
    OffsetDateTime::now_utc().to_offset(local_offset()).date()
}

pub fn now_stamp() -> Result<String, AppError> {
    OffsetDateTime::now_utc()
        .to_offset(local_offset())
        .format(TIMESTAMP_FORMAT)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}

pub fn parse_due_date(raw: &str) -> Result<Date, AppError> {
    Date::parse(raw.trim(), DATE_FORMAT)
        .map_err(|_| AppError::invalid_input("due date must be in YYYY-MM-DD format"))
}

fn format_due_date(due: Date) -> Result<String, AppError> {
    due.format(DATE_FORMAT)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}
