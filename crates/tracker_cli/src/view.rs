use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracker_core::model::Task;
use tracker_core::task_api::TaskCounts;

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "St")]
    status: &'static str,
    #[tabled(rename = "Id")]
    id: u32,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Completed")]
    completed: String,
}

pub fn status_marker(task: &Task) -> &'static str {
    if task.completed { "[x]" } else { "[ ]" }
}

pub fn render_table(tasks: &[&Task]) -> String {
    let rows: Vec<TaskRow> = tasks
        .iter()
        .map(|task| TaskRow {
            status: status_marker(task),
            id: task.id,
            description: task.description.clone(),
            priority: task.priority.to_string(),
            created: task.created_at.clone(),
            due: task.due_date.clone().unwrap_or_else(|| "-".to_string()),
            completed: task
                .completed_at
                .clone()
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    Table::new(rows).with(Style::psql()).to_string()
}

pub fn summary_line(counts: TaskCounts) -> String {
    format!(
        "Total: {} | Completed: {} | Pending: {}",
        counts.total, counts.completed, counts.pending
    )
}

pub fn search_line(task: &Task) -> String {
    format!("{} [{}] {}", status_marker(task), task.id, task.description)
}
