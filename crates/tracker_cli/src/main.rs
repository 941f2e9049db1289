use clap::Parser;
use std::io::{self, BufRead, Write};
use time::Date;
use tracker_cli::cli::{self, Cli, MenuChoice};
use tracker_cli::view;
use tracker_core::config;
use tracker_core::error::AppError;
use tracker_core::model::Priority;
use tracker_core::storage::json_store;
use tracker_core::task_api::{FilterKind, TaskStore, parse_due_date, today};

const MENU_WIDTH: usize = 50;

/// Whether the menu loop keeps running after a command. Quit covers both
/// the Exit choice and end-of-input on stdin.
enum Flow {
    Continue,
    Quit,
}

fn divider() -> String {
    "=".repeat(MENU_WIDTH)
}

fn print_menu() {
    println!();
    println!("{}", divider());
    println!("TASK TRACKER MENU");
    println!("{}", divider());
    println!("1. Add a new task");
    println!("2. View tasks");
    println!("3. Mark a task as complete");
    println!("4. Delete a task");
    println!("5. Search tasks");
    println!("6. Exit");
    println!("{}", divider());
}

/// Prints the prompt without a newline and reads one trimmed line.
/// `None` means stdin is exhausted.
fn prompt_line<R: BufRead>(input: &mut R, label: &str) -> Result<Option<String>, AppError> {
    print!("{label}");
    let _ = io::stdout().flush();

    let mut line = String::new();
    let bytes = input
        .read_line(&mut line)
        .map_err(|err| AppError::io(err.to_string()))?;
    if bytes == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn pause<R: BufRead>(input: &mut R) -> Result<Flow, AppError> {
    match prompt_line(input, "\nPress Enter to continue...")? {
        Some(_) => Ok(Flow::Continue),
        None => Ok(Flow::Quit),
    }
}

fn report_persist(store: &TaskStore, success: &str) {
    match store.persist() {
        Ok(()) => println!("{success}"),
        Err(err) => eprintln!("ERROR: failed to save tasks: {err}"),
    }
}

fn run_add<R: BufRead>(input: &mut R, store: &mut TaskStore) -> Result<Flow, AppError> {
    let description = loop {
        match prompt_line(input, "\nEnter task description: ")? {
            None => return Ok(Flow::Quit),
            Some(line) if line.is_empty() => println!("Task description cannot be empty."),
            Some(line) => break line,
        }
    };

    let priority = loop {
        match prompt_line(input, "Enter a task priority (low, medium, high): ")? {
            None => return Ok(Flow::Quit),
            Some(line) => match line.parse::<Priority>() {
                Ok(priority) => break priority,
                Err(err) => println!("{}", err.message()),
            },
        }
    };

    let wants_due_date = loop {
        match prompt_line(input, "Add a due date? (y/n): ")? {
            None => return Ok(Flow::Quit),
            Some(line) => match line.to_ascii_lowercase().as_str() {
                "y" => break true,
                "n" => break false,
                _ => println!("Please answer y or n."),
            },
        }
    };

    let due_date = if wants_due_date {
        match read_due_date(input)? {
            Some(date) => Some(date),
            None => return Ok(Flow::Quit),
        }
    } else {
        None
    };

    match store.add(&description, priority, due_date) {
        Ok(task) => report_persist(
            store,
            &format!("Task added: {} ({})", task.description, task.id),
        ),
        Err(err) => println!("{}", err.message()),
    }

    pause(input)
}

fn read_due_date<R: BufRead>(input: &mut R) -> Result<Option<Date>, AppError> {
    loop {
        match prompt_line(input, "Enter due date (YYYY-MM-DD): ")? {
            None => return Ok(None),
            Some(line) => match parse_due_date(&line) {
                Ok(date) if date < today() => println!("Due date cannot be in the past."),
                Ok(date) => return Ok(Some(date)),
                Err(err) => println!("{}", err.message()),
            },
        }
    }
}

fn run_view<R: BufRead>(input: &mut R, store: &TaskStore) -> Result<Flow, AppError> {
    let mode = loop {
        match prompt_line(input, "\nShow which tasks? (1 all / 2 completed / 3 pending): ")? {
            None => return Ok(Flow::Quit),
            Some(line) => match cli::parse_view_mode(&line) {
                Some(mode) => break mode,
                None => println!("Please choose 1, 2 or 3."),
            },
        }
    };

    let tasks = store.filter(mode);
    if tasks.is_empty() {
        match mode {
            FilterKind::All => println!("\nNo tasks found. Start by adding a task!"),
            FilterKind::Completed => println!("\nNo completed tasks found."),
            FilterKind::Pending => println!("\nNo pending tasks found."),
        }
        return Ok(Flow::Continue);
    }

    println!("\n{}", view::render_table(&tasks));
    if mode == FilterKind::All {
        println!("{}", view::summary_line(store.counts()));
    }

    Ok(Flow::Continue)
}

fn run_complete<R: BufRead>(input: &mut R, store: &mut TaskStore) -> Result<Flow, AppError> {
    if store.is_empty() {
        println!("\nNo tasks to mark as complete.");
        return pause(input);
    }

    let pending = store.filter(FilterKind::Pending);
    if !pending.is_empty() {
        println!("\n{}", view::render_table(&pending));
    }

    let line = match prompt_line(input, "Enter task ID to mark as complete: ")? {
        None => return Ok(Flow::Quit),
        Some(line) => line,
    };

    match cli::parse_task_id(&line) {
        Err(err) => println!("{}", err.message()),
        Ok(id) => match store.complete(id) {
            Ok(task) => report_persist(store, &format!("Task {} marked as complete.", task.id)),
            Err(err) => println!("{}", err.message()),
        },
    }

    pause(input)
}

fn run_delete<R: BufRead>(input: &mut R, store: &mut TaskStore) -> Result<Flow, AppError> {
    if store.is_empty() {
        println!("\nNo tasks to delete.");
        return pause(input);
    }

    println!("\n{}", view::render_table(&store.filter(FilterKind::All)));

    let line = match prompt_line(input, "Enter task ID to delete: ")? {
        None => return Ok(Flow::Quit),
        Some(line) => line,
    };

    let id = match cli::parse_task_id(&line) {
        Ok(id) => id,
        Err(err) => {
            println!("{}", err.message());
            return pause(input);
        }
    };

    let Some(task) = store.find(id) else {
        println!("Task {id} not found.");
        return pause(input);
    };

    let confirmation = match prompt_line(
        input,
        &format!(
            "Are you sure you want to delete '{}'? (y/n): ",
            task.description
        ),
    )? {
        None => return Ok(Flow::Quit),
        Some(line) => line,
    };

    if !confirmation.eq_ignore_ascii_case("y") {
        println!("Deletion cancelled.");
        return pause(input);
    }

    match store.delete(id) {
        Ok(task) => report_persist(store, &format!("Task deleted: {}", task.description)),
        Err(err) => println!("{}", err.message()),
    }

    pause(input)
}

fn run_search<R: BufRead>(input: &mut R, store: &TaskStore) -> Result<Flow, AppError> {
    let term = match prompt_line(input, "\nEnter a search term: ")? {
        None => return Ok(Flow::Quit),
        Some(line) if line.is_empty() => {
            println!("Search term cannot be empty.");
            return pause(input);
        }
        Some(line) => line,
    };

    let matches = store.search(&term);
    if matches.is_empty() {
        println!("No tasks matching '{term}'.");
        return pause(input);
    }

    println!("\nTasks matching '{term}':");
    for task in &matches {
        println!("{}", view::search_line(task));
    }
    println!("Found {} matching task(s).", matches.len());

    pause(input)
}

fn run_menu<R: BufRead>(input: &mut R, store: &mut TaskStore) -> Result<(), AppError> {
    loop {
        print_menu();

        let choice = match prompt_line(input, "Enter your choice (1-6): ")? {
            None => break,
            Some(line) => line,
        };

        let flow = match cli::parse_menu_choice(&choice) {
            Some(MenuChoice::Add) => run_add(input, store)?,
            Some(MenuChoice::View) => run_view(input, store)?,
            Some(MenuChoice::Complete) => run_complete(input, store)?,
            Some(MenuChoice::Delete) => run_delete(input, store)?,
            Some(MenuChoice::Search) => run_search(input, store)?,
            Some(MenuChoice::Exit) => {
                println!("\nYour tasks are saved. Goodbye!");
                break;
            }
            None => {
                println!("Invalid choice, please enter a number between 1 and 6.");
                pause(input)?
            }
        };

        if let Flow::Quit = flow {
            break;
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let config_load = config::load_config_with_fallback();
    if let Some(err) = config_load.error.as_ref() {
        eprintln!("WARNING: ignoring config: {err}");
    }

    let store_path = json_store::resolve_store_path(cli.store_path, &config_load.config);
    let opened = TaskStore::open(store_path);
    if let Some(err) = opened.error.as_ref() {
        eprintln!("WARNING: task store is unreadable ({err}); starting with an empty task list");
    }
    let mut store = opened.store;

    println!("Welcome to Task Tracker!");

    let stdin = io::stdin();
    let mut input = stdin.lock();
    if let Err(err) = run_menu(&mut input, &mut store) {
        eprintln!("ERROR: {err}");
        std::process::exit(1);
    }
}
