use clap::Parser;
use std::path::PathBuf;
use tracker_core::error::AppError;
use tracker_core::task_api::FilterKind;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path of the JSON task store (defaults to tasks.json)
    #[arg(long, value_name = "PATH")]
    pub store_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Add,
    View,
    Complete,
    Delete,
    Search,
    Exit,
}

pub fn parse_menu_choice(raw: &str) -> Option<MenuChoice> {
    match raw.trim() {
        "1" => Some(MenuChoice::Add),
        "2" => Some(MenuChoice::View),
        "3" => Some(MenuChoice::Complete),
        "4" => Some(MenuChoice::Delete),
        "5" => Some(MenuChoice::Search),
        "6" => Some(MenuChoice::Exit),
        _ => None,
    }
}

/// Accepts the menu number or the mode name.
pub fn parse_view_mode(raw: &str) -> Option<FilterKind> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "all" => Some(FilterKind::All),
        "2" | "completed" => Some(FilterKind::Completed),
        "3" | "pending" => Some(FilterKind::Pending),
        _ => None,
    }
}

pub fn parse_task_id(raw: &str) -> Result<u32, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::invalid_input("please enter a numeric task id"))
}
