//! Terminal output formatting for projectflow.
//!
//! This module provides consistent, colored terminal output for the one-shot
//! CLI commands. Functions are organized by domain:
//!
//! - [`messages`] - Error, warning, info and success messages
//! - [`progress`] - Progress bars and task badges
//! - [`projects`] - Project lists and kanban boards
//! - [`dashboard`] - Session, statistics and dashboard panels
//! - [`users`] - The user directory

pub mod dashboard;
pub mod messages;
pub mod progress;
pub mod projects;
pub mod users;

/// ANSI color codes for terminal output.
pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const RED: &str = "\x1b[31m";
    pub const GRAY: &str = "\x1b[90m";
}

pub use colors::*;

pub use dashboard::{print_active_tasks, print_global_stats, print_recent_projects, print_session};
pub use messages::{print_error, print_info, print_success, print_warning};
pub use progress::{make_progress_bar, priority_badge, status_badge};
pub use projects::{print_project_board, print_project_created, print_project_list, print_task_created};
pub use users::print_user_table;
