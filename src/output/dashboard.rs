//! Session, statistics and dashboard panels.

use crate::model::{Project, Session, Task};
use crate::stats::{GlobalStats, ProjectSummary};

use super::colors::*;
use super::progress::{make_progress_bar, priority_badge, status_badge};

/// Print who is signed in.
pub fn print_session(session: &Session) {
    println!("{BLUE}Name:{RESET}  {}", session.display_name);
    println!("{BLUE}Email:{RESET} {}", session.email);
    println!("{BLUE}Role:{RESET}  {}", session.role.label());
}

/// Print the three dashboard counters.
pub fn print_global_stats(stats: &GlobalStats) {
    println!("{BOLD}Dashboard{RESET}");
    println!("  {BLUE}Total tasks:{RESET}   {}", stats.total_tasks);
    println!("  {BLUE}In progress:{RESET}   {}", stats.in_progress_count);
    let overdue_color = if stats.overdue_count > 0 { RED } else { GREEN };
    println!(
        "  {BLUE}Overdue:{RESET}       {}{}{RESET}",
        overdue_color, stats.overdue_count
    );
    println!();
}

/// Print a developer's unfinished tasks.
pub fn print_active_tasks(tasks: &[&Task]) {
    println!("{BOLD}My Active Tasks{RESET}");
    if tasks.is_empty() {
        println!("  {GRAY}Nothing in progress.{RESET}");
    }
    for task in tasks {
        println!(
            "  {} {} {}",
            status_badge(task.status),
            task.title,
            priority_badge(task.priority)
        );
    }
    println!();
}

/// Print the recent projects panel.
pub fn print_recent_projects(projects: &[(&Project, ProjectSummary)]) {
    println!("{BOLD}Recent Projects{RESET}");
    if projects.is_empty() {
        println!("  {GRAY}No projects yet.{RESET}");
    }
    for (project, summary) in projects {
        println!(
            "  {:<28} [{}] {:>3}%",
            project.title,
            make_progress_bar(summary.completed_tasks, summary.total_tasks, 12),
            summary.progress_percent
        );
    }
    println!();
}
