//! Project lists and kanban boards.

use crate::model::{Project, Task, TaskStatus};
use crate::stats::{self, board};
use chrono::{DateTime, Utc};

use super::colors::*;
use super::progress::{make_progress_bar, priority_badge};

const BAR_WIDTH: usize = 20;

/// Print project cards: title, description, progress and team.
pub fn print_project_list(projects: &[&Project]) {
    if projects.is_empty() {
        println!("{GRAY}No projects found.{RESET}");
        return;
    }

    for project in projects {
        let summary = stats::project_summary(project);
        println!(
            "{BOLD}{}{RESET} {GRAY}#{}{RESET}",
            project.title, project.id
        );
        if let Some(description) = &project.description {
            println!("  {GRAY}{}{RESET}", description);
        }
        println!(
            "  [{}] {}% {GRAY}({} tasks){RESET}",
            make_progress_bar(summary.completed_tasks, summary.total_tasks, BAR_WIDTH),
            summary.progress_percent,
            summary.as_fraction()
        );
        if !project.team_members.is_empty() {
            let initials: String = project
                .team_members
                .iter()
                .map(|m| m.initial().to_string())
                .collect::<Vec<_>>()
                .join(" ");
            println!("  {CYAN}Team:{RESET} {}", initials);
        }
        println!();
    }

    println!(
        "{GRAY}({} project{}){RESET}",
        projects.len(),
        if projects.len() == 1 { "" } else { "s" }
    );
}

/// One task line: title, priority, assignee and deadline.
pub fn format_task_line(task: &Task, now: DateTime<Utc>) -> String {
    let mut line = format!("{} {}", task.title, priority_badge(task.priority));
    if let Some(assignee) = &task.assignee {
        line.push_str(&format!(" {CYAN}@{}{RESET}", assignee.name));
    }
    if let Some(deadline) = task.deadline {
        let date = deadline.format("%Y-%m-%d");
        if stats::is_overdue(task, now) {
            line.push_str(&format!(" {RED}due {} (overdue){RESET}", date));
        } else {
            line.push_str(&format!(" {GRAY}due {}{RESET}", date));
        }
    }
    line
}

/// Print a project as a three-column kanban, one column after another.
pub fn print_project_board(project: &Project, now: DateTime<Utc>) {
    let summary = stats::project_summary(project);
    println!("{BOLD}{}{RESET} {GRAY}#{}{RESET}", project.title, project.id);
    if let Some(description) = &project.description {
        println!("{GRAY}{}{RESET}", description);
    }
    println!(
        "{BLUE}Progress:{RESET} [{}] {}% ({} tasks)",
        make_progress_bar(summary.completed_tasks, summary.total_tasks, BAR_WIDTH),
        summary.progress_percent,
        summary.as_fraction()
    );
    println!();

    let board = board(&project.tasks);
    for status in TaskStatus::all() {
        let column = board.column(*status);
        println!("{BOLD}{}{RESET} {GRAY}({}){RESET}", status.label(), column.len());
        if column.is_empty() {
            println!("  {GRAY}-{RESET}");
        }
        for task in column {
            println!("  - {}", format_task_line(task, now));
        }
        println!();
    }
}

/// Print confirmation for a created project.
pub fn print_project_created(project: &Project) {
    println!(
        "{GREEN}Project created:{RESET} {BOLD}{}{RESET} (id {})",
        project.title, project.id
    );
}

/// Print confirmation for a created task.
pub fn print_task_created(project_id: &str, task: &Task) {
    println!(
        "{GREEN}Task added:{RESET} {BOLD}{}{RESET} to project {} (id {})",
        task.title, project_id, task.id
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, TeamMember};
    use chrono::{NaiveDate, TimeZone};

    fn task(deadline: Option<NaiveDate>, status: TaskStatus) -> Task {
        Task {
            id: "1".to_string(),
            title: "Payment gateway".to_string(),
            description: None,
            assignee: Some(TeamMember {
                id: "2".to_string(),
                name: "Bob".to_string(),
            }),
            deadline,
            status,
            priority: Priority::High,
        }
    }

    #[test]
    fn test_task_line_marks_overdue() {
        let now = Utc.with_ymd_and_hms(2025, 10, 20, 12, 0, 0).unwrap();
        let past = NaiveDate::from_ymd_opt(2025, 10, 1);

        let line = format_task_line(&task(past, TaskStatus::Todo), now);
        assert!(line.contains("Payment gateway"));
        assert!(line.contains("@Bob"));
        assert!(line.contains("due 2025-10-01 (overdue)"));

        let line = format_task_line(&task(past, TaskStatus::Done), now);
        assert!(!line.contains("overdue"));
    }

    #[test]
    fn test_task_line_without_deadline() {
        let now = Utc.with_ymd_and_hms(2025, 10, 20, 12, 0, 0).unwrap();
        let line = format_task_line(&task(None, TaskStatus::InProgress), now);
        assert!(!line.contains("due"));
    }
}
