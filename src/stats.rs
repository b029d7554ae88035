//! Derived statistics for the dashboard.
//!
//! Everything here is computed on demand from a snapshot of projects and
//! never stored. Functions only borrow their input.

use crate::model::{Project, Task, TaskStatus, User};
use chrono::{DateTime, Utc};

/// Progress of a single project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProjectSummary {
    pub progress_percent: u8,
    pub total_tasks: usize,
    pub completed_tasks: usize,
}

impl ProjectSummary {
    /// Format progress as a fraction string (e.g., "2/4 tasks")
    pub fn as_fraction(&self) -> String {
        format!("{}/{} tasks", self.completed_tasks, self.total_tasks)
    }
}

/// Counts over every task of every project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlobalStats {
    pub total_tasks: usize,
    pub in_progress_count: usize,
    pub overdue_count: usize,
}

/// Percentage of `completed` over `total`, rounded half up. Zero when there is
/// nothing to complete.
pub fn progress_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total) as u64;
    let total = total as u64;
    ((200 * completed + total) / (2 * total)) as u8
}

pub fn project_summary(project: &Project) -> ProjectSummary {
    let total_tasks = project.tasks.len();
    let completed_tasks = project
        .tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Done)
        .count();
    ProjectSummary {
        progress_percent: progress_percent(completed_tasks, total_tasks),
        total_tasks,
        completed_tasks,
    }
}

/// Whether `task` is past its deadline at `now`.
///
/// A deadline is a calendar date and counts as passed from the start of that
/// day (UTC). Tasks without a deadline and finished tasks are never overdue.
pub fn is_overdue(task: &Task, now: DateTime<Utc>) -> bool {
    if task.status == TaskStatus::Done {
        return false;
    }
    match task.deadline {
        Some(deadline) => deadline.and_hms_opt(0, 0, 0).map(|d| d.and_utc()) < Some(now),
        None => false,
    }
}

pub fn global_stats<'a, I>(tasks: I, now: DateTime<Utc>) -> GlobalStats
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks
        .into_iter()
        .fold(GlobalStats::default(), |mut stats, task| {
            stats.total_tasks += 1;
            if task.status == TaskStatus::InProgress {
                stats.in_progress_count += 1;
            }
            if is_overdue(task, now) {
                stats.overdue_count += 1;
            }
            stats
        })
}

/// Every task of every project, in project order.
pub fn all_tasks(projects: &[Project]) -> impl Iterator<Item = &Task> {
    projects.iter().flat_map(|p| p.tasks.iter())
}

/// Tasks of one project split into kanban columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Board<'a> {
    pub todo: Vec<&'a Task>,
    pub in_progress: Vec<&'a Task>,
    pub done: Vec<&'a Task>,
}

impl<'a> Board<'a> {
    pub fn column(&self, status: TaskStatus) -> &[&'a Task] {
        match status {
            TaskStatus::Todo => &self.todo,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::Done => &self.done,
        }
    }
}

pub fn board(tasks: &[Task]) -> Board<'_> {
    let mut board = Board::default();
    for task in tasks {
        match task.status {
            TaskStatus::Todo => board.todo.push(task),
            TaskStatus::InProgress => board.in_progress.push(task),
            TaskStatus::Done => board.done.push(task),
        }
    }
    board
}

/// Projects whose title contains `query`, ignoring case.
pub fn filter_projects<'a>(projects: &'a [Project], query: &str) -> Vec<&'a Project> {
    let needle = query.trim().to_lowercase();
    projects
        .iter()
        .filter(|p| needle.is_empty() || p.title.to_lowercase().contains(&needle))
        .collect()
}

/// Users whose name or email contains `query`, ignoring case.
pub fn filter_users<'a>(users: &'a [User], query: &str) -> Vec<&'a User> {
    let needle = query.trim().to_lowercase();
    users
        .iter()
        .filter(|u| {
            needle.is_empty()
                || u.name.to_lowercase().contains(&needle)
                || u.email.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Number of entries in the dashboard's "My Active Tasks" and "Recent
/// Projects" panels.
pub const PANEL_SIZE: usize = 3;

/// The first `limit` unfinished tasks.
pub fn active_tasks<'a, I>(tasks: I, limit: usize) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks
        .into_iter()
        .filter(|t| t.status != TaskStatus::Done)
        .take(limit)
        .collect()
}

/// The first `limit` projects paired with their summaries.
pub fn recent_projects(projects: &[Project], limit: usize) -> Vec<(&Project, ProjectSummary)> {
    projects
        .iter()
        .take(limit)
        .map(|p| (p, project_summary(p)))
        .collect()
}
