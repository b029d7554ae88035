//! Progress bars and task badges.

use crate::model::{Priority, TaskStatus};

use super::colors::*;

/// Make a progress bar string.
pub fn make_progress_bar(completed: usize, total: usize, width: usize) -> String {
    if total == 0 {
        return format!("{GRAY}{}{RESET}", "░".repeat(width));
    }
    let filled = (completed.min(total) * width) / total;
    let empty = width - filled;
    format!(
        "{GREEN}{}{RESET}{GRAY}{}{RESET}",
        "█".repeat(filled),
        "░".repeat(empty)
    )
}

fn status_color(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => GRAY,
        TaskStatus::InProgress => BLUE,
        TaskStatus::Done => GREEN,
    }
}

fn priority_color(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => GREEN,
        Priority::Medium => YELLOW,
        Priority::High => RED,
    }
}

/// Colored `[status]` badge.
pub fn status_badge(status: TaskStatus) -> String {
    format!("{}[{}]{RESET}", status_color(status), status.label())
}

/// Colored `priority` badge.
pub fn priority_badge(priority: Priority) -> String {
    format!("{}{}{RESET}", priority_color(priority), priority.label())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(s: &str) -> String {
        let mut out = String::new();
        let mut in_escape = false;
        for c in s.chars() {
            match (in_escape, c) {
                (false, '\x1b') => in_escape = true,
                (true, 'm') => in_escape = false,
                (false, c) => out.push(c),
                _ => {}
            }
        }
        out
    }

    #[test]
    fn test_progress_bar_width() {
        assert_eq!(strip(&make_progress_bar(2, 6, 12)), "████░░░░░░░░");
        assert_eq!(strip(&make_progress_bar(3, 3, 5)), "█████");
        assert_eq!(strip(&make_progress_bar(0, 0, 4)), "░░░░");
    }

    #[test]
    fn test_progress_bar_clamps_overflow() {
        assert_eq!(strip(&make_progress_bar(9, 3, 3)), "███");
    }

    #[test]
    fn test_badges_carry_labels() {
        assert_eq!(strip(&status_badge(TaskStatus::InProgress)), "[In Progress]");
        assert_eq!(strip(&priority_badge(Priority::High)), "High");
    }
}
