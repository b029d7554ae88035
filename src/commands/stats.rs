//! Stats command handler.
//!
//! Prints the dashboard: global task counters, a developer's own active
//! tasks, and the most recent projects.

use super::CommandContext;
use crate::error::Result;
use crate::model::Role;
use crate::output::{print_active_tasks, print_global_stats, print_recent_projects};
use crate::stats::{
    active_tasks, all_tasks, global_stats, recent_projects, GlobalStats, PANEL_SIZE,
};
use chrono::Utc;

pub fn stats_command(ctx: &CommandContext) -> Result<GlobalStats> {
    let session = ctx.require_session()?;
    let projects = ctx.backend.list_projects()?;

    let stats = global_stats(all_tasks(&projects), Utc::now());
    print_global_stats(&stats);

    if session.role == Role::Developer {
        print_active_tasks(&active_tasks(all_tasks(&projects), PANEL_SIZE));
    }
    print_recent_projects(&recent_projects(&projects, PANEL_SIZE));

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{demo_context, login_as};
    use super::*;

    #[test]
    fn test_stats_over_demo_projects() {
        let (ctx, _dir) = demo_context();
        login_as(&ctx, "dev@projectflow.com", "dev123");

        let projects = ctx.backend.list_projects().unwrap();
        let expected: usize = projects.iter().map(|p| p.tasks.len()).sum();

        let stats = stats_command(&ctx).unwrap();
        assert_eq!(stats.total_tasks, expected);
        assert!(stats.in_progress_count <= stats.total_tasks);
        assert!(stats.overdue_count <= stats.total_tasks);
    }
}
