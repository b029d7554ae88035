//! Dashboard command handler.
//!
//! Launches the interactive terminal dashboard.

use super::CommandContext;
use crate::error::Result;
use crate::tui::run_dashboard;

/// Launch the dashboard and block until the user quits.
///
/// The dashboard shares the command's backend and reads the session from the
/// same store the `login` command writes.
pub fn dashboard_command(ctx: CommandContext) -> Result<()> {
    log::info!("starting dashboard");
    run_dashboard(ctx.backend, ctx.sessions, ctx.config.demo)
}
