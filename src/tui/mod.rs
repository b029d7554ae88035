//! Terminal dashboard.
//!
//! A ratatui front end over the [`crate::app`] reducer: a tab header for the
//! role's navigation, one view per resolved screen, a notice line and key
//! help. Backend calls run on worker threads and report back over a channel.

pub mod app;
pub mod forms;
pub mod ui;

pub use app::{run_dashboard, DashboardApp};
