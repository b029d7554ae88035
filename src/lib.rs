pub mod app;
pub mod client;
pub mod commands;
pub mod config;
pub mod demo;
pub mod error;
pub mod model;
pub mod output;
pub mod prompt;
pub mod router;
pub mod session_store;
pub mod stats;
pub mod tui;
pub mod validation;

pub use app::{update, AppState, Effect, Event};
pub use client::{ApiClient, Backend};
pub use demo::DemoBackend;
pub use error::{ProjectFlowError, Result};
pub use model::{Project, ProjectId, Role, Session, Task, TaskStatus, User};
pub use router::{nav_items, resolve_screen, ResolvedScreen, Screen, ViewState};
pub use session_store::SessionStore;
pub use stats::{global_stats, progress_percent, project_summary, GlobalStats, ProjectSummary};
