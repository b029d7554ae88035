//! CLI command handlers for projectflow.
//!
//! This module contains the implementation of all CLI subcommands.
//! Each command has its own module with handler functions.
//!
//! # Commands
//!
//! - [`session`] - Log in, log out, show the signed-in user
//! - [`projects`] - List, show, create and delete projects and tasks
//! - [`stats`] - Dashboard statistics
//! - [`users`] - The user directory
//! - [`config`] - Show the effective configuration
//! - [`dashboard`] - Interactive terminal dashboard

mod config;
mod dashboard;
mod projects;
mod session;
mod stats;
mod users;

pub use config::config_command;
pub use dashboard::dashboard_command;
pub use projects::{
    add_task_command, create_project_command, delete_project_command, delete_task_command,
    move_task_command, project_command, projects_command,
};
pub use session::{login_command, logout_command, whoami_command};
pub use stats::stats_command;
pub use users::users_command;

use crate::client::{ApiClient, Backend};
use crate::config::Config;
use crate::demo::DemoBackend;
use crate::error::{ProjectFlowError, Result};
use crate::model::Session;
use crate::session_store::SessionStore;
use std::sync::Arc;

/// Everything a command needs: configuration, a backend and the session
/// store.
pub struct CommandContext {
    pub config: Config,
    pub backend: Arc<dyn Backend>,
    pub sessions: SessionStore,
}

impl CommandContext {
    pub fn new(config: Config, sessions: SessionStore) -> Result<Self> {
        let backend = backend_for(&config)?;
        Ok(Self {
            config,
            backend,
            sessions,
        })
    }

    /// The persisted session, or [`ProjectFlowError::NotLoggedIn`].
    pub fn require_session(&self) -> Result<Session> {
        self.sessions.load()?.ok_or(ProjectFlowError::NotLoggedIn)
    }
}

/// Build the backend selected by `config`.
pub fn backend_for(config: &Config) -> Result<Arc<dyn Backend>> {
    if config.demo {
        log::info!("using demo backend");
        Ok(Arc::new(DemoBackend::new()))
    } else {
        log::info!("using API at {}", config.api_url);
        Ok(Arc::new(ApiClient::from_config(config)?))
    }
}
