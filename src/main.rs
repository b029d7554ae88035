//! projectflow CLI entry point.
//!
//! Parses command-line arguments and dispatches to the appropriate command handler.

use clap::{Parser, Subcommand};
use projectflow::commands::{
    add_task_command, config_command, create_project_command, dashboard_command,
    delete_project_command, delete_task_command, login_command, logout_command,
    move_task_command, project_command, projects_command, stats_command, users_command,
    whoami_command, CommandContext,
};
use projectflow::config::{ensure_config_dir, get_effective_config, validate_config, Config};
use projectflow::model::{Priority, TaskStatus};
use projectflow::output::print_error;
use projectflow::validation::TaskForm;
use projectflow::{ProjectFlowError, Result, SessionStore};
use std::fs::OpenOptions;

/// Log file used while the dashboard owns the terminal.
const LOG_FILENAME: &str = "projectflow.log";

#[derive(Parser)]
#[command(name = "projectflow")]
#[command(
    version,
    about = "Terminal client for the ProjectFlow project management service",
    after_help = "EXAMPLES:
    # Open the dashboard against the built-in demo data
    projectflow --demo

    # Sign in and list projects from the API
    projectflow login --email manager@projectflow.com
    projectflow projects --search mobile

    # Show one project as a kanban board
    projectflow project 2

    # Move a task to the done column
    projectflow move-task 7 --status done"
)]
struct Cli {
    /// Use the built-in demo data instead of the API
    #[arg(long, global = true)]
    demo: bool,

    /// Base URL of the ProjectFlow API (overrides config)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive dashboard (default)
    Dashboard,

    /// Sign in and remember the session
    Login {
        /// Account email (prompted for when omitted)
        #[arg(long)]
        email: Option<String>,

        /// Account password (prompted for when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the remembered session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// List projects
    Projects {
        /// Only show projects whose title contains this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show a project as a kanban board
    Project {
        /// Project id
        id: String,
    },

    /// Show dashboard statistics
    Stats,

    /// List users
    Users {
        /// Only show users whose name or email contains this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Create a project (admins and managers)
    CreateProject {
        #[arg(long)]
        title: String,

        #[arg(long)]
        description: Option<String>,
    },

    /// Add a task to a project
    AddTask {
        /// Project id
        project: String,

        #[arg(long)]
        title: String,

        /// Deadline as YYYY-MM-DD
        #[arg(long)]
        deadline: String,

        #[arg(long)]
        description: Option<String>,

        /// todo, in-progress or done
        #[arg(long, default_value = "todo", value_parser = parse_status)]
        status: TaskStatus,

        /// low, medium or high
        #[arg(long, default_value = "medium", value_parser = parse_priority)]
        priority: Priority,

        /// Id of the team member to assign
        #[arg(long)]
        assignee: Option<String>,
    },

    /// Move a task to another column
    MoveTask {
        /// Task id
        task: String,

        /// todo, in-progress or done
        #[arg(long, value_parser = parse_status)]
        status: TaskStatus,
    },

    /// Delete a task
    DeleteTask {
        /// Task id
        task: String,
    },

    /// Delete a project and its tasks (admins and managers)
    DeleteProject {
        /// Project id
        id: String,
    },

    /// Show the effective configuration
    Config,
}

fn parse_status(s: &str) -> std::result::Result<TaskStatus, String> {
    s.parse()
}

fn parse_priority(s: &str) -> std::result::Result<Priority, String> {
    s.parse()
}

/// Apply command-line overrides on top of the file and environment config.
fn apply_flags(mut config: Config, cli: &Cli) -> Config {
    if cli.demo {
        config.demo = true;
    }
    if let Some(url) = &cli.api_url {
        config.api_url = url.trim().to_string();
    }
    config
}

/// Initialize logging. `RUST_LOG` wins over the default level. The dashboard
/// logs to a file so log lines don't corrupt the screen.
fn init_logging(verbose: bool, to_file: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));

    if to_file {
        let file = ensure_config_dir().and_then(|(dir, _)| {
            Ok(OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join(LOG_FILENAME))?)
        });
        match file {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(_) => {
                // Nowhere safe to write while the TUI is up
                builder.filter_level(log::LevelFilter::Off);
            }
        }
    }

    let _ = builder.try_init();
}

fn run(cli: Cli) -> Result<()> {
    let config = apply_flags(get_effective_config()?, &cli);
    validate_config(&config).map_err(|e| ProjectFlowError::Config(e.to_string()))?;

    let sessions = SessionStore::new()?;
    let ctx = CommandContext::new(config, sessions)?;

    match cli.command {
        None | Some(Commands::Dashboard) => dashboard_command(ctx),
        Some(Commands::Login { email, password }) => {
            login_command(&ctx, email.as_deref(), password.as_deref()).map(|_| ())
        }
        Some(Commands::Logout) => logout_command(&ctx),
        Some(Commands::Whoami) => whoami_command(&ctx),
        Some(Commands::Projects { search }) => {
            projects_command(&ctx, search.as_deref()).map(|_| ())
        }
        Some(Commands::Project { id }) => project_command(&ctx, &id).map(|_| ()),
        Some(Commands::Stats) => stats_command(&ctx).map(|_| ()),
        Some(Commands::Users { search }) => users_command(&ctx, search.as_deref()).map(|_| ()),
        Some(Commands::CreateProject { title, description }) => {
            create_project_command(&ctx, &title, description.as_deref()).map(|_| ())
        }
        Some(Commands::AddTask {
            project,
            title,
            deadline,
            description,
            status,
            priority,
            assignee,
        }) => {
            let form = TaskForm {
                title,
                description: description.unwrap_or_default(),
                deadline,
                status,
                priority,
                assignee_id: assignee,
            };
            add_task_command(&ctx, &project, &form).map(|_| ())
        }
        Some(Commands::MoveTask { task, status }) => {
            move_task_command(&ctx, &task, status).map(|_| ())
        }
        Some(Commands::DeleteTask { task }) => delete_task_command(&ctx, &task),
        Some(Commands::DeleteProject { id }) => delete_project_command(&ctx, &id),
        Some(Commands::Config) => config_command(&ctx.config),
    }
}

fn main() {
    let cli = Cli::parse();
    let is_dashboard = matches!(cli.command, None | Some(Commands::Dashboard));
    init_logging(cli.verbose, is_dashboard);

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
