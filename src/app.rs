//! Application state and its single update function.
//!
//! The dashboard keeps one [`AppState`] and feeds every user action and every
//! completed request into [`update`] as an [`Event`]. `update` mutates the
//! state and returns the side effects the host must perform ([`Effect`]):
//! backend calls and session persistence. Nothing in here performs I/O.
//!
//! Each time a data screen is entered exactly one fetch is issued, tagged with
//! a fresh [`RequestId`]. Only the response to the latest request is applied;
//! responses that arrive after the user has moved on are dropped.

use crate::model::{Credentials, Role, TaskChanges, TaskStatus, UserUpdate};
use crate::model::{NewProject, NewTask, NewUser, Project, ProjectId, Session, Task, User};
use crate::router::{resolve_screen, ResolvedScreen, Screen, ViewState};
use crate::stats::{self, GlobalStats};
use crate::validation::{
    validate_forgot_password, validate_login, validate_project, validate_signup, validate_task,
    validate_user, validate_user_update, SignupForm, TaskForm, ValidationError,
};
use chrono::{DateTime, Utc};

/// Identifies one outstanding fetch.
pub type RequestId = u64;

/// Password given to accounts created from the users screen.
pub const DEFAULT_USER_PASSWORD: &str = "changeme";

/// A message shown to the user after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Info(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Success(s) | Notice::Info(s) | Notice::Error(s) => s,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SubmitLogin { email: String, password: String },
    LoginSucceeded(Session),
    LoginFailed(String),
    SubmitSignup(SignupForm),
    SignupSucceeded(User),
    SignupFailed(String),
    RequestPasswordReset(String),
    ResendPasswordReset,
    Logout,
    Navigate(Screen),
    SelectProject(ProjectId),
    Back,
    Refresh,
    SearchChanged(String),
    ValidationFailed(ValidationError),
    DismissNotice,
    SubmitProject { title: String, description: String },
    ProjectCreated(Result<Project, String>),
    SubmitTask(TaskForm),
    TaskCreated(Result<Task, String>),
    /// Save the edit form of an existing task.
    SubmitTaskUpdate { task_id: String, form: TaskForm },
    /// Move a task to another kanban column.
    MoveTask { task_id: String, status: TaskStatus },
    TaskUpdated(Result<Task, String>),
    DeleteTask(String),
    /// Carries the id of the removed task.
    TaskDeleted(Result<String, String>),
    SubmitUser { name: String, email: String, role: Role },
    UserCreated(Result<User, String>),
    SubmitUserUpdate {
        user_id: String,
        name: String,
        email: String,
        role: Role,
    },
    UserUpdated(Result<User, String>),
    DeleteUser(String),
    /// Carries the id of the removed user.
    UserDeleted(Result<String, String>),
    ProjectsLoaded {
        request: RequestId,
        result: Result<Vec<Project>, String>,
    },
    ProjectLoaded {
        request: RequestId,
        result: Result<Project, String>,
    },
    UsersLoaded {
        request: RequestId,
        result: Result<Vec<User>, String>,
    },
}

/// Work the host performs on behalf of [`update`].
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Login(Credentials),
    Signup(NewUser),
    PersistSession(Session),
    ClearSession,
    FetchProjects(RequestId),
    FetchProject(RequestId, ProjectId),
    FetchUsers(RequestId),
    CreateProject(NewProject),
    CreateTask(ProjectId, NewTask),
    UpdateTask(String, TaskChanges),
    DeleteTask(String),
    CreateUser(NewUser),
    UpdateUser(String, UserUpdate),
    DeleteUser(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub session: Option<Session>,
    pub view: ViewState,
    /// Projects from the last successful list fetch.
    pub projects: Vec<Project>,
    /// Users from the last successful user fetch.
    pub users: Vec<User>,
    /// The project shown on the detail screen.
    pub project: Option<Project>,
    pub loading: bool,
    pub pending: Option<RequestId>,
    pub notice: Option<Notice>,
    pub search: String,
    /// Address a reset link was sent to, while on the forgot-password screen.
    pub reset_sent_to: Option<String>,
    next_request: RequestId,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            session: None,
            view: ViewState::initial(),
            projects: Vec::new(),
            users: Vec::new(),
            project: None,
            loading: false,
            pending: None,
            notice: None,
            search: String::new(),
            reset_sent_to: None,
            next_request: 1,
        }
    }

    /// Start-up state, optionally resuming a persisted session.
    pub fn restore(session: Option<Session>) -> (Self, Vec<Effect>) {
        let mut state = Self::new();
        let mut effects = Vec::new();
        if let Some(session) = session {
            state.view = ViewState::login(&session);
            state.session = Some(session);
            effects.extend(state.mount());
        }
        (state, effects)
    }

    /// The screen to draw.
    pub fn resolved(&self) -> ResolvedScreen {
        resolve_screen(self.session.as_ref(), &self.view)
    }

    pub fn role(&self) -> Option<Role> {
        self.session.as_ref().map(|s| s.role)
    }

    /// Global counts over the loaded projects.
    pub fn dashboard_stats(&self, now: DateTime<Utc>) -> GlobalStats {
        stats::global_stats(stats::all_tasks(&self.projects), now)
    }

    /// Loaded projects matching the search query.
    pub fn visible_projects(&self) -> Vec<&Project> {
        stats::filter_projects(&self.projects, &self.search)
    }

    /// Loaded users matching the search query.
    pub fn visible_users(&self) -> Vec<&User> {
        stats::filter_users(&self.users, &self.search)
    }

    fn issue_request(&mut self) -> RequestId {
        let id = self.next_request;
        self.next_request += 1;
        self.pending = Some(id);
        self.loading = true;
        id
    }

    /// Whether `request` is the one currently awaited.
    fn accept(&mut self, request: RequestId) -> bool {
        if self.pending != Some(request) {
            log::debug!(
                "dropping stale response {} (pending: {:?})",
                request,
                self.pending
            );
            return false;
        }
        self.pending = None;
        self.loading = false;
        true
    }

    /// Issue the fetch that backs the current screen, if it has one.
    fn mount(&mut self) -> Option<Effect> {
        match self.resolved() {
            ResolvedScreen::Dashboard | ResolvedScreen::Projects => {
                Some(Effect::FetchProjects(self.issue_request()))
            }
            ResolvedScreen::Users => Some(Effect::FetchUsers(self.issue_request())),
            ResolvedScreen::ProjectDetail(id) => {
                if self.project.as_ref().is_some_and(|p| p.id != id) {
                    self.project = None;
                }
                Some(Effect::FetchProject(self.issue_request(), id))
            }
            ResolvedScreen::Login | ResolvedScreen::Signup | ResolvedScreen::ForgotPassword => {
                self.pending = None;
                self.loading = false;
                None
            }
        }
    }

    /// A task of the project on the detail screen.
    fn open_task(&self, task_id: &str) -> Option<&Task> {
        let ResolvedScreen::ProjectDetail(id) = self.resolved() else {
            return None;
        };
        self.project
            .as_ref()
            .filter(|p| p.id == id)
            .and_then(|p| p.tasks.iter().find(|t| t.id == task_id))
    }

    fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }

    fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}", message);
        self.notice = Some(Notice::Error(message));
    }

    fn invalid(&mut self, error: ValidationError) {
        self.notice = Some(Notice::Error(error.to_string()));
    }
}

/// Apply `event` to `state` and return the effects to perform.
pub fn update(state: &mut AppState, event: Event) -> Vec<Effect> {
    let before = state.resolved();
    let mut effects = apply(state, event);
    let after = state.resolved();
    if after != before {
        state.search.clear();
        if after != ResolvedScreen::ForgotPassword {
            state.reset_sent_to = None;
        }
        effects.extend(state.mount());
    }
    effects
}

fn apply(state: &mut AppState, event: Event) -> Vec<Effect> {
    match event {
        Event::SubmitLogin { email, password } => match validate_login(&email, &password) {
            Ok(credentials) => vec![Effect::Login(credentials)],
            Err(e) => {
                state.invalid(e);
                Vec::new()
            }
        },
        Event::LoginSucceeded(session) => {
            state.notice = Some(Notice::Success(format!(
                "Welcome back, {}!",
                session.display_name
            )));
            state.view = ViewState::login(&session);
            state.session = Some(session.clone());
            vec![Effect::PersistSession(session)]
        }
        Event::LoginFailed(message) => {
            state.fail(message);
            Vec::new()
        }
        Event::SubmitSignup(form) => match validate_signup(&form) {
            Ok(user) => vec![Effect::Signup(user)],
            Err(e) => {
                state.invalid(e);
                Vec::new()
            }
        },
        Event::SignupSucceeded(user) => {
            state.notice = Some(Notice::Success(format!(
                "Account created for {}. Please log in.",
                user.email
            )));
            state.view = state.view.navigate(Screen::Login);
            Vec::new()
        }
        Event::SignupFailed(message) => {
            state.fail(message);
            Vec::new()
        }
        Event::RequestPasswordReset(email) => {
            match validate_forgot_password(&email) {
                Ok(address) => {
                    state.notice = Some(Notice::Success(
                        "Password reset link sent to your email!".to_string(),
                    ));
                    state.reset_sent_to = Some(address);
                }
                Err(e) => state.invalid(e),
            }
            Vec::new()
        }
        Event::ResendPasswordReset => {
            if state.reset_sent_to.is_some() {
                state.notice = Some(Notice::Success(
                    "Reset link resent to your email!".to_string(),
                ));
            }
            Vec::new()
        }
        Event::Logout => {
            let had_session = state.session.take().is_some();
            state.view = ViewState::logout();
            state.projects.clear();
            state.users.clear();
            state.project = None;
            state.pending = None;
            state.loading = false;
            state.notice = None;
            if had_session {
                vec![Effect::ClearSession]
            } else {
                Vec::new()
            }
        }
        Event::Navigate(screen) => {
            state.view = state.view.navigate(screen);
            Vec::new()
        }
        Event::SelectProject(id) => {
            state.view = ViewState::select_project(id);
            Vec::new()
        }
        Event::Back => {
            state.view = ViewState::back();
            Vec::new()
        }
        Event::Refresh => state.mount().into_iter().collect(),
        Event::SearchChanged(query) => {
            state.search = query;
            Vec::new()
        }
        Event::ValidationFailed(error) => {
            state.invalid(error);
            Vec::new()
        }
        Event::DismissNotice => {
            state.notice = None;
            Vec::new()
        }
        Event::SubmitProject { title, description } => {
            if !state.role().is_some_and(|r| r.can_create_projects()) {
                state.fail("Only admins and managers can create projects.");
                return Vec::new();
            }
            match validate_project(&title, &description) {
                Ok(project) => vec![Effect::CreateProject(project)],
                Err(e) => {
                    state.invalid(e);
                    Vec::new()
                }
            }
        }
        Event::ProjectCreated(Ok(project)) => {
            state.notice = Some(Notice::Success(format!(
                "Project '{}' created successfully!",
                project.title
            )));
            state.mount().into_iter().collect()
        }
        Event::ProjectCreated(Err(message)) => {
            state.fail(format!("Failed to create the project: {}", message));
            Vec::new()
        }
        Event::SubmitTask(form) => {
            let ResolvedScreen::ProjectDetail(project_id) = state.resolved() else {
                state.fail("Open a project before adding tasks.");
                return Vec::new();
            };
            match validate_task(&form) {
                Ok(task) => vec![Effect::CreateTask(project_id, task)],
                Err(e) => {
                    state.invalid(e);
                    Vec::new()
                }
            }
        }
        Event::TaskCreated(Ok(task)) => {
            state.notice = Some(Notice::Success(format!("Task '{}' added.", task.title)));
            state.mount().into_iter().collect()
        }
        Event::TaskCreated(Err(message)) => {
            state.fail(format!("Failed to add the task: {}", message));
            Vec::new()
        }
        Event::SubmitTaskUpdate { task_id, form } => {
            if state.open_task(&task_id).is_none() {
                state.fail("Open the task's project before editing it.");
                return Vec::new();
            }
            match validate_task(&form) {
                Ok(task) => vec![Effect::UpdateTask(task_id, TaskChanges::from(task))],
                Err(e) => {
                    state.invalid(e);
                    Vec::new()
                }
            }
        }
        Event::MoveTask { task_id, status } => match state.open_task(&task_id) {
            Some(task) if task.status == status => Vec::new(),
            Some(_) => vec![Effect::UpdateTask(task_id, TaskChanges::status(status))],
            None => {
                state.fail("Open the task's project before moving it.");
                Vec::new()
            }
        },
        Event::TaskUpdated(Ok(task)) => {
            state.notice = Some(Notice::Success(format!("Task '{}' updated.", task.title)));
            state.mount().into_iter().collect()
        }
        Event::TaskUpdated(Err(message)) => {
            state.fail(format!("Failed to update the task: {}", message));
            Vec::new()
        }
        Event::DeleteTask(task_id) => {
            if state.open_task(&task_id).is_none() {
                state.fail("Open the task's project before deleting it.");
                return Vec::new();
            }
            vec![Effect::DeleteTask(task_id)]
        }
        Event::TaskDeleted(Ok(task_id)) => {
            let title = state
                .project
                .as_ref()
                .and_then(|p| p.tasks.iter().find(|t| t.id == task_id))
                .map(|t| t.title.clone())
                .unwrap_or(task_id);
            state.notice = Some(Notice::Success(format!("Task '{}' deleted.", title)));
            state.mount().into_iter().collect()
        }
        Event::TaskDeleted(Err(message)) => {
            state.fail(format!("Failed to delete the task: {}", message));
            Vec::new()
        }
        Event::SubmitUser { name, email, role } => {
            match validate_user(&name, &email, role, DEFAULT_USER_PASSWORD) {
                Ok(user) => vec![Effect::CreateUser(user)],
                Err(e) => {
                    state.invalid(e);
                    Vec::new()
                }
            }
        }
        Event::UserCreated(Ok(user)) => {
            state.users.push(user);
            state.notice = Some(Notice::Success("User added successfully".to_string()));
            Vec::new()
        }
        Event::UserCreated(Err(message)) => {
            state.fail(format!("Failed to add the user: {}", message));
            Vec::new()
        }
        Event::SubmitUserUpdate {
            user_id,
            name,
            email,
            role,
        } => {
            if !state.is_admin() {
                state.fail("Only admins can edit users.");
                return Vec::new();
            }
            match validate_user_update(&name, &email, role) {
                Ok(user) => vec![Effect::UpdateUser(user_id, user)],
                Err(e) => {
                    state.invalid(e);
                    Vec::new()
                }
            }
        }
        Event::UserUpdated(Ok(user)) => {
            if let Some(existing) = state.users.iter_mut().find(|u| u.id == user.id) {
                *existing = user;
            }
            state.notice = Some(Notice::Success("User updated successfully".to_string()));
            Vec::new()
        }
        Event::UserUpdated(Err(message)) => {
            state.fail(format!("Failed to update the user: {}", message));
            Vec::new()
        }
        Event::DeleteUser(user_id) => {
            if !state.is_admin() {
                state.fail("Only admins can remove users.");
                return Vec::new();
            }
            if state.session.as_ref().is_some_and(|s| s.user_id == user_id) {
                state.fail("You cannot remove your own account.");
                return Vec::new();
            }
            vec![Effect::DeleteUser(user_id)]
        }
        Event::UserDeleted(Ok(user_id)) => {
            let name = state
                .users
                .iter()
                .find(|u| u.id == user_id)
                .map(|u| u.name.clone())
                .unwrap_or_else(|| format!("User {}", user_id));
            state.users.retain(|u| u.id != user_id);
            state.notice = Some(Notice::Success(format!("{} has been removed", name)));
            Vec::new()
        }
        Event::UserDeleted(Err(message)) => {
            state.fail(format!("Failed to remove the user: {}", message));
            Vec::new()
        }
        Event::ProjectsLoaded { request, result } => {
            if state.accept(request) {
                match result {
                    Ok(projects) => state.projects = projects,
                    Err(message) => state.fail(format!("Failed to load projects: {}", message)),
                }
            }
            Vec::new()
        }
        Event::ProjectLoaded { request, result } => {
            if state.accept(request) {
                match result {
                    Ok(project) => state.project = Some(project),
                    Err(message) => state.fail(format!("Failed to load the project: {}", message)),
                }
            }
            Vec::new()
        }
        Event::UsersLoaded { request, result } => {
            if state.accept(request) {
                match result {
                    Ok(users) => state.users = users,
                    Err(message) => state.fail(format!("Failed to load users: {}", message)),
                }
            }
            Vec::new()
        }
    }
}
