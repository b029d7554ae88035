//! Screen routing for the dashboard.
//!
//! The router owns two things: the [`ViewState`] (which screen the user asked
//! for and which project is selected) and the pure [`resolve_screen`] mapping
//! that decides what is actually drawn for a given session.
//!
//! Every transition is a plain function from the old view state to a new one.
//! States that break the "project selected iff on project detail" rule can
//! still be built by hand or deserialized; `resolve_screen` heals them by
//! falling back to the dashboard.

use crate::model::{ProjectId, Role, Session};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The screens a user can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Screen {
    Login,
    Signup,
    ForgotPassword,
    Dashboard,
    Projects,
    Users,
    ProjectDetail,
}

impl Screen {
    /// Returns the kebab-case name of this screen.
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Login => "login",
            Screen::Signup => "signup",
            Screen::ForgotPassword => "forgot-password",
            Screen::Dashboard => "dashboard",
            Screen::Projects => "projects",
            Screen::Users => "users",
            Screen::ProjectDetail => "project-detail",
        }
    }

    /// Returns the human-readable title of this screen.
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Login => "Login",
            Screen::Signup => "Sign Up",
            Screen::ForgotPassword => "Forgot Password",
            Screen::Dashboard => "Dashboard",
            Screen::Projects => "Projects",
            Screen::Users => "Users",
            Screen::ProjectDetail => "Project",
        }
    }

    /// Get all screens in declaration order.
    pub fn all() -> &'static [Screen] {
        &[
            Screen::Login,
            Screen::Signup,
            Screen::ForgotPassword,
            Screen::Dashboard,
            Screen::Projects,
            Screen::Users,
            Screen::ProjectDetail,
        ]
    }

    /// Screens reachable without a session.
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Screen::Login | Screen::Signup | Screen::ForgotPassword)
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Screen {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Screen::all()
            .iter()
            .copied()
            .find(|screen| screen.name() == s.trim())
            .ok_or_else(|| format!("unknown screen '{}'", s))
    }
}

/// The navigation state: requested screen plus the selected project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub active_screen: Screen,
    pub selected_project_id: Option<ProjectId>,
}

impl ViewState {
    /// The state a fresh process starts in.
    pub fn initial() -> Self {
        Self {
            active_screen: Screen::Login,
            selected_project_id: None,
        }
    }

    /// View state after a successful login.
    pub fn login(_session: &Session) -> Self {
        Self::dashboard()
    }

    /// View state after logout.
    pub fn logout() -> Self {
        Self::initial()
    }

    /// Move to `screen`. Leaving for anything other than project detail drops
    /// the selected project.
    pub fn navigate(&self, screen: Screen) -> Self {
        let selected_project_id = if screen == Screen::ProjectDetail {
            self.selected_project_id.clone()
        } else {
            None
        };
        Self {
            active_screen: screen,
            selected_project_id,
        }
    }

    /// Open the detail screen of a project.
    pub fn select_project(project_id: ProjectId) -> Self {
        Self {
            active_screen: Screen::ProjectDetail,
            selected_project_id: Some(project_id),
        }
    }

    /// Return from a detail screen to the dashboard.
    pub fn back() -> Self {
        Self::dashboard()
    }

    fn dashboard() -> Self {
        Self {
            active_screen: Screen::Dashboard,
            selected_project_id: None,
        }
    }

    /// Whether the selection invariant holds for this state.
    pub fn is_consistent(&self) -> bool {
        (self.active_screen == Screen::ProjectDetail) == self.selected_project_id.is_some()
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::initial()
    }
}

/// The screen that is actually drawn.
///
/// Unlike [`Screen`], the detail variant carries the project it shows, so a
/// detail screen without a project cannot be expressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedScreen {
    Login,
    Signup,
    ForgotPassword,
    Dashboard,
    Projects,
    Users,
    ProjectDetail(ProjectId),
}

impl ResolvedScreen {
    /// The requested-screen counterpart of this resolved screen.
    pub fn screen(&self) -> Screen {
        match self {
            ResolvedScreen::Login => Screen::Login,
            ResolvedScreen::Signup => Screen::Signup,
            ResolvedScreen::ForgotPassword => Screen::ForgotPassword,
            ResolvedScreen::Dashboard => Screen::Dashboard,
            ResolvedScreen::Projects => Screen::Projects,
            ResolvedScreen::Users => Screen::Users,
            ResolvedScreen::ProjectDetail(_) => Screen::ProjectDetail,
        }
    }

    /// Whether drawing this screen requires a session.
    pub fn requires_session(&self) -> bool {
        !self.screen().is_anonymous()
    }
}

/// Decide which screen to draw.
///
/// Without a session only login, signup and forgot-password are reachable;
/// any other request lands on login. With a session the anonymous screens and
/// a detail request with no selected project both fall back to the dashboard.
pub fn resolve_screen(session: Option<&Session>, view: &ViewState) -> ResolvedScreen {
    if session.is_none() {
        return match view.active_screen {
            Screen::Signup => ResolvedScreen::Signup,
            Screen::ForgotPassword => ResolvedScreen::ForgotPassword,
            _ => ResolvedScreen::Login,
        };
    }

    match view.active_screen {
        Screen::Login | Screen::Signup | Screen::ForgotPassword | Screen::Dashboard => {
            ResolvedScreen::Dashboard
        }
        Screen::Projects => ResolvedScreen::Projects,
        Screen::Users => ResolvedScreen::Users,
        Screen::ProjectDetail => match &view.selected_project_id {
            Some(id) => ResolvedScreen::ProjectDetail(id.clone()),
            None => ResolvedScreen::Dashboard,
        },
    }
}

/// Entries of the navigation menu for a signed-in user.
///
/// The users screen is only offered to admins. This hides the entry; it is not
/// an access check.
pub fn nav_items(role: Role) -> Vec<Screen> {
    let mut items = vec![Screen::Dashboard, Screen::Projects];
    if role == Role::Admin {
        items.push(Screen::Users);
    }
    items
}
