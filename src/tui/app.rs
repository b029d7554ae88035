//! Dashboard TUI Application
//!
//! The application struct and event loop for the dashboard. Key presses and
//! finished backend calls both become [`Event`]s for the reducer; the effects
//! it returns run here, backend calls on worker threads.

use super::forms::{Form, FormKind};
use super::ui;
use crate::app::{update, AppState, Effect, Event};
use crate::client::Backend;
use crate::error::Result;
use crate::model::{Project, Role, Task, TaskStatus};
use crate::router::{nav_items, ResolvedScreen, Screen};
use crate::session_store::SessionStore;
use crate::stats::{board, recent_projects, PANEL_SIZE};
use crossterm::{
    event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// How long to wait for a key press before checking for backend results.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Run one backend effect and turn its outcome into an event.
///
/// Returns `None` for effects that are not backend calls.
pub fn execute_effect(backend: &dyn Backend, effect: Effect) -> Option<Event> {
    let event = match effect {
        Effect::Login(credentials) => match backend.login(&credentials) {
            Ok(session) => Event::LoginSucceeded(session),
            Err(e) => Event::LoginFailed(e.to_string()),
        },
        Effect::Signup(user) => match backend.create_user(&user) {
            Ok(created) => Event::SignupSucceeded(created),
            Err(e) => Event::SignupFailed(e.to_string()),
        },
        Effect::FetchProjects(request) => Event::ProjectsLoaded {
            request,
            result: backend.list_projects().map_err(|e| e.to_string()),
        },
        Effect::FetchProject(request, id) => Event::ProjectLoaded {
            request,
            result: backend.get_project(&id).map_err(|e| e.to_string()),
        },
        Effect::FetchUsers(request) => Event::UsersLoaded {
            request,
            result: backend.list_users().map_err(|e| e.to_string()),
        },
        Effect::CreateProject(project) => {
            Event::ProjectCreated(backend.create_project(&project).map_err(|e| e.to_string()))
        }
        Effect::CreateTask(project_id, task) => Event::TaskCreated(
            backend
                .create_task(&project_id, &task)
                .map_err(|e| e.to_string()),
        ),
        Effect::UpdateTask(task_id, changes) => Event::TaskUpdated(
            backend
                .update_task(&task_id, &changes)
                .map_err(|e| e.to_string()),
        ),
        Effect::DeleteTask(task_id) => Event::TaskDeleted(
            backend
                .delete_task(&task_id)
                .map(|()| task_id)
                .map_err(|e| e.to_string()),
        ),
        Effect::CreateUser(user) => {
            Event::UserCreated(backend.create_user(&user).map_err(|e| e.to_string()))
        }
        Effect::UpdateUser(user_id, user) => Event::UserUpdated(
            backend
                .update_user(&user_id, &user)
                .map_err(|e| e.to_string()),
        ),
        Effect::DeleteUser(user_id) => Event::UserDeleted(
            backend
                .delete_user(&user_id)
                .map(|()| user_id)
                .map_err(|e| e.to_string()),
        ),
        Effect::PersistSession(_) | Effect::ClearSession => return None,
    };
    Some(event)
}

/// The dashboard application.
pub struct DashboardApp {
    state: AppState,
    backend: Arc<dyn Backend>,
    sessions: SessionStore,
    tx: Sender<Event>,
    rx: Receiver<Event>,
    /// Backend calls whose result has not come back yet.
    in_flight: usize,
    form: Option<Form>,
    searching: bool,
    /// Highlighted row of the current list.
    selected: usize,
    should_quit: bool,
    /// Whether the login form lists the demo accounts.
    demo_accounts: bool,
}

impl DashboardApp {
    /// Create the app, resuming the persisted session if there is one.
    pub fn new(backend: Arc<dyn Backend>, sessions: SessionStore) -> Self {
        let session = sessions.load().unwrap_or_else(|e| {
            log::warn!("could not read session: {}", e);
            None
        });
        let (state, effects) = AppState::restore(session);
        let (tx, rx) = mpsc::channel();
        let mut app = Self {
            state,
            backend,
            sessions,
            tx,
            rx,
            in_flight: 0,
            form: None,
            searching: false,
            selected: 0,
            should_quit: false,
            demo_accounts: false,
        };
        for effect in effects {
            app.perform(effect);
        }
        app.sync_form();
        app
    }

    /// List the demo accounts on the login form.
    pub fn with_demo_accounts(mut self, show: bool) -> Self {
        self.demo_accounts = show;
        self
    }

    pub fn shows_demo_accounts(&self) -> bool {
        self.demo_accounts
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn form(&self) -> Option<&Form> {
        self.form.as_ref()
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Feed an event to the reducer and carry out its effects.
    pub fn dispatch(&mut self, event: Event) {
        let before = self.state.resolved();
        let effects = update(&mut self.state, event);

        let submitted = effects.iter().any(|e| {
            matches!(
                e,
                Effect::CreateProject(_)
                    | Effect::CreateTask(..)
                    | Effect::UpdateTask(..)
                    | Effect::CreateUser(_)
                    | Effect::UpdateUser(..)
            )
        });
        if submitted {
            self.form = None;
        }

        for effect in effects {
            self.perform(effect);
        }

        if self.state.resolved() != before {
            self.selected = 0;
            self.searching = false;
            self.form = None;
        }
        self.clamp_selection();
        self.sync_form();
    }

    fn perform(&mut self, effect: Effect) {
        match effect {
            Effect::PersistSession(session) => {
                if let Err(e) = self.sessions.save(&session) {
                    log::warn!("could not save session: {}", e);
                }
            }
            Effect::ClearSession => {
                if let Err(e) = self.sessions.clear() {
                    log::warn!("could not clear session: {}", e);
                }
            }
            effect => self.spawn(effect),
        }
    }

    fn spawn(&mut self, effect: Effect) {
        log::debug!("running {:?}", effect);
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        self.in_flight += 1;
        thread::spawn(move || {
            if let Some(event) = execute_effect(backend.as_ref(), effect) {
                // The receiver is gone only once the app has exited
                let _ = tx.send(event);
            }
        });
    }

    /// Apply every backend result that has arrived.
    pub fn drain_results(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            self.receive(event);
        }
    }

    /// Block up to `timeout` for one backend result and apply it. Returns
    /// whether a result arrived.
    pub fn wait_for_result(&mut self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => {
                self.receive(event);
                true
            }
            Err(_) => false,
        }
    }

    fn receive(&mut self, event: Event) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.dispatch(event);
    }

    /// Keep the open form in line with the screen: the anonymous screens are
    /// nothing but their form.
    fn sync_form(&mut self) {
        let wanted = match self.state.resolved() {
            ResolvedScreen::Login => Some(FormKind::Login),
            ResolvedScreen::Signup => Some(FormKind::Signup),
            ResolvedScreen::ForgotPassword => Some(FormKind::ForgotPassword),
            _ => None,
        };
        let current = self.form.as_ref().map(|f| f.kind);
        match wanted {
            Some(kind) if current != Some(kind) => self.form = Some(Form::new(kind)),
            Some(_) => {}
            None => {
                if matches!(
                    current,
                    Some(FormKind::Login | FormKind::Signup | FormKind::ForgotPassword)
                ) {
                    self.form = None;
                }
            }
        }
    }

    /// Projects listed on the current screen, in display order.
    pub fn listed_projects(&self) -> Vec<&Project> {
        match self.state.resolved() {
            ResolvedScreen::Dashboard => recent_projects(&self.state.projects, PANEL_SIZE)
                .into_iter()
                .map(|(p, _)| p)
                .collect(),
            ResolvedScreen::Projects => self.state.visible_projects(),
            _ => Vec::new(),
        }
    }

    /// Tasks of the open project in board order: column by column, top to
    /// bottom.
    pub fn listed_tasks(&self) -> Vec<&Task> {
        let (ResolvedScreen::ProjectDetail(_), Some(project)) =
            (self.state.resolved(), &self.state.project)
        else {
            return Vec::new();
        };
        let board = board(&project.tasks);
        TaskStatus::all()
            .iter()
            .flat_map(|status| board.column(*status).iter().copied())
            .collect()
    }

    /// The highlighted task on the board.
    pub fn selected_task(&self) -> Option<&Task> {
        self.listed_tasks().get(self.selected).copied()
    }

    fn list_len(&self) -> usize {
        match self.state.resolved() {
            ResolvedScreen::Dashboard | ResolvedScreen::Projects => self.listed_projects().len(),
            ResolvedScreen::Users => self.state.visible_users().len(),
            ResolvedScreen::ProjectDetail(_) => self.listed_tasks().len(),
            _ => 0,
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.list_len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    /// Handle keyboard input.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        if self.form.is_some() {
            self.handle_form_key(key.code);
        } else if self.searching {
            self.handle_search_key(key.code);
        } else {
            self.handle_browse_key(key.code);
        }
    }

    fn handle_form_key(&mut self, code: KeyCode) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let kind = form.kind;
        match code {
            KeyCode::Esc => match kind {
                FormKind::Login => self.should_quit = true,
                FormKind::Signup | FormKind::ForgotPassword => {
                    self.dispatch(Event::Navigate(Screen::Login))
                }
                _ => self.form = None,
            },
            KeyCode::F(2) if kind == FormKind::Login => {
                self.dispatch(Event::Navigate(Screen::Signup))
            }
            KeyCode::F(3) if kind == FormKind::Login => {
                self.dispatch(Event::Navigate(Screen::ForgotPassword))
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Left => form.cycle(false),
            KeyCode::Right => form.cycle(true),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(c) => form.push(c),
            KeyCode::Enter => self.submit_form(),
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        let Some(form) = self.form.as_ref() else {
            return;
        };
        let event = match form.kind {
            FormKind::Login => Event::SubmitLogin {
                email: form.value(0).to_string(),
                password: form.value(1).to_string(),
            },
            FormKind::Signup => Event::SubmitSignup(form.signup()),
            FormKind::ForgotPassword => {
                if self.state.reset_sent_to.is_some() {
                    Event::ResendPasswordReset
                } else {
                    Event::RequestPasswordReset(form.value(0).to_string())
                }
            }
            FormKind::NewProject => Event::SubmitProject {
                title: form.value(0).to_string(),
                description: form.value(1).to_string(),
            },
            FormKind::NewTask => Event::SubmitTask(form.task()),
            FormKind::EditTask => {
                let Some(task_id) = form.target.clone() else {
                    return;
                };
                Event::SubmitTaskUpdate {
                    task_id,
                    form: form.task(),
                }
            }
            FormKind::NewUser => {
                let (name, email, role) = form.user();
                Event::SubmitUser { name, email, role }
            }
            FormKind::EditUser => {
                let Some(user_id) = form.target.clone() else {
                    return;
                };
                let (name, email, role) = form.user();
                Event::SubmitUserUpdate {
                    user_id,
                    name,
                    email,
                    role,
                }
            }
        };
        self.dispatch(event);
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        let mut query = self.state.search.clone();
        match code {
            KeyCode::Esc | KeyCode::Enter => {
                self.searching = false;
                return;
            }
            KeyCode::Backspace => {
                query.pop();
            }
            KeyCode::Char(c) => query.push(c),
            _ => return,
        }
        self.selected = 0;
        self.dispatch(Event::SearchChanged(query));
    }

    fn handle_browse_key(&mut self, code: KeyCode) {
        let resolved = self.state.resolved();
        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Tab => self.next_tab(),
            KeyCode::Char(c @ '1'..='9') => {
                let index = (c as usize) - ('1' as usize);
                if let Some(screen) = self.nav_items().get(index) {
                    self.dispatch(Event::Navigate(*screen));
                }
            }
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < self.list_len() {
                    self.selected += 1;
                }
            }
            KeyCode::Enter => {
                let id = self
                    .listed_projects()
                    .get(self.selected)
                    .map(|p| p.id.clone());
                if let Some(id) = id {
                    self.dispatch(Event::SelectProject(id));
                }
            }
            KeyCode::Esc | KeyCode::Backspace => {
                if matches!(resolved, ResolvedScreen::ProjectDetail(_)) {
                    self.dispatch(Event::Back);
                } else if self.state.notice.is_some() {
                    self.dispatch(Event::DismissNotice);
                }
            }
            KeyCode::Char('r') => self.dispatch(Event::Refresh),
            KeyCode::Char('/') => {
                if matches!(resolved, ResolvedScreen::Projects | ResolvedScreen::Users) {
                    self.searching = true;
                }
            }
            KeyCode::Left | KeyCode::Right => {
                let forward = code == KeyCode::Right;
                let moved = self.selected_task().and_then(|task| {
                    let status = if forward {
                        task.status.next()
                    } else {
                        task.status.previous()
                    };
                    status.map(|status| Event::MoveTask {
                        task_id: task.id.clone(),
                        status,
                    })
                });
                if let Some(event) = moved {
                    self.dispatch(event);
                }
            }
            KeyCode::Char('n') => self.open_form(&resolved),
            KeyCode::Char('e') => self.open_edit_form(&resolved),
            KeyCode::Char('d') => self.delete_selected(&resolved),
            KeyCode::Char('l') => self.dispatch(Event::Logout),
            _ => {}
        }
    }

    fn selected_user_id(&self) -> Option<String> {
        self.state
            .visible_users()
            .get(self.selected)
            .map(|u| u.id.clone())
    }

    fn open_edit_form(&mut self, resolved: &ResolvedScreen) {
        let form = match resolved {
            ResolvedScreen::ProjectDetail(_) => self.selected_task().map(Form::edit_task),
            ResolvedScreen::Users if self.state.role() == Some(Role::Admin) => self
                .state
                .visible_users()
                .get(self.selected)
                .map(|u| Form::edit_user(u)),
            _ => None,
        };
        if form.is_some() {
            self.form = form;
        }
    }

    fn delete_selected(&mut self, resolved: &ResolvedScreen) {
        let event = match resolved {
            ResolvedScreen::ProjectDetail(_) => self
                .selected_task()
                .map(|t| Event::DeleteTask(t.id.clone())),
            ResolvedScreen::Users => self.selected_user_id().map(Event::DeleteUser),
            _ => None,
        };
        if let Some(event) = event {
            self.dispatch(event);
        }
    }

    /// Tabs shown in the header.
    pub fn nav_items(&self) -> Vec<Screen> {
        self.state.role().map(nav_items).unwrap_or_default()
    }

    fn next_tab(&mut self) {
        let items = self.nav_items();
        if items.is_empty() {
            return;
        }
        let next = items
            .iter()
            .position(|s| *s == self.state.view.active_screen)
            .map(|i| (i + 1) % items.len())
            .unwrap_or(0);
        self.dispatch(Event::Navigate(items[next]));
    }

    fn open_form(&mut self, resolved: &ResolvedScreen) {
        let kind = match resolved {
            ResolvedScreen::Dashboard | ResolvedScreen::Projects => {
                if !self.state.role().is_some_and(|r| r.can_create_projects()) {
                    return;
                }
                FormKind::NewProject
            }
            ResolvedScreen::ProjectDetail(_) => FormKind::NewTask,
            ResolvedScreen::Users => FormKind::NewUser,
            _ => return,
        };
        self.form = Some(Form::new(kind));
    }
}

/// Initialize the terminal for TUI mode.
pub fn init_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Restore the terminal to normal mode.
pub fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the dashboard until the user quits.
pub fn run_dashboard(
    backend: Arc<dyn Backend>,
    sessions: SessionStore,
    demo: bool,
) -> Result<()> {
    // Set up panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = init_terminal()?;
    let mut app = DashboardApp::new(backend, sessions).with_demo_accounts(demo);

    let outcome = run_loop(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;
    outcome
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut DashboardApp,
) -> Result<()> {
    while !app.should_quit() {
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(POLL_INTERVAL)? {
            if let TermEvent::Key(key) = event::read()? {
                // Only handle key press events (not release or repeat)
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        app.drain_results();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Notice;
    use crate::demo::DemoBackend;
    use crate::model::{ProjectId, Role, Session};
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(app: &mut DashboardApp, s: &str) {
        for c in s.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    /// Apply backend results until nothing is outstanding.
    fn settle(app: &mut DashboardApp) {
        while app.in_flight() > 0 {
            assert!(
                app.wait_for_result(Duration::from_secs(5)),
                "backend result never arrived"
            );
        }
    }

    fn new_app() -> (DashboardApp, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::with_dir(temp_dir.path().to_path_buf());
        let app = DashboardApp::new(Arc::new(DemoBackend::new()), store);
        (app, temp_dir)
    }

    fn log_in(app: &mut DashboardApp, email: &str, password: &str) {
        type_str(app, email);
        app.handle_key(key(KeyCode::Tab));
        type_str(app, password);
        app.handle_key(key(KeyCode::Enter));
        settle(app);
    }

    #[test]
    fn test_execute_effect_maps_results() {
        let backend = DemoBackend::new();
        match execute_effect(&backend, Effect::FetchProjects(7)) {
            Some(Event::ProjectsLoaded { request, result }) => {
                assert_eq!(request, 7);
                assert_eq!(result.unwrap().len(), 4);
            }
            other => panic!("unexpected event: {:?}", other),
        }

        let missing = ProjectId::new("999").unwrap();
        match execute_effect(&backend, Effect::FetchProject(8, missing)) {
            Some(Event::ProjectLoaded { result, .. }) => {
                assert_eq!(result.unwrap_err(), "Project 999 not found")
            }
            other => panic!("unexpected event: {:?}", other),
        }

        assert!(execute_effect(&backend, Effect::ClearSession).is_none());
    }

    #[test]
    fn test_starts_on_login_form() {
        let (app, _dir) = new_app();
        assert_eq!(app.state().resolved(), ResolvedScreen::Login);
        assert_eq!(app.form().map(|f| f.kind), Some(FormKind::Login));
        assert_eq!(app.in_flight(), 0);
    }

    #[test]
    fn test_login_through_form() {
        let (mut app, dir) = new_app();
        log_in(&mut app, "admin@projectflow.com", "admin123");

        assert_eq!(app.state().resolved(), ResolvedScreen::Dashboard);
        assert!(app.form().is_none());
        assert_eq!(app.state().projects.len(), 4);
        assert_eq!(app.nav_items(), vec![Screen::Dashboard, Screen::Projects, Screen::Users]);

        // Session was persisted
        let store = SessionStore::with_dir(dir.path().to_path_buf());
        assert_eq!(store.load().unwrap().map(|s| s.role), Some(Role::Admin));
    }

    #[test]
    fn test_bad_login_shows_notice() {
        let (mut app, _dir) = new_app();
        log_in(&mut app, "admin@projectflow.com", "wrong");
        assert_eq!(app.state().resolved(), ResolvedScreen::Login);
        assert_eq!(
            app.state().notice,
            Some(Notice::Error("Invalid credentials.".to_string()))
        );
    }

    #[test]
    fn test_resumes_persisted_session() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::with_dir(temp_dir.path().to_path_buf());
        store
            .save(&Session {
                user_id: "demo-developer".to_string(),
                display_name: "Developer".to_string(),
                email: "dev@projectflow.com".to_string(),
                role: Role::Developer,
            })
            .unwrap();

        let mut app = DashboardApp::new(Arc::new(DemoBackend::new()), store);
        assert_eq!(app.state().resolved(), ResolvedScreen::Dashboard);
        assert_eq!(app.in_flight(), 1);
        settle(&mut app);
        assert_eq!(app.state().projects.len(), 4);
    }

    #[test]
    fn test_open_project_and_go_back() {
        let (mut app, _dir) = new_app();
        log_in(&mut app, "dev@projectflow.com", "dev123");

        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.selected(), 1);
        app.handle_key(key(KeyCode::Enter));
        settle(&mut app);

        match app.state().resolved() {
            ResolvedScreen::ProjectDetail(id) => assert_eq!(id.as_str(), "2"),
            other => panic!("unexpected screen: {:?}", other),
        }
        assert_eq!(
            app.state().project.as_ref().map(|p| p.title.as_str()),
            Some("Mobile App Redesign")
        );

        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.state().resolved(), ResolvedScreen::Dashboard);
        assert_eq!(app.selected(), 0);
        settle(&mut app);
    }

    #[test]
    fn test_tab_cycles_role_navigation() {
        let (mut app, _dir) = new_app();
        log_in(&mut app, "manager@projectflow.com", "manager123");

        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.state().resolved(), ResolvedScreen::Projects);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.state().resolved(), ResolvedScreen::Dashboard);
        settle(&mut app);
    }

    #[test]
    fn test_search_filters_projects() {
        let (mut app, _dir) = new_app();
        log_in(&mut app, "manager@projectflow.com", "manager123");
        app.handle_key(key(KeyCode::Char('2')));
        settle(&mut app);

        app.handle_key(key(KeyCode::Char('/')));
        assert!(app.is_searching());
        type_str(&mut app, "market");
        app.handle_key(key(KeyCode::Enter));
        assert!(!app.is_searching());

        let titles: Vec<_> = app.listed_projects().iter().map(|p| p.title.clone()).collect();
        assert_eq!(titles, vec!["Marketing Website".to_string()]);
    }

    #[test]
    fn test_create_project_from_form() {
        let (mut app, _dir) = new_app();
        log_in(&mut app, "manager@projectflow.com", "manager123");

        app.handle_key(key(KeyCode::Char('n')));
        assert_eq!(app.form().map(|f| f.kind), Some(FormKind::NewProject));
        type_str(&mut app, "Data Migration");
        app.handle_key(key(KeyCode::Enter));
        assert!(app.form().is_none());
        settle(&mut app);

        assert_eq!(app.state().projects.len(), 5);
        assert!(matches!(app.state().notice, Some(Notice::Success(_))));
    }

    #[test]
    fn test_developer_has_no_project_form() {
        let (mut app, _dir) = new_app();
        log_in(&mut app, "dev@projectflow.com", "dev123");
        app.handle_key(key(KeyCode::Char('n')));
        assert!(app.form().is_none());
    }

    #[test]
    fn test_signup_screen_from_login() {
        let (mut app, _dir) = new_app();
        app.handle_key(key(KeyCode::F(2)));
        assert_eq!(app.state().resolved(), ResolvedScreen::Signup);
        assert_eq!(app.form().map(|f| f.kind), Some(FormKind::Signup));

        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.state().resolved(), ResolvedScreen::Login);
        assert!(!app.should_quit());

        app.handle_key(key(KeyCode::Esc));
        assert!(app.should_quit());
    }

    #[test]
    fn test_logout_returns_to_login() {
        let (mut app, dir) = new_app();
        log_in(&mut app, "admin@projectflow.com", "admin123");
        app.handle_key(key(KeyCode::Char('l')));

        assert_eq!(app.state().resolved(), ResolvedScreen::Login);
        assert_eq!(app.form().map(|f| f.kind), Some(FormKind::Login));
        let store = SessionStore::with_dir(dir.path().to_path_buf());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_ctrl_c_quits_from_anywhere() {
        let (mut app, _dir) = new_app();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
    }

    #[test]
    fn test_board_keys_move_edit_and_delete_tasks() {
        let (mut app, _dir) = new_app();
        log_in(&mut app, "manager@projectflow.com", "manager123");
        app.handle_key(key(KeyCode::Enter));
        settle(&mut app);
        assert_eq!(
            app.selected_task().map(|t| t.title.as_str()),
            Some("Design product listing page")
        );

        // Move the first to-do task one column right
        app.handle_key(key(KeyCode::Right));
        settle(&mut app);
        let project = app.state().project.as_ref().unwrap();
        assert_eq!(project.tasks[0].status, TaskStatus::InProgress);

        // The head of the board is now the other to-do task
        app.handle_key(key(KeyCode::Char('d')));
        settle(&mut app);
        assert_eq!(app.state().project.as_ref().unwrap().tasks.len(), 5);
        assert_eq!(
            app.state().notice,
            Some(Notice::Success(
                "Task 'Setup authentication system' deleted.".to_string()
            ))
        );

        app.handle_key(key(KeyCode::Char('e')));
        let form = app.form().unwrap();
        assert_eq!(form.kind, FormKind::EditTask);
        assert_eq!(form.target.as_deref(), Some("1"));
        type_str(&mut app, " v2");
        app.handle_key(key(KeyCode::Enter));
        assert!(app.form().is_none());
        settle(&mut app);
        assert_eq!(
            app.state().project.as_ref().unwrap().tasks[0].title,
            "Design product listing page v2"
        );
    }

    #[test]
    fn test_done_task_does_not_move_right() {
        let (mut app, _dir) = new_app();
        log_in(&mut app, "manager@projectflow.com", "manager123");
        app.handle_key(key(KeyCode::Enter));
        settle(&mut app);

        for _ in 0..5 {
            app.handle_key(key(KeyCode::Down));
        }
        assert_eq!(app.selected_task().map(|t| t.status), Some(TaskStatus::Done));
        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.in_flight(), 0);
    }

    #[test]
    fn test_admin_edits_and_removes_user() {
        let (mut app, _dir) = new_app();
        log_in(&mut app, "admin@projectflow.com", "admin123");
        app.handle_key(key(KeyCode::Char('3')));
        settle(&mut app);
        assert_eq!(app.state().resolved(), ResolvedScreen::Users);

        app.handle_key(key(KeyCode::Char('e')));
        assert_eq!(app.form().map(|f| f.kind), Some(FormKind::EditUser));
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Enter));
        settle(&mut app);
        assert_eq!(app.state().users[0].role, Role::Admin);
        assert_eq!(
            app.state().notice,
            Some(Notice::Success("User updated successfully".to_string()))
        );

        app.handle_key(key(KeyCode::Char('d')));
        settle(&mut app);
        assert_eq!(app.state().users.len(), 7);
        assert_eq!(
            app.state().notice,
            Some(Notice::Success("Alice Johnson has been removed".to_string()))
        );
    }

    #[test]
    fn test_manager_cannot_open_user_editor() {
        let (mut app, _dir) = new_app();
        log_in(&mut app, "manager@projectflow.com", "manager123");
        // The tab is hidden for managers but the screen is still reachable
        app.dispatch(Event::Navigate(Screen::Users));
        settle(&mut app);
        assert_eq!(app.state().resolved(), ResolvedScreen::Users);

        app.handle_key(key(KeyCode::Char('e')));
        assert!(app.form().is_none());
    }
}
