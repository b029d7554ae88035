//! Dashboard layout and widget definitions.
//!
//! # Layout Structure
//!
//! ```text
//! ┌──────────── ProjectFlow | Admin User (Admin) ────────────┐
//! │ Dashboard │ Projects │ Users                              │
//! └───────────────────────────────────────────────────────────┘
//!   screen content
//!   notice line
//!   key help
//! ```
//!
//! Anonymous screens draw their form centered instead of the tab header.

use super::app::DashboardApp;
use super::forms::{FieldKind, Form, FormKind};
use crate::app::{AppState, Notice};
use crate::demo::demo_credentials;
use crate::model::{Priority, Project, Role, Task, TaskStatus};
use crate::router::ResolvedScreen;
use crate::stats::{self, active_tasks, all_tasks, board, recent_projects, PANEL_SIZE};
use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Gauge, List, ListItem, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};

/// Render the dashboard.
pub fn render(frame: &mut Frame, app: &DashboardApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Notice
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    let resolved = app.state().resolved();
    render_header(frame, app, chunks[0]);
    match &resolved {
        ResolvedScreen::Login | ResolvedScreen::Signup | ResolvedScreen::ForgotPassword => {
            render_anonymous(frame, app, chunks[1])
        }
        ResolvedScreen::Dashboard => render_dashboard(frame, app, chunks[1]),
        ResolvedScreen::Projects => render_projects(frame, app, chunks[1]),
        ResolvedScreen::Users => render_users(frame, app, chunks[1]),
        ResolvedScreen::ProjectDetail(_) => render_project_detail(frame, app, chunks[1]),
    }
    render_notice(frame, app.state(), chunks[2]);
    render_footer(frame, app, &resolved, chunks[3]);

    // Data-screen forms float above the content
    if let Some(form) = app.form() {
        if matches!(
            form.kind,
            FormKind::NewProject
                | FormKind::NewTask
                | FormKind::EditTask
                | FormKind::NewUser
                | FormKind::EditUser
        ) {
            let area = centered_rect(60, 60, chunks[1]);
            frame.render_widget(Clear, area);
            render_form(frame, form, false, area);
        }
    }
}

fn role_color(role: Role) -> Color {
    match role {
        Role::Admin => Color::Red,
        Role::Manager => Color::Blue,
        Role::Developer => Color::Green,
    }
}

fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Todo => Color::Gray,
        TaskStatus::InProgress => Color::Blue,
        TaskStatus::Done => Color::Green,
    }
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::Low => Color::Green,
        Priority::Medium => Color::Yellow,
        Priority::High => Color::Red,
    }
}

fn render_header(frame: &mut Frame, app: &DashboardApp, area: Rect) {
    let title = match &app.state().session {
        Some(session) => format!(
            " ProjectFlow | {} ({}) ",
            session.display_name,
            session.role.label()
        ),
        None => " ProjectFlow ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let items = app.nav_items();
    if items.is_empty() {
        let tagline = Paragraph::new("Project management for teams")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(tagline, area);
        return;
    }

    let titles: Vec<Line> = items.iter().map(|s| Line::from(s.title())).collect();
    let active = app.state().view.active_screen;
    let selected = items.iter().position(|s| *s == active);
    let tabs = Tabs::new(titles)
        .block(block)
        .select(selected)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn render_anonymous(frame: &mut Frame, app: &DashboardApp, area: Rect) {
    let area = centered_rect(50, 70, area);
    let Some(form) = app.form() else {
        return;
    };

    if form.kind == FormKind::ForgotPassword {
        if let Some(email) = &app.state().reset_sent_to {
            let lines = vec![
                Line::from(Span::styled(
                    "Check your email",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(format!("We've sent a password reset link to {}", email)),
                Line::from(""),
                Line::from(Span::styled(
                    "Enter: resend link | Esc: back to sign in",
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            let paragraph = Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).title(" Reset password "));
            frame.render_widget(paragraph, area);
            return;
        }
    }

    render_form(frame, form, app.shows_demo_accounts(), area);
}

fn render_form(frame: &mut Frame, form: &Form, demo_accounts: bool, area: Rect) {
    let mut lines = Vec::new();
    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focus;
        let label_style = if focused {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(Span::styled(field.label, label_style)));

        let mut value = field.display();
        if focused && !matches!(field.kind, FieldKind::Choice { .. }) {
            value.push('_');
        }
        lines.push(Line::from(format!("  {}", value)));
        lines.push(Line::from(""));
    }

    if form.kind == FormKind::Login && demo_accounts {
        lines.push(Line::from(Span::styled(
            "Demo accounts:",
            Style::default().fg(Color::DarkGray),
        )));
        for (email, password, role) in demo_credentials() {
            lines.push(Line::from(Span::styled(
                format!("  {} / {} ({})", email, password, role.label()),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" {} ", form.kind.title())),
    );
    frame.render_widget(paragraph, area);
}

fn stat_card(title: &str, value: usize, color: Color) -> Paragraph<'static> {
    Paragraph::new(Line::from(Span::styled(
        value.to_string(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", title)),
    )
}

fn render_dashboard(frame: &mut Frame, app: &DashboardApp, area: Rect) {
    let state = app.state();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let global = state.dashboard_stats(Utc::now());
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(chunks[0]);
    frame.render_widget(stat_card("Total Tasks", global.total_tasks, Color::White), cards[0]);
    frame.render_widget(
        stat_card("In Progress", global.in_progress_count, Color::Blue),
        cards[1],
    );
    let overdue_color = if global.overdue_count > 0 {
        Color::Red
    } else {
        Color::Green
    };
    frame.render_widget(
        stat_card("Overdue", global.overdue_count, overdue_color),
        cards[2],
    );

    let is_developer = state.role() == Some(Role::Developer);
    let panels = if is_developer {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(PANEL_SIZE as u16 + 2), Constraint::Min(0)])
            .split(chunks[1])
    } else {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0)])
            .split(chunks[1])
    };

    if is_developer {
        let items: Vec<ListItem> = active_tasks(all_tasks(&state.projects), PANEL_SIZE)
            .into_iter()
            .map(task_item)
            .collect();
        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" My Active Tasks "),
        );
        frame.render_widget(list, panels[0]);
    }

    let recent = recent_projects(&state.projects, PANEL_SIZE);
    let items: Vec<ListItem> = recent
        .iter()
        .enumerate()
        .map(|(i, (project, summary))| {
            project_item(project, summary.progress_percent, i == app.selected())
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(loading_title(" Recent Projects ", state)),
    );
    frame.render_widget(list, panels[panels.len() - 1]);
}

fn loading_title(title: &str, state: &AppState) -> String {
    if state.loading {
        format!("{}(loading...) ", title)
    } else {
        title.to_string()
    }
}

fn project_item(project: &Project, percent: u8, selected: bool) -> ListItem<'static> {
    let style = if selected {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let marker = if selected { "> " } else { "  " };
    let filled = usize::from(percent) / 5;
    ListItem::new(Line::from(vec![
        Span::styled(format!("{}{:<30}", marker, project.title), style),
        Span::styled("█".repeat(filled), Style::default().fg(Color::Green)),
        Span::styled("░".repeat(20 - filled), Style::default().fg(Color::DarkGray)),
        Span::raw(format!(" {:>3}%", percent)),
    ]))
}

fn task_item(task: &Task) -> ListItem<'static> {
    let mut spans = vec![
        Span::styled(
            format!("[{}] ", task.status.label()),
            Style::default().fg(status_color(task.status)),
        ),
        Span::raw(task.title.clone()),
        Span::raw(" "),
        Span::styled(
            task.priority.label(),
            Style::default().fg(priority_color(task.priority)),
        ),
    ];
    if let Some(assignee) = &task.assignee {
        spans.push(Span::styled(
            format!(" @{}", assignee.name),
            Style::default().fg(Color::Cyan),
        ));
    }
    if let Some(deadline) = task.deadline {
        let style = if stats::is_overdue(task, Utc::now()) {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {}", deadline.format("%b %d")), style));
    }
    ListItem::new(Line::from(spans))
}

fn search_line(app: &DashboardApp) -> Paragraph<'static> {
    let query = &app.state().search;
    let text = if app.is_searching() {
        format!("Search: {}_", query)
    } else if query.is_empty() {
        "Press / to search".to_string()
    } else {
        format!("Search: {}", query)
    };
    Paragraph::new(text).style(Style::default().fg(Color::DarkGray))
}

fn render_projects(frame: &mut Frame, app: &DashboardApp, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);
    frame.render_widget(search_line(app), chunks[0]);

    let projects = app.listed_projects();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(loading_title(" Projects ", app.state()));
    if projects.is_empty() {
        let message = Paragraph::new("No projects found")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(message, chunks[1]);
        return;
    }

    let items: Vec<ListItem> = projects
        .iter()
        .enumerate()
        .map(|(i, project)| {
            let summary = stats::project_summary(project);
            project_item(project, summary.progress_percent, i == app.selected())
        })
        .collect();
    frame.render_widget(List::new(items).block(block), chunks[1]);
}

fn render_project_detail(frame: &mut Frame, app: &DashboardApp, area: Rect) {
    let Some(project) = &app.state().project else {
        let message = Paragraph::new("Loading project...")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(message, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let summary = stats::project_summary(project);
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", project.title)),
        )
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(f64::from(summary.progress_percent) / 100.0)
        .label(format!(
            "{}% ({} tasks)",
            summary.progress_percent,
            summary.as_fraction()
        ));
    frame.render_widget(gauge, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(chunks[1]);

    let selected_id = app.selected_task().map(|t| t.id.as_str());
    let board = board(&project.tasks);
    for (status, area) in TaskStatus::all().iter().zip(columns.iter()) {
        let tasks = board.column(*status);
        let items: Vec<ListItem> = tasks
            .iter()
            .map(|t| {
                let item = task_item(t);
                if selected_id == Some(t.id.as_str()) {
                    item.style(Style::default().add_modifier(Modifier::REVERSED))
                } else {
                    item
                }
            })
            .collect();
        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(status_color(*status)))
                .title(format!(" {} ({}) ", status.label(), tasks.len())),
        );
        frame.render_widget(list, *area);
    }
}

fn render_users(frame: &mut Frame, app: &DashboardApp, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);
    frame.render_widget(search_line(app), chunks[0]);

    let header = Row::new(vec!["Name", "Email", "Role"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = app
        .state()
        .visible_users()
        .into_iter()
        .enumerate()
        .map(|(i, user)| {
            let style = if i == app.selected() {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(user.name.clone()),
                Cell::from(user.email.clone()),
                Cell::from(Span::styled(
                    user.role.label(),
                    Style::default().fg(role_color(user.role)),
                )),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(30),
            Constraint::Percentage(45),
            Constraint::Percentage(25),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(loading_title(" Users ", app.state())),
    );
    frame.render_widget(table, chunks[1]);
}

fn render_notice(frame: &mut Frame, state: &AppState, area: Rect) {
    let Some(notice) = &state.notice else {
        return;
    };
    let color = match notice {
        Notice::Success(_) => Color::Green,
        Notice::Info(_) => Color::Cyan,
        Notice::Error(_) => Color::Red,
    };
    let line = Paragraph::new(format!(" {}", notice.text())).style(Style::default().fg(color));
    frame.render_widget(line, area);
}

fn render_footer(frame: &mut Frame, app: &DashboardApp, resolved: &ResolvedScreen, area: Rect) {
    let help_text = if let Some(form) = app.form() {
        match form.kind {
            FormKind::Login => {
                " Tab: next field | Enter: sign in | F2: sign up | F3: forgot password | Esc: quit "
            }
            FormKind::Signup | FormKind::ForgotPassword => {
                " Tab: next field | ←→: change choice | Enter: submit | Esc: back to sign in "
            }
            _ => " Tab: next field | ←→: change choice | Enter: save | Esc: cancel ",
        }
    } else if app.is_searching() {
        " Type to filter | Enter/Esc: done "
    } else {
        match resolved {
            ResolvedScreen::ProjectDetail(_) => {
                " Esc: back | ↑↓: select | ←→: move | n: new | e: edit | d: delete | r: refresh | Q: quit "
            }
            ResolvedScreen::Users => {
                " Tab: switch view | ↑↓: navigate | /: search | n: new | e: edit | d: delete | r: refresh | l: log out | Q: quit "
            }
            ResolvedScreen::Projects => {
                " Tab: switch view | ↑↓: navigate | /: search | n: new | r: refresh | l: log out | Q: quit "
            }
            _ => " Tab: switch view | ↑↓: navigate | Enter: open | n: new project | r: refresh | l: log out | Q: quit ",
        }
    };
    let footer = Paragraph::new(help_text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, area);
}

/// Create a centered rectangle of given percentage width/height
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
