//! Text-entry forms for the dashboard.
//!
//! A [`Form`] is an ordered list of fields with one focused field. Text
//! fields take typed characters; choice fields cycle through fixed options.

use crate::model::{Priority, Role, Task, TaskStatus, User};
use crate::validation::{SignupForm, TaskForm};

/// Which form is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Login,
    Signup,
    ForgotPassword,
    NewProject,
    NewTask,
    EditTask,
    NewUser,
    EditUser,
}

impl FormKind {
    pub fn title(&self) -> &'static str {
        match self {
            FormKind::Login => "Sign in",
            FormKind::Signup => "Create account",
            FormKind::ForgotPassword => "Reset password",
            FormKind::NewProject => "New project",
            FormKind::NewTask => "New task",
            FormKind::EditTask => "Edit task",
            FormKind::NewUser => "Add user",
            FormKind::EditUser => "Edit user",
        }
    }
}

const ROLE_OPTIONS: &[&str] = &["developer", "manager", "admin"];
const STATUS_OPTIONS: &[&str] = &["todo", "in-progress", "done"];
const PRIORITY_OPTIONS: &[&str] = &["low", "medium", "high"];

fn status_option(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => STATUS_OPTIONS[0],
        TaskStatus::InProgress => STATUS_OPTIONS[1],
        TaskStatus::Done => STATUS_OPTIONS[2],
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Rendered masked.
    Secret,
    Choice {
        options: &'static [&'static str],
        selected: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: &'static str,
    pub kind: FieldKind,
    pub text: String,
}

impl Field {
    fn text(label: &'static str) -> Self {
        Self {
            label,
            kind: FieldKind::Text,
            text: String::new(),
        }
    }

    fn secret(label: &'static str) -> Self {
        Self {
            label,
            kind: FieldKind::Secret,
            text: String::new(),
        }
    }

    fn choice(label: &'static str, options: &'static [&'static str], selected: usize) -> Self {
        Self {
            label,
            kind: FieldKind::Choice { options, selected },
            text: String::new(),
        }
    }

    /// The field's value: typed text, or the selected option.
    pub fn value(&self) -> &str {
        match &self.kind {
            FieldKind::Choice { options, selected } => options[*selected],
            _ => &self.text,
        }
    }

    /// What to draw for this field.
    pub fn display(&self) -> String {
        match &self.kind {
            FieldKind::Text => self.text.clone(),
            FieldKind::Secret => "*".repeat(self.text.chars().count()),
            FieldKind::Choice { .. } => format!("< {} >", self.value()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub kind: FormKind,
    pub fields: Vec<Field>,
    pub focus: usize,
    /// Id of the task or user being edited.
    pub target: Option<String>,
}

impl Form {
    pub fn new(kind: FormKind) -> Self {
        let fields = match kind {
            FormKind::Login => vec![Field::text("Email"), Field::secret("Password")],
            FormKind::Signup => vec![
                Field::text("Full name"),
                Field::text("Email"),
                Field::secret("Password"),
                Field::secret("Confirm password"),
                Field::choice("Role", ROLE_OPTIONS, 0),
            ],
            FormKind::ForgotPassword => vec![Field::text("Email")],
            FormKind::NewProject => vec![Field::text("Title"), Field::text("Description")],
            FormKind::NewTask | FormKind::EditTask => vec![
                Field::text("Title"),
                Field::text("Description"),
                Field::text("Deadline (YYYY-MM-DD)"),
                Field::choice("Status", STATUS_OPTIONS, 0),
                Field::choice("Priority", PRIORITY_OPTIONS, 1),
                Field::text("Assignee id"),
            ],
            FormKind::NewUser | FormKind::EditUser => vec![
                Field::text("Name"),
                Field::text("Email"),
                Field::choice("Role", ROLE_OPTIONS, 0),
            ],
        };
        Self {
            kind,
            fields,
            focus: 0,
            target: None,
        }
    }

    /// The task form filled in from an existing task.
    pub fn edit_task(task: &Task) -> Self {
        let mut form = Self::new(FormKind::EditTask);
        form.target = Some(task.id.clone());
        form.set(0, &task.title);
        form.set(1, task.description.as_deref().unwrap_or(""));
        if let Some(deadline) = task.deadline {
            form.set(2, &deadline.format("%Y-%m-%d").to_string());
        }
        form.set(3, status_option(task.status));
        form.set(4, &task.priority.to_string().to_lowercase());
        if let Some(assignee) = &task.assignee {
            form.set(5, &assignee.id);
        }
        form
    }

    /// The user form filled in from an existing account.
    pub fn edit_user(user: &User) -> Self {
        let mut form = Self::new(FormKind::EditUser);
        form.target = Some(user.id.clone());
        form.set(0, &user.name);
        form.set(1, &user.email);
        form.set(2, user.role.as_str());
        form
    }

    /// Fill a field: text is replaced, a choice selects the matching option.
    fn set(&mut self, index: usize, value: &str) {
        let Some(field) = self.fields.get_mut(index) else {
            return;
        };
        match &mut field.kind {
            FieldKind::Choice { options, selected } => {
                if let Some(i) = options.iter().position(|o| *o == value) {
                    *selected = i;
                }
            }
            _ => field.text = value.to_string(),
        }
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    pub fn prev_field(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    pub fn push(&mut self, c: char) {
        let field = &mut self.fields[self.focus];
        if !matches!(field.kind, FieldKind::Choice { .. }) {
            field.text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.fields[self.focus].text.pop();
    }

    /// Cycle the focused choice field. `forward` picks the direction.
    pub fn cycle(&mut self, forward: bool) {
        if let FieldKind::Choice { options, selected } = &mut self.fields[self.focus].kind {
            let len = options.len();
            *selected = if forward {
                (*selected + 1) % len
            } else {
                (*selected + len - 1) % len
            };
        }
    }

    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map(Field::value).unwrap_or("")
    }

    fn role(&self, index: usize) -> Role {
        self.value(index).parse().unwrap_or(Role::Developer)
    }

    pub fn signup(&self) -> SignupForm {
        SignupForm {
            name: self.value(0).to_string(),
            email: self.value(1).to_string(),
            password: self.value(2).to_string(),
            confirm_password: self.value(3).to_string(),
            role: self.role(4),
        }
    }

    pub fn task(&self) -> TaskForm {
        let assignee = self.value(5).trim();
        TaskForm {
            title: self.value(0).to_string(),
            description: self.value(1).to_string(),
            deadline: self.value(2).to_string(),
            status: self.value(3).parse::<TaskStatus>().unwrap_or_default(),
            priority: self.value(4).parse::<Priority>().unwrap_or_default(),
            assignee_id: (!assignee.is_empty()).then(|| assignee.to_string()),
        }
    }

    /// Name, email and role of the user form.
    pub fn user(&self) -> (String, String, Role) {
        (
            self.value(0).to_string(),
            self.value(1).to_string(),
            self.role(2),
        )
    }
}
