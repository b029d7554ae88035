//! Form validation.
//!
//! Each form is checked field by field in display order and the first problem
//! is reported. The error text is what the user sees.

use crate::model::{
    Credentials, NewProject, NewTask, NewUser, Priority, Role, TaskStatus, UserUpdate,
};
use chrono::NaiveDate;
use thiserror::Error;

/// Minimum accepted password length on signup.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter your email")]
    MissingEmail,

    #[error("Please enter your password")]
    MissingPassword,

    #[error("Please enter your full name")]
    MissingName,

    #[error("Password must be at least {} characters", MIN_PASSWORD_LEN)]
    PasswordTooShort,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Please enter your email address")]
    MissingResetEmail,

    #[error("Please enter a title")]
    MissingTitle,

    #[error("Invalid deadline '{0}' (expected YYYY-MM-DD)")]
    InvalidDeadline(String),

    #[error("Please choose a deadline")]
    MissingDeadline,

    #[error("Please fill in all fields")]
    IncompleteUser,
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn optional_text(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn validate_login(email: &str, password: &str) -> Result<Credentials, ValidationError> {
    if blank(email) {
        return Err(ValidationError::MissingEmail);
    }
    if password.is_empty() {
        return Err(ValidationError::MissingPassword);
    }
    Ok(Credentials {
        email: email.trim().to_string(),
        password: password.to_string(),
    })
}

/// Fields of the signup form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Role,
}

impl Default for SignupForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            role: Role::Developer,
        }
    }
}

pub fn validate_signup(form: &SignupForm) -> Result<NewUser, ValidationError> {
    if blank(&form.name) {
        return Err(ValidationError::MissingName);
    }
    if blank(&form.email) {
        return Err(ValidationError::MissingEmail);
    }
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    if form.password != form.confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(NewUser {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        role: form.role,
        password: form.password.clone(),
    })
}

/// Returns the trimmed address a reset link would be sent to.
pub fn validate_forgot_password(email: &str) -> Result<String, ValidationError> {
    optional_text(email).ok_or(ValidationError::MissingResetEmail)
}

pub fn validate_project(title: &str, description: &str) -> Result<NewProject, ValidationError> {
    let title = optional_text(title).ok_or(ValidationError::MissingTitle)?;
    Ok(NewProject {
        title,
        description: optional_text(description),
    })
}

/// Fields of the task form, as typed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub deadline: String,
    pub status: TaskStatus,
    pub priority: Priority,
    pub assignee_id: Option<String>,
}

pub fn parse_deadline(input: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingDeadline);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDeadline(trimmed.to_string()))
}

pub fn validate_task(form: &TaskForm) -> Result<NewTask, ValidationError> {
    let title = optional_text(&form.title).ok_or(ValidationError::MissingTitle)?;
    let deadline = parse_deadline(&form.deadline)?;
    Ok(NewTask {
        title,
        description: optional_text(&form.description),
        deadline,
        status: form.status,
        priority: form.priority,
        assignee_id: form.assignee_id.clone(),
    })
}

/// Validate the add/edit user form on the administration screen.
///
/// Accounts created here get `initial_password`; the form itself has no
/// password field.
pub fn validate_user(
    name: &str,
    email: &str,
    role: Role,
    initial_password: &str,
) -> Result<NewUser, ValidationError> {
    let user = validate_user_update(name, email, role)?;
    Ok(NewUser {
        name: user.name,
        email: user.email,
        role: user.role,
        password: initial_password.to_string(),
    })
}

pub fn validate_user_update(
    name: &str,
    email: &str,
    role: Role,
) -> Result<UserUpdate, ValidationError> {
    if blank(name) || blank(email) {
        return Err(ValidationError::IncompleteUser);
    }
    Ok(UserUpdate {
        name: name.trim().to_string(),
        email: email.trim().to_string(),
        role,
    })
}
