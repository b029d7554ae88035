use crate::validation::ValidationError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProjectFlowError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid credentials.")]
    InvalidCredentials,

    #[error("Not logged in. Run `projectflow login` first.")]
    NotLoggedIn,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("API error {status}: {detail}")]
    Api { status: u16, detail: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid identifier: {0:?}")]
    InvalidId(String),

    #[error("Session file error at {path:?}: {message}")]
    SessionStore { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ProjectFlowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_message_is_passed_through() {
        let err: ProjectFlowError = ValidationError::PasswordMismatch.into();
        assert_eq!(err.to_string(), "Passwords do not match");
    }

    #[test]
    fn test_api_error_display() {
        let err = ProjectFlowError::Api {
            status: 400,
            detail: "Email already registered".to_string(),
        };
        assert_eq!(err.to_string(), "API error 400: Email already registered");
    }

    #[test]
    fn test_not_found_display() {
        let err = ProjectFlowError::NotFound("Project 7".to_string());
        assert_eq!(err.to_string(), "Project 7 not found");
    }
}
