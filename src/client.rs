//! Backend access.
//!
//! [`Backend`] is the seam between the dashboard and wherever projects live.
//! [`ApiClient`] talks to the ProjectFlow REST API; the demo backend in
//! [`crate::demo`] serves built-in sample data.

use crate::config::Config;
use crate::error::{ProjectFlowError, Result};
use crate::model::{
    Credentials, NewProject, NewTask, NewUser, Project, ProjectId, Session, Task, TaskChanges,
    User, UserUpdate,
};
use reqwest::blocking::{Client, Response};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Operations the dashboard needs from a backend.
///
/// Implementations are shared with the fetch worker thread, hence the
/// `Send + Sync` bound.
pub trait Backend: Send + Sync {
    /// Exchange credentials for a session.
    fn login(&self, credentials: &Credentials) -> Result<Session>;

    fn list_projects(&self) -> Result<Vec<Project>>;

    fn get_project(&self, id: &ProjectId) -> Result<Project>;

    fn create_project(&self, project: &NewProject) -> Result<Project>;

    fn delete_project(&self, id: &ProjectId) -> Result<()>;

    fn create_task(&self, project_id: &ProjectId, task: &NewTask) -> Result<Task>;

    /// Apply `changes` to a task and return the updated task.
    fn update_task(&self, task_id: &str, changes: &TaskChanges) -> Result<Task>;

    fn delete_task(&self, task_id: &str) -> Result<()>;

    fn list_users(&self) -> Result<Vec<User>>;

    fn create_user(&self, user: &NewUser) -> Result<User>;

    fn update_user(&self, user_id: &str, user: &UserUpdate) -> Result<User>;

    fn delete_user(&self, user_id: &str) -> Result<()>;
}

/// Error body returned by the API.
#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// Map a non-success response to an error.
///
/// `what` names the resource for 404s (e.g. "Project 3").
pub fn error_from_status(status: u16, body: &str, what: &str) -> ProjectFlowError {
    match status {
        401 => ProjectFlowError::InvalidCredentials,
        404 => ProjectFlowError::NotFound(what.to_string()),
        _ => {
            let detail = serde_json::from_str::<ErrorBody>(body)
                .ok()
                .map(|b| match b.detail {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                })
                .unwrap_or_else(|| body.trim().to_string());
            ProjectFlowError::Api { status, detail }
        }
    }
}

/// Blocking HTTP client for the ProjectFlow REST API.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn check(response: Response, what: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        log::warn!("{} request failed with {}: {}", what, status, body);
        Err(error_from_status(status.as_u16(), &body, what))
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T> {
        log::debug!("GET {}", path);
        let response = self.client.get(self.url(path)).send()?;
        Ok(Self::check(response, what)?.json()?)
    }

    fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &serde_json::Value,
        what: &str,
    ) -> Result<T> {
        log::debug!("{} {}", method, path);
        let response = self.client.request(method, self.url(path)).json(body).send()?;
        Ok(Self::check(response, what)?.json()?)
    }

    fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
        what: &str,
    ) -> Result<T> {
        self.send_json(Method::POST, path, body, what)
    }

    fn delete(&self, path: &str, what: &str) -> Result<()> {
        log::debug!("DELETE {}", path);
        let response = self.client.delete(self.url(path)).send()?;
        Self::check(response, what)?;
        Ok(())
    }
}

/// Numeric ids go out as numbers, anything else as text.
fn id_value(id: &str) -> serde_json::Value {
    match id.parse::<u64>() {
        Ok(n) => json!(n),
        Err(_) => json!(id),
    }
}

/// JSON body for a task update: only the fields being changed.
fn task_changes_body(changes: &TaskChanges) -> Result<serde_json::Value> {
    let mut body = serde_json::to_value(changes)?;
    if let Some(id) = changes.assignee_id.as_deref() {
        body["assignee_id"] = id_value(id);
    }
    Ok(body)
}

/// JSON body for task creation. Numeric assignee ids are sent as numbers.
fn task_body(task: &NewTask) -> serde_json::Value {
    let assignee_id = task.assignee_id.as_deref().map(id_value);
    json!({
        "title": task.title,
        "description": task.description,
        "deadline": task.deadline.format("%Y-%m-%d").to_string(),
        "status": task.status,
        "priority": task.priority,
        "assignee_id": assignee_id,
    })
}

impl Backend for ApiClient {
    fn login(&self, credentials: &Credentials) -> Result<Session> {
        let body = json!({ "email": credentials.email, "password": credentials.password });
        let response = self.client.post(self.url("/login")).json(&body).send()?;
        let user: User = Self::check(response, "User")?.json()?;
        log::info!("logged in as {} ({})", user.email, user.role.label());
        Ok(Session::from(user))
    }

    fn list_projects(&self) -> Result<Vec<Project>> {
        self.get_json("/projects/", "Projects")
    }

    fn get_project(&self, id: &ProjectId) -> Result<Project> {
        self.get_json(&format!("/projects/{}", id), &format!("Project {}", id))
    }

    fn create_project(&self, project: &NewProject) -> Result<Project> {
        let body = json!({ "title": project.title, "description": project.description });
        self.post_json("/projects/", &body, "Project")
    }

    fn delete_project(&self, id: &ProjectId) -> Result<()> {
        self.delete(&format!("/projects/{}", id), &format!("Project {}", id))
    }

    fn create_task(&self, project_id: &ProjectId, task: &NewTask) -> Result<Task> {
        log::debug!("POST /tasks/?project_id={}", project_id);
        let response = self
            .client
            .post(self.url("/tasks/"))
            .query(&[("project_id", project_id.as_str())])
            .json(&task_body(task))
            .send()?;
        Ok(Self::check(response, &format!("Project {}", project_id))?.json()?)
    }

    fn update_task(&self, task_id: &str, changes: &TaskChanges) -> Result<Task> {
        let body = task_changes_body(changes)?;
        self.send_json(
            Method::PATCH,
            &format!("/tasks/{}", task_id),
            &body,
            &format!("Task {}", task_id),
        )
    }

    fn delete_task(&self, task_id: &str) -> Result<()> {
        self.delete(&format!("/tasks/{}", task_id), &format!("Task {}", task_id))
    }

    fn list_users(&self) -> Result<Vec<User>> {
        self.get_json("/users/", "Users")
    }

    fn create_user(&self, user: &NewUser) -> Result<User> {
        let body = serde_json::to_value(user)?;
        self.post_json("/users/", &body, "User")
    }

    fn update_user(&self, user_id: &str, user: &UserUpdate) -> Result<User> {
        let body = serde_json::to_value(user)?;
        self.send_json(
            Method::PUT,
            &format!("/users/{}", user_id),
            &body,
            &format!("User {}", user_id),
        )
    }

    fn delete_user(&self, user_id: &str) -> Result<()> {
        self.delete(&format!("/users/{}", user_id), &format!("User {}", user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, TaskStatus};
    use chrono::NaiveDate;

    #[test]
    fn test_base_url_is_normalized() {
        let client = ApiClient::new(" http://127.0.0.1:8000/ ", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8000");
        assert_eq!(client.url("/projects/"), "http://127.0.0.1:8000/projects/");
    }

    #[test]
    fn test_error_from_status_maps_auth_and_not_found() {
        assert!(matches!(
            error_from_status(401, "", "User"),
            ProjectFlowError::InvalidCredentials
        ));
        match error_from_status(404, r#"{"detail":"Project not found"}"#, "Project 9") {
            ProjectFlowError::NotFound(what) => assert_eq!(what, "Project 9"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_error_from_status_uses_detail() {
        match error_from_status(400, r#"{"detail":"Email already registered"}"#, "User") {
            ProjectFlowError::Api { status, detail } => {
                assert_eq!(status, 400);
                assert_eq!(detail, "Email already registered");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_error_from_status_falls_back_to_body() {
        match error_from_status(500, "Internal Server Error\n", "Projects") {
            ProjectFlowError::Api { detail, .. } => assert_eq!(detail, "Internal Server Error"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_task_body() {
        let task = NewTask {
            title: "Setup database schema".to_string(),
            description: None,
            deadline: NaiveDate::from_ymd_opt(2025, 10, 15).unwrap(),
            status: TaskStatus::InProgress,
            priority: Priority::High,
            assignee_id: Some("4".to_string()),
        };
        let body = task_body(&task);
        assert_eq!(body["deadline"], "2025-10-15");
        assert_eq!(body["status"], "in-progress");
        assert_eq!(body["priority"], "high");
        assert_eq!(body["assignee_id"], 4);
        assert!(body["description"].is_null());
    }

    #[test]
    fn test_task_changes_body_sends_only_changed_fields() {
        let changes = TaskChanges {
            status: Some(TaskStatus::Done),
            assignee_id: Some("7".to_string()),
            ..TaskChanges::default()
        };
        let body = task_changes_body(&changes).unwrap();
        assert_eq!(body, json!({ "status": "done", "assignee_id": 7 }));
    }
}
