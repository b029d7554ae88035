//! Domain types shared by the router, the stats projector and the backends.
//!
//! The wire format follows the ProjectFlow REST API: snake_case fields,
//! kebab-case enum values, `YYYY-MM-DD` deadlines. Identifiers are served as
//! integers by the API and as strings by the demo data, so both are accepted
//! and carried as text.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Raw identifier as it appears on the wire.
#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Number(u64),
}

impl IdRepr {
    fn into_string(self) -> String {
        match self {
            IdRepr::Text(s) => s,
            IdRepr::Number(n) => n.to_string(),
        }
    }
}

fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    IdRepr::deserialize(deserializer).map(IdRepr::into_string)
}

/// Identifier of a project. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct ProjectId(String);

impl ProjectId {
    /// Build an identifier, rejecting empty or whitespace-only input.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == id.len() {
            Some(Self(id))
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Identifier for a numeric id, as assigned by the API.
    pub fn from_number(id: u64) -> Self {
        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for ProjectId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = id_string(deserializer)?;
        ProjectId::new(raw).ok_or_else(|| serde::de::Error::custom("empty project id"))
    }
}

impl From<ProjectId> for String {
    fn from(id: ProjectId) -> Self {
        id.0
    }
}

impl FromStr for ProjectId {
    type Err = crate::error::ProjectFlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProjectId::new(s).ok_or_else(|| crate::error::ProjectFlowError::InvalidId(s.to_string()))
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Developer,
}

impl Role {
    /// Name used on the wire and in the CLI.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Developer => "developer",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Manager => "Project Manager",
            Role::Developer => "Developer",
        }
    }

    /// Admins and managers may create projects; developers may not.
    pub fn can_create_projects(&self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "developer" | "dev" => Ok(Role::Developer),
            other => Err(format!(
                "unknown role '{}' (expected admin, manager or developer)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }

    /// All statuses in kanban column order.
    pub fn all() -> &'static [TaskStatus] {
        &[TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done]
    }

    /// The column to the right, if any.
    pub fn next(&self) -> Option<TaskStatus> {
        match self {
            TaskStatus::Todo => Some(TaskStatus::InProgress),
            TaskStatus::InProgress => Some(TaskStatus::Done),
            TaskStatus::Done => None,
        }
    }

    /// The column to the left, if any.
    pub fn previous(&self) -> Option<TaskStatus> {
        match self {
            TaskStatus::Todo => None,
            TaskStatus::InProgress => Some(TaskStatus::Todo),
            TaskStatus::Done => Some(TaskStatus::InProgress),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "todo" | "to-do" => Ok(TaskStatus::Todo),
            "in-progress" | "in_progress" | "inprogress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            other => Err(format!(
                "unknown status '{}' (expected todo, in-progress or done)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!(
                "unknown priority '{}' (expected low, medium or high)",
                other
            )),
        }
    }
}

/// A person attached to a project or assigned to a task.
///
/// The API embeds full user records as assignees; only the fields needed for
/// display are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
}

impl TeamMember {
    /// First letter of the name, used as an avatar placeholder.
    pub fn initial(&self) -> char {
        self.name
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('?')
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub assignee: Option<TeamMember>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub team_members: Vec<TeamMember>,
}

/// A user account as listed on the administration screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// The authenticated identity of the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub display_name: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for Session {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            display_name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewProject {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub deadline: NaiveDate,
    pub status: TaskStatus,
    pub priority: Priority,
    pub assignee_id: Option<String>,
}

/// Changes to an existing task. Fields left `None` keep their value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TaskChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
}

impl TaskChanges {
    /// Only move the task to another column.
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Apply the changes to `task`. An assignee id that is not among
    /// `members` leaves the assignee unchanged.
    pub fn apply_to(&self, task: &mut Task, members: &[TeamMember]) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = Some(description.clone());
        }
        if let Some(deadline) = self.deadline {
            task.deadline = Some(deadline);
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(member) = self
            .assignee_id
            .as_ref()
            .and_then(|id| members.iter().find(|m| &m.id == id))
        {
            task.assignee = Some(member.clone());
        }
    }
}

impl From<NewTask> for TaskChanges {
    fn from(task: NewTask) -> Self {
        Self {
            title: Some(task.title),
            description: task.description,
            deadline: Some(task.deadline),
            status: Some(task.status),
            priority: Some(task.priority),
            assignee_id: task.assignee_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password: String,
}

/// New name, email and role for an existing account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserUpdate {
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_id_rejects_empty() {
        assert!(ProjectId::new("").is_none());
        assert!(ProjectId::new("   ").is_none());
        assert_eq!(ProjectId::new(" 7 ").unwrap().as_str(), "7");
        assert_eq!(ProjectId::from_number(7), ProjectId::new("7").unwrap());
    }

    #[test]
    fn test_project_from_api_json_with_integer_ids() {
        let json = r#"{
            "id": 3,
            "title": "E-Commerce Platform",
            "description": null,
            "tasks": [
                {
                    "id": 11,
                    "project_id": 3,
                    "title": "Setup database schema",
                    "description": null,
                    "deadline": "2025-10-15",
                    "status": "in-progress",
                    "assignee": {"id": 2, "name": "Bob Smith", "email": "bob@projectflow.com", "role": "developer"}
                }
            ]
        }"#;

        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.id.as_str(), "3");
        assert_eq!(project.tasks.len(), 1);
        let task = &project.tasks[0];
        assert_eq!(task.id, "11");
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.deadline, NaiveDate::from_ymd_opt(2025, 10, 15));
        assert_eq!(task.assignee.as_ref().unwrap().name, "Bob Smith");
        assert!(project.team_members.is_empty());
    }

    #[test]
    fn test_task_without_deadline_deserializes() {
        let task: Task = serde_json::from_str(r#"{"id": "1", "title": "Draft"}"#).unwrap();
        assert!(task.deadline.is_none());
        assert_eq!(task.status, TaskStatus::Todo);
    }

    #[test]
    fn test_project_with_empty_id_is_rejected() {
        let result: std::result::Result<Project, _> =
            serde_json::from_str(r#"{"id": "", "title": "Nameless"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_session_from_user() {
        let user = User {
            id: "8".to_string(),
            name: "Admin User".to_string(),
            email: "admin@projectflow.com".to_string(),
            role: Role::Admin,
        };
        let session = Session::from(user);
        assert_eq!(session.user_id, "8");
        assert_eq!(session.display_name, "Admin User");
        assert_eq!(session.role, Role::Admin);
    }

    #[test]
    fn test_status_parsing_accepts_wire_and_cli_spellings() {
        assert_eq!("in-progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!("IN_PROGRESS".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert!("blocked".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_role_permissions() {
        assert!(Role::Admin.can_create_projects());
        assert!(Role::Manager.can_create_projects());
        assert!(!Role::Developer.can_create_projects());
    }

    #[test]
    fn test_team_member_initial() {
        let member = TeamMember {
            id: "1".to_string(),
            name: "alice Johnson".to_string(),
        };
        assert_eq!(member.initial(), 'A');
    }

    #[test]
    fn test_status_columns_step_left_and_right() {
        assert_eq!(TaskStatus::Todo.next(), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::Done.next(), None);
        assert_eq!(TaskStatus::Todo.previous(), None);
        assert_eq!(TaskStatus::Done.previous(), Some(TaskStatus::InProgress));
    }

    #[test]
    fn test_task_changes_apply_only_set_fields() {
        let bob = TeamMember {
            id: "2".to_string(),
            name: "Bob Smith".to_string(),
        };
        let mut task = Task {
            id: "5".to_string(),
            title: "Setup database schema".to_string(),
            description: Some("Postgres".to_string()),
            assignee: None,
            deadline: NaiveDate::from_ymd_opt(2025, 10, 15),
            status: TaskStatus::Todo,
            priority: Priority::Medium,
        };

        TaskChanges::status(TaskStatus::Done).apply_to(&mut task, &[]);
        assert_eq!(task.status, TaskStatus::Done);
        assert_eq!(task.title, "Setup database schema");
        assert_eq!(task.description.as_deref(), Some("Postgres"));

        let changes = TaskChanges {
            title: Some("Migrate schema".to_string()),
            assignee_id: Some("2".to_string()),
            ..TaskChanges::default()
        };
        changes.apply_to(&mut task, std::slice::from_ref(&bob));
        assert_eq!(task.title, "Migrate schema");
        assert_eq!(task.assignee, Some(bob));
        assert_eq!(task.status, TaskStatus::Done);
    }

    #[test]
    fn test_task_changes_serialize_only_set_fields() {
        let body = serde_json::to_value(TaskChanges::status(TaskStatus::InProgress)).unwrap();
        assert_eq!(body, serde_json::json!({ "status": "in-progress" }));
    }
}
