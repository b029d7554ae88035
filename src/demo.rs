//! Built-in demo backend.
//!
//! Serves a fixed set of sample projects, accounts and users so the dashboard
//! can be explored without a running API. Changes live in memory only.

use crate::client::Backend;
use crate::error::{ProjectFlowError, Result};
use crate::model::{
    Credentials, NewProject, NewTask, NewUser, Priority, Project, ProjectId, Role, Session, Task,
    TaskChanges, TaskStatus, TeamMember, User, UserUpdate,
};
use chrono::NaiveDate;
use std::sync::{Mutex, MutexGuard};

/// A demo login.
struct DemoAccount {
    email: &'static str,
    password: &'static str,
    name: &'static str,
    role: Role,
}

const DEMO_ACCOUNTS: &[DemoAccount] = &[
    DemoAccount {
        email: "admin@projectflow.com",
        password: "admin123",
        name: "Admin User",
        role: Role::Admin,
    },
    DemoAccount {
        email: "manager@projectflow.com",
        password: "manager123",
        name: "Project Manager",
        role: Role::Manager,
    },
    DemoAccount {
        email: "dev@projectflow.com",
        password: "dev123",
        name: "Developer",
        role: Role::Developer,
    },
];

/// Login hints shown on the login screen in demo mode.
pub fn demo_credentials() -> Vec<(&'static str, &'static str, Role)> {
    DEMO_ACCOUNTS
        .iter()
        .map(|a| (a.email, a.password, a.role))
        .collect()
}

struct DemoData {
    projects: Vec<Project>,
    users: Vec<User>,
    next_id: u64,
}

pub struct DemoBackend {
    data: Mutex<DemoData>,
}

impl DemoBackend {
    pub fn new() -> Self {
        Self {
            data: Mutex::new(DemoData {
                projects: demo_projects(),
                users: demo_users(),
                next_id: 100,
            }),
        }
    }

    fn data(&self) -> MutexGuard<'_, DemoData> {
        // A panic while holding the lock cannot leave the data half-written.
        self.data.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for DemoBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoData {
    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl Backend for DemoBackend {
    fn login(&self, credentials: &Credentials) -> Result<Session> {
        DEMO_ACCOUNTS
            .iter()
            .find(|a| a.email == credentials.email && a.password == credentials.password)
            .map(|a| Session {
                user_id: format!("demo-{}", a.role.as_str()),
                display_name: a.name.to_string(),
                email: a.email.to_string(),
                role: a.role,
            })
            .ok_or(ProjectFlowError::InvalidCredentials)
    }

    fn list_projects(&self) -> Result<Vec<Project>> {
        Ok(self.data().projects.clone())
    }

    fn get_project(&self, id: &ProjectId) -> Result<Project> {
        self.data()
            .projects
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| ProjectFlowError::NotFound(format!("Project {}", id)))
    }

    fn create_project(&self, project: &NewProject) -> Result<Project> {
        let mut data = self.data();
        let id = data.allocate_id();
        let created = Project {
            id: ProjectId::from_number(id),
            title: project.title.clone(),
            description: project.description.clone(),
            tasks: Vec::new(),
            team_members: Vec::new(),
        };
        data.projects.push(created.clone());
        Ok(created)
    }

    fn delete_project(&self, id: &ProjectId) -> Result<()> {
        let mut data = self.data();
        let before = data.projects.len();
        data.projects.retain(|p| &p.id != id);
        if data.projects.len() == before {
            return Err(ProjectFlowError::NotFound(format!("Project {}", id)));
        }
        Ok(())
    }

    fn create_task(&self, project_id: &ProjectId, task: &NewTask) -> Result<Task> {
        let mut data = self.data();
        let id = data.allocate_id();
        let project = data
            .projects
            .iter_mut()
            .find(|p| &p.id == project_id)
            .ok_or_else(|| ProjectFlowError::NotFound(format!("Project {}", project_id)))?;

        let assignee = task.assignee_id.as_ref().and_then(|aid| {
            project
                .team_members
                .iter()
                .find(|m| &m.id == aid)
                .cloned()
        });

        let created = Task {
            id: id.to_string(),
            title: task.title.clone(),
            description: task.description.clone(),
            assignee,
            deadline: Some(task.deadline),
            status: task.status,
            priority: task.priority,
        };
        project.tasks.push(created.clone());
        Ok(created)
    }

    fn update_task(&self, task_id: &str, changes: &TaskChanges) -> Result<Task> {
        let mut data = self.data();
        for project in data.projects.iter_mut() {
            let members = &project.team_members;
            if let Some(task) = project.tasks.iter_mut().find(|t| t.id == task_id) {
                changes.apply_to(task, members);
                return Ok(task.clone());
            }
        }
        Err(ProjectFlowError::NotFound(format!("Task {}", task_id)))
    }

    fn delete_task(&self, task_id: &str) -> Result<()> {
        let mut data = self.data();
        for project in data.projects.iter_mut() {
            if let Some(pos) = project.tasks.iter().position(|t| t.id == task_id) {
                project.tasks.remove(pos);
                return Ok(());
            }
        }
        Err(ProjectFlowError::NotFound(format!("Task {}", task_id)))
    }

    fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.data().users.clone())
    }

    fn create_user(&self, user: &NewUser) -> Result<User> {
        let mut data = self.data();
        if data
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(ProjectFlowError::Api {
                status: 400,
                detail: "Email already registered".to_string(),
            });
        }
        let created = User {
            id: data.allocate_id().to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        };
        data.users.push(created.clone());
        Ok(created)
    }

    fn update_user(&self, user_id: &str, user: &UserUpdate) -> Result<User> {
        let mut data = self.data();
        if data
            .users
            .iter()
            .any(|u| u.id != user_id && u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(ProjectFlowError::Api {
                status: 400,
                detail: "Email already registered".to_string(),
            });
        }
        let existing = data
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| ProjectFlowError::NotFound(format!("User {}", user_id)))?;
        existing.name = user.name.clone();
        existing.email = user.email.clone();
        existing.role = user.role;
        Ok(existing.clone())
    }

    fn delete_user(&self, user_id: &str) -> Result<()> {
        let mut data = self.data();
        let before = data.users.len();
        data.users.retain(|u| u.id != user_id);
        if data.users.len() == before {
            return Err(ProjectFlowError::NotFound(format!("User {}", user_id)));
        }
        Ok(())
    }
}

fn member(id: &str, name: &str) -> TeamMember {
    TeamMember {
        id: id.to_string(),
        name: name.to_string(),
    }
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn demo_task(
    id: &str,
    title: &str,
    assignee: &TeamMember,
    deadline: Option<NaiveDate>,
    priority: Priority,
    status: TaskStatus,
) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: None,
        assignee: Some(assignee.clone()),
        deadline,
        status,
        priority,
    }
}

fn demo_projects() -> Vec<Project> {
    let alice = member("1", "Alice Johnson");
    let bob = member("2", "Bob Smith");
    let carol = member("3", "Carol White");
    let david = member("4", "David Brown");
    let emma = member("5", "Emma Davis");
    let frank = member("6", "Frank Miller");
    let grace = member("7", "Grace Lee");

    use Priority::{High, Low, Medium};
    use TaskStatus::{Done, InProgress, Todo};

    vec![
        Project {
            id: ProjectId::from_number(1),
            title: "E-Commerce Platform".to_string(),
            description: Some(
                "Building a modern e-commerce solution with React and Node.js for our enterprise clients"
                    .to_string(),
            ),
            tasks: vec![
                demo_task("1", "Design product listing page", &alice, date(2025, 10, 20), High, Todo),
                demo_task("2", "Setup authentication system", &bob, date(2025, 10, 18), High, Todo),
                demo_task("3", "Implement payment gateway", &carol, date(2025, 10, 22), Medium, InProgress),
                demo_task("4", "Build shopping cart functionality", &david, date(2025, 10, 19), High, InProgress),
                demo_task("5", "Setup database schema", &alice, date(2025, 10, 15), Medium, Done),
                demo_task("6", "Create API endpoints", &bob, date(2025, 10, 16), Low, Done),
            ],
            team_members: vec![alice.clone(), bob.clone(), carol.clone(), david.clone()],
        },
        Project {
            id: ProjectId::from_number(2),
            title: "Mobile App Redesign".to_string(),
            description: Some("Refresh the customer mobile app with the new design system".to_string()),
            tasks: vec![
                demo_task("7", "Audit existing screens", &emma, date(2025, 10, 10), Medium, Done),
                demo_task("8", "Build component library", &frank, date(2025, 11, 5), High, InProgress),
                demo_task("9", "Usability testing round", &emma, date(2025, 11, 20), Medium, Todo),
            ],
            team_members: vec![emma, frank.clone()],
        },
        Project {
            id: ProjectId::from_number(3),
            title: "Marketing Website".to_string(),
            description: Some("Launch the new product marketing site".to_string()),
            tasks: vec![
                demo_task("10", "Write landing page copy", &grace, date(2025, 10, 12), Low, Done),
                demo_task("11", "SEO review", &grace, date(2025, 10, 25), Low, Done),
            ],
            team_members: vec![grace, frank],
        },
        Project {
            id: ProjectId::from_number(4),
            title: "Internal Analytics".to_string(),
            description: None,
            tasks: Vec::new(),
            team_members: Vec::new(),
        },
    ]
}

fn demo_users() -> Vec<User> {
    [
        ("1", "Alice Johnson", "alice@projectflow.com", Role::Manager),
        ("2", "Bob Smith", "bob@projectflow.com", Role::Developer),
        ("3", "Carol White", "carol@projectflow.com", Role::Developer),
        ("4", "David Brown", "david@projectflow.com", Role::Developer),
        ("5", "Emma Davis", "emma@projectflow.com", Role::Manager),
        ("6", "Frank Miller", "frank@projectflow.com", Role::Developer),
        ("7", "Grace Lee", "grace@projectflow.com", Role::Developer),
        ("8", "Admin User", "admin@projectflow.com", Role::Admin),
    ]
    .into_iter()
    .map(|(id, name, email, role)| User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::project_summary;

    fn creds(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_demo_accounts_log_in() {
        let backend = DemoBackend::new();
        for (email, password, role) in demo_credentials() {
            let session = backend.login(&creds(email, password)).unwrap();
            assert_eq!(session.role, role);
            assert_eq!(session.email, email);
            assert_eq!(session.user_id, format!("demo-{}", role.as_str()));
        }
    }

    #[test]
    fn test_wrong_password_is_rejected() {
        let backend = DemoBackend::new();
        let err = backend
            .login(&creds("admin@projectflow.com", "admin"))
            .unwrap_err();
        assert!(matches!(err, ProjectFlowError::InvalidCredentials));
    }

    #[test]
    fn test_ecommerce_project_is_one_third_done() {
        let backend = DemoBackend::new();
        let project = backend.get_project(&ProjectId::from_number(1)).unwrap();
        let summary = project_summary(&project);
        assert_eq!(summary.total_tasks, 6);
        assert_eq!(summary.completed_tasks, 2);
        assert_eq!(summary.progress_percent, 33);
    }

    #[test]
    fn test_missing_project_is_not_found() {
        let backend = DemoBackend::new();
        assert!(matches!(
            backend.get_project(&ProjectId::from_number(404)),
            Err(ProjectFlowError::NotFound(_))
        ));
    }

    #[test]
    fn test_create_project_and_task() {
        let backend = DemoBackend::new();
        let project = backend
            .create_project(&NewProject {
                title: "Data Migration".to_string(),
                description: None,
            })
            .unwrap();
        assert_eq!(backend.list_projects().unwrap().len(), 5);

        let task = backend
            .create_task(
                &project.id,
                &NewTask {
                    title: "Export legacy data".to_string(),
                    description: None,
                    deadline: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
                    status: TaskStatus::Todo,
                    priority: Priority::High,
                    assignee_id: None,
                },
            )
            .unwrap();
        let reloaded = backend.get_project(&project.id).unwrap();
        assert_eq!(reloaded.tasks, vec![task.clone()]);

        backend.delete_task(&task.id).unwrap();
        assert!(backend.get_project(&project.id).unwrap().tasks.is_empty());
        assert!(backend.delete_task(&task.id).is_err());
    }

    #[test]
    fn test_task_assignee_resolved_from_team() {
        let backend = DemoBackend::new();
        let task = backend
            .create_task(
                &ProjectId::from_number(1),
                &NewTask {
                    title: "Load testing".to_string(),
                    description: None,
                    deadline: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
                    status: TaskStatus::Todo,
                    priority: Priority::Low,
                    assignee_id: Some("3".to_string()),
                },
            )
            .unwrap();
        assert_eq!(task.assignee.unwrap().name, "Carol White");
    }

    #[test]
    fn test_delete_project() {
        let backend = DemoBackend::new();
        backend.delete_project(&ProjectId::from_number(4)).unwrap();
        assert_eq!(backend.list_projects().unwrap().len(), 3);
        assert!(backend.delete_project(&ProjectId::from_number(4)).is_err());
    }

    #[test]
    fn test_duplicate_user_email_rejected() {
        let backend = DemoBackend::new();
        let err = backend
            .create_user(&NewUser {
                name: "Alice Again".to_string(),
                email: "ALICE@projectflow.com".to_string(),
                role: Role::Developer,
                password: "secret1".to_string(),
            })
            .unwrap_err();
        assert_eq!(err.to_string(), "API error 400: Email already registered");

        let user = backend
            .create_user(&NewUser {
                name: "Henry Ford".to_string(),
                email: "henry@projectflow.com".to_string(),
                role: Role::Developer,
                password: "secret1".to_string(),
            })
            .unwrap();
        assert_eq!(backend.list_users().unwrap().last(), Some(&user));
    }

    #[test]
    fn test_move_task_to_done_updates_progress() {
        let backend = DemoBackend::new();
        let moved = backend
            .update_task("3", &TaskChanges::status(TaskStatus::Done))
            .unwrap();
        assert_eq!(moved.status, TaskStatus::Done);
        assert_eq!(moved.title, "Implement payment gateway");

        let project = backend.get_project(&ProjectId::from_number(1)).unwrap();
        assert_eq!(project_summary(&project).progress_percent, 50);
        assert!(matches!(
            backend.update_task("999", &TaskChanges::status(TaskStatus::Done)),
            Err(ProjectFlowError::NotFound(_))
        ));
    }

    #[test]
    fn test_edit_task_reassigns_within_team() {
        let backend = DemoBackend::new();
        let changes = TaskChanges {
            title: Some("Design product pages".to_string()),
            assignee_id: Some("4".to_string()),
            ..TaskChanges::default()
        };
        let task = backend.update_task("1", &changes).unwrap();
        assert_eq!(task.title, "Design product pages");
        assert_eq!(task.assignee.unwrap().name, "David Brown");
        assert_eq!(task.priority, Priority::High);
    }

    #[test]
    fn test_update_and_delete_user() {
        let backend = DemoBackend::new();
        let updated = backend
            .update_user(
                "7",
                &UserUpdate {
                    name: "Grace Lee".to_string(),
                    email: "grace.lee@projectflow.com".to_string(),
                    role: Role::Manager,
                },
            )
            .unwrap();
        assert_eq!(updated.role, Role::Manager);
        assert_eq!(updated.email, "grace.lee@projectflow.com");

        // Keeping your own email is not a duplicate; taking someone else's is
        let same = UserUpdate {
            name: "Bob Smith".to_string(),
            email: "bob@projectflow.com".to_string(),
            role: Role::Developer,
        };
        assert!(backend.update_user("2", &same).is_ok());
        assert!(backend.update_user("3", &same).is_err());

        backend.delete_user("7").unwrap();
        assert!(backend.list_users().unwrap().iter().all(|u| u.id != "7"));
        assert!(matches!(
            backend.delete_user("7"),
            Err(ProjectFlowError::NotFound(_))
        ));
    }
}
