//! Project command handlers.
//!
//! Lists projects, shows one project as a kanban board, and creates, moves and
//! deletes projects and tasks.

use super::CommandContext;
use crate::error::{ProjectFlowError, Result};
use crate::model::{Project, ProjectId, Session, Task, TaskChanges, TaskStatus};
use crate::output::{
    print_project_board, print_project_created, print_project_list, print_success,
    print_task_created,
};
use crate::stats::filter_projects;
use crate::validation::{validate_project, validate_task, TaskForm};
use chrono::Utc;

/// List projects, optionally filtered by a case-insensitive title search.
pub fn projects_command(ctx: &CommandContext, search: Option<&str>) -> Result<Vec<Project>> {
    ctx.require_session()?;
    let projects = ctx.backend.list_projects()?;
    let visible = filter_projects(&projects, search.unwrap_or(""));
    print_project_list(&visible);
    Ok(visible.into_iter().cloned().collect())
}

/// Show one project as a kanban board.
pub fn project_command(ctx: &CommandContext, id: &str) -> Result<Project> {
    ctx.require_session()?;
    let id: ProjectId = id.parse()?;
    let project = ctx.backend.get_project(&id)?;
    print_project_board(&project, Utc::now());
    Ok(project)
}

/// Create a project. Only admins and managers may do this.
pub fn create_project_command(
    ctx: &CommandContext,
    title: &str,
    description: Option<&str>,
) -> Result<Project> {
    let session = ctx.require_session()?;
    require_project_manager(&session, "create")?;
    let new_project = validate_project(title, description.unwrap_or(""))?;
    let project = ctx.backend.create_project(&new_project)?;
    log::info!("created project {} ({})", project.id, project.title);
    print_project_created(&project);
    Ok(project)
}

/// Add a task to a project.
pub fn add_task_command(ctx: &CommandContext, project: &str, form: &TaskForm) -> Result<Task> {
    ctx.require_session()?;
    let project_id: ProjectId = project.parse()?;
    let new_task = validate_task(form)?;
    let task = ctx.backend.create_task(&project_id, &new_task)?;
    log::info!("added task {} to project {}", task.id, project_id);
    print_task_created(project_id.as_str(), &task);
    Ok(task)
}

/// Delete a project and its tasks. Only admins and managers may do this.
pub fn delete_project_command(ctx: &CommandContext, id: &str) -> Result<()> {
    let session = ctx.require_session()?;
    require_project_manager(&session, "delete")?;
    let id: ProjectId = id.parse()?;
    ctx.backend.delete_project(&id)?;
    log::info!("deleted project {}", id);
    print_success(&format!("Project {} deleted", id));
    Ok(())
}

/// Move a task to another kanban column.
pub fn move_task_command(ctx: &CommandContext, task_id: &str, status: TaskStatus) -> Result<Task> {
    ctx.require_session()?;
    let task_id = task_ref(task_id)?;
    let task = ctx
        .backend
        .update_task(task_id, &TaskChanges::status(status))?;
    log::info!("moved task {} to {}", task.id, status.label());
    print_success(&format!("Task '{}' moved to {}", task.title, status.label()));
    Ok(task)
}

/// Delete a task.
pub fn delete_task_command(ctx: &CommandContext, task_id: &str) -> Result<()> {
    ctx.require_session()?;
    let task_id = task_ref(task_id)?;
    ctx.backend.delete_task(task_id)?;
    log::info!("deleted task {}", task_id);
    print_success(&format!("Task {} deleted", task_id));
    Ok(())
}

fn require_project_manager(session: &Session, action: &str) -> Result<()> {
    if session.role.can_create_projects() {
        return Ok(());
    }
    Err(ProjectFlowError::PermissionDenied(format!(
        "{}s cannot {} projects",
        session.role.label(),
        action
    )))
}

fn task_ref(task_id: &str) -> Result<&str> {
    let trimmed = task_id.trim();
    if trimmed.is_empty() {
        return Err(ProjectFlowError::InvalidId(task_id.to_string()));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{demo_context, login_as};
    use super::*;
    use crate::model::{Priority, TaskStatus};

    #[test]
    fn test_projects_requires_login() {
        let (ctx, _dir) = demo_context();
        assert!(matches!(
            projects_command(&ctx, None),
            Err(ProjectFlowError::NotLoggedIn)
        ));
    }

    #[test]
    fn test_projects_search() {
        let (ctx, _dir) = demo_context();
        login_as(&ctx, "dev@projectflow.com", "dev123");

        let all = projects_command(&ctx, None).unwrap();
        assert_eq!(all.len(), 4);

        let found = projects_command(&ctx, Some("MOBILE")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Mobile App Redesign");
    }

    #[test]
    fn test_project_by_id() {
        let (ctx, _dir) = demo_context();
        login_as(&ctx, "dev@projectflow.com", "dev123");

        let project = project_command(&ctx, "1").unwrap();
        assert_eq!(project.title, "E-Commerce Platform");

        assert!(matches!(
            project_command(&ctx, "999"),
            Err(ProjectFlowError::NotFound(_))
        ));
        assert!(matches!(
            project_command(&ctx, "  "),
            Err(ProjectFlowError::InvalidId(_))
        ));
    }

    #[test]
    fn test_developer_cannot_create_project() {
        let (ctx, _dir) = demo_context();
        login_as(&ctx, "dev@projectflow.com", "dev123");
        let err = create_project_command(&ctx, "Side project", None).unwrap_err();
        assert!(matches!(err, ProjectFlowError::PermissionDenied(_)));
    }

    #[test]
    fn test_manager_creates_project() {
        let (ctx, _dir) = demo_context();
        login_as(&ctx, "manager@projectflow.com", "manager123");

        let err = create_project_command(&ctx, "   ", None).unwrap_err();
        assert_eq!(err.to_string(), "Please enter a title");

        let project = create_project_command(&ctx, "Data Migration", Some("Move data")).unwrap();
        assert_eq!(project.description.as_deref(), Some("Move data"));
        assert!(ctx.backend.get_project(&project.id).is_ok());
    }

    #[test]
    fn test_add_task() {
        let (ctx, _dir) = demo_context();
        login_as(&ctx, "admin@projectflow.com", "admin123");

        let form = TaskForm {
            title: "Load testing".to_string(),
            deadline: "2025-12-01".to_string(),
            status: TaskStatus::InProgress,
            priority: Priority::High,
            ..Default::default()
        };
        let task = add_task_command(&ctx, "4", &form).unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);

        let project = ctx.backend.get_project(&"4".parse().unwrap()).unwrap();
        assert_eq!(project.tasks.len(), 1);

        let bad = TaskForm {
            deadline: "12/01/2025".to_string(),
            ..form
        };
        assert!(matches!(
            add_task_command(&ctx, "4", &bad),
            Err(ProjectFlowError::Validation(_))
        ));
    }

    #[test]
    fn test_delete_project_needs_manager() {
        let (ctx, _dir) = demo_context();
        login_as(&ctx, "dev@projectflow.com", "dev123");
        let err = delete_project_command(&ctx, "4").unwrap_err();
        assert_eq!(err.to_string(), "Permission denied: Developers cannot delete projects");
        assert_eq!(ctx.backend.list_projects().unwrap().len(), 4);

        login_as(&ctx, "manager@projectflow.com", "manager123");
        delete_project_command(&ctx, "4").unwrap();
        assert_eq!(ctx.backend.list_projects().unwrap().len(), 3);
        assert!(matches!(
            delete_project_command(&ctx, "4"),
            Err(ProjectFlowError::NotFound(_))
        ));
    }

    #[test]
    fn test_move_task_between_columns() {
        let (ctx, _dir) = demo_context();
        assert!(matches!(
            move_task_command(&ctx, "3", TaskStatus::Done),
            Err(ProjectFlowError::NotLoggedIn)
        ));

        login_as(&ctx, "dev@projectflow.com", "dev123");
        let task = move_task_command(&ctx, " 3 ", TaskStatus::Done).unwrap();
        assert_eq!(task.id, "3");
        assert_eq!(task.status, TaskStatus::Done);
        assert!(matches!(
            move_task_command(&ctx, "", TaskStatus::Done),
            Err(ProjectFlowError::InvalidId(_))
        ));
    }

    #[test]
    fn test_delete_task() {
        let (ctx, _dir) = demo_context();
        login_as(&ctx, "dev@projectflow.com", "dev123");

        let before = project_command(&ctx, "1").unwrap().tasks.len();
        delete_task_command(&ctx, "3").unwrap();
        assert_eq!(project_command(&ctx, "1").unwrap().tasks.len(), before - 1);
        assert!(matches!(
            delete_task_command(&ctx, "3"),
            Err(ProjectFlowError::NotFound(_))
        ));
    }
}
