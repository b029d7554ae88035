//! Session command handlers.
//!
//! `login` exchanges credentials for a session and persists it, `logout`
//! removes it, and `whoami` shows it.

use super::CommandContext;
use crate::error::Result;
use crate::model::Session;
use crate::output::{print_info, print_session, print_success};
use crate::prompt;
use crate::validation::validate_login;

/// Log in and persist the session.
///
/// Missing email or password are prompted for on stdin.
pub fn login_command(
    ctx: &CommandContext,
    email: Option<&str>,
    password: Option<&str>,
) -> Result<Session> {
    let email = match email {
        Some(e) => e.to_string(),
        None => prompt::input("Email:", None)?,
    };
    let password = match password {
        Some(p) => p.to_string(),
        None => prompt::password("Password:")?,
    };

    let credentials = validate_login(&email, &password)?;
    let session = ctx.backend.login(&credentials)?;
    ctx.sessions.save(&session)?;

    print_success(&format!(
        "Logged in as {} ({})",
        session.display_name,
        session.role.label()
    ));
    Ok(session)
}

/// Remove the persisted session.
///
/// The file is removed even when it cannot be read.
pub fn logout_command(ctx: &CommandContext) -> Result<()> {
    let loaded = ctx.sessions.load();
    ctx.sessions.clear()?;
    match loaded {
        Ok(Some(session)) => print_success(&format!("Logged out {}", session.email)),
        Ok(None) => print_info("Not logged in."),
        Err(e) => {
            log::warn!("could not read session before logout: {}", e);
            print_success("Logged out");
        }
    }
    Ok(())
}

/// Show the signed-in user.
pub fn whoami_command(ctx: &CommandContext) -> Result<()> {
    match ctx.sessions.load()? {
        Some(session) => print_session(&session),
        None => print_info("Not logged in. Run `projectflow login`."),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{demo_context, login_as};
    use super::*;
    use crate::error::ProjectFlowError;
    use crate::model::Role;

    #[test]
    fn test_login_persists_session() {
        let (ctx, _dir) = demo_context();
        let session = login_as(&ctx, "manager@projectflow.com", "manager123");
        assert_eq!(session.role, Role::Manager);
        assert_eq!(ctx.sessions.load().unwrap(), Some(session));
    }

    #[test]
    fn test_login_with_wrong_password() {
        let (ctx, _dir) = demo_context();
        let err = login_command(&ctx, Some("dev@projectflow.com"), Some("nope")).unwrap_err();
        assert!(matches!(err, ProjectFlowError::InvalidCredentials));
        assert!(ctx.sessions.load().unwrap().is_none());
    }

    #[test]
    fn test_login_validates_before_calling_backend() {
        let (ctx, _dir) = demo_context();
        let err = login_command(&ctx, Some("  "), Some("dev123")).unwrap_err();
        assert_eq!(err.to_string(), "Please enter your email");
    }

    #[test]
    fn test_logout_clears_session() {
        let (ctx, _dir) = demo_context();
        login_as(&ctx, "dev@projectflow.com", "dev123");
        logout_command(&ctx).unwrap();
        assert!(ctx.sessions.load().unwrap().is_none());
        // Logging out twice is not an error
        logout_command(&ctx).unwrap();
    }

    #[test]
    fn test_logout_removes_unreadable_session() {
        let (ctx, _dir) = demo_context();
        std::fs::write(ctx.sessions.path(), [0xff, 0xfe, 0x00, 0x7b]).unwrap();

        logout_command(&ctx).unwrap();
        assert!(!ctx.sessions.path().exists());
    }
}
