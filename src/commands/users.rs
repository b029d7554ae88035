//! Users command handler.

use super::CommandContext;
use crate::error::Result;
use crate::model::{Role, User};
use crate::output::{print_user_table, print_warning};
use crate::stats::filter_users;

/// List users, optionally filtered by name or email.
pub fn users_command(ctx: &CommandContext, search: Option<&str>) -> Result<Vec<User>> {
    let session = ctx.require_session()?;
    if session.role != Role::Admin {
        print_warning("User management is an admin screen.");
    }
    let users = ctx.backend.list_users()?;
    let visible = filter_users(&users, search.unwrap_or(""));
    print_user_table(&visible);
    Ok(visible.into_iter().cloned().collect())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{demo_context, login_as};
    use super::*;

    #[test]
    fn test_users_search_matches_name_and_email() {
        let (ctx, _dir) = demo_context();
        login_as(&ctx, "admin@projectflow.com", "admin123");

        let all = users_command(&ctx, None).unwrap();
        assert_eq!(all.len(), 8);

        let by_email = users_command(&ctx, Some("david@")).unwrap();
        assert_eq!(by_email.len(), 1);
        assert_eq!(by_email[0].name, "David Brown");

        assert!(users_command(&ctx, Some("nobody")).unwrap().is_empty());
    }
}
