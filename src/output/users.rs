//! The user directory.

use crate::model::{Role, User};

use super::colors::*;

fn role_color(role: Role) -> &'static str {
    match role {
        Role::Admin => RED,
        Role::Manager => BLUE,
        Role::Developer => GREEN,
    }
}

/// Print users as an aligned table.
pub fn print_user_table(users: &[&User]) {
    if users.is_empty() {
        println!("{GRAY}No users found.{RESET}");
        return;
    }

    let name_width = users.iter().map(|u| u.name.chars().count()).max().unwrap_or(0).max(4);
    let email_width = users.iter().map(|u| u.email.chars().count()).max().unwrap_or(0).max(5);

    println!(
        "{BOLD}{:<name_width$}  {:<email_width$}  Role{RESET}",
        "Name", "Email"
    );
    for user in users {
        println!(
            "{:<name_width$}  {:<email_width$}  {}{}{RESET}",
            user.name,
            user.email,
            role_color(user.role),
            user.role.label()
        );
    }
    println!();
    println!(
        "{GRAY}({} user{}){RESET}",
        users.len(),
        if users.len() == 1 { "" } else { "s" }
    );
}
