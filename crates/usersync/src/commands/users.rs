//! User command handlers.

use chrono::NaiveDateTime;
use tabled::Tabled;
use usersync_core::{NewUser, User, UserPatch, UserStore};

use crate::cli::{GlobalOpts, OutputFormat, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Age")]
    age: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: id_of(u),
            name: u.name.clone(),
            email: u.email.clone(),
            age: u.age.map(|a| a.to_string()).unwrap_or_default(),
            updated: u.updated_at.or(u.created_at).map(timestamp).unwrap_or_default(),
        }
    }
}

fn id_of(u: &User) -> String {
    u.id.map_or_else(|| "-".into(), |id| id.to_string())
}

fn timestamp(t: NaiveDateTime) -> String {
    t.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn detail(u: &User) -> String {
    let dash = || "-".to_owned();
    [
        format!("ID:      {}", id_of(u)),
        format!("Name:    {}", u.name),
        format!("Email:   {}", u.email),
        format!("Age:     {}", u.age.map_or_else(dash, |a| a.to_string())),
        format!("Created: {}", u.created_at.map_or_else(dash, timestamp)),
        format!("Updated: {}", u.updated_at.map_or_else(dash, timestamp)),
    ]
    .join("\n")
}

fn print_user(user: &User, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(global.output, user, detail, id_of)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn print_users(users: &[User], global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_list(global.output, users, |u| UserRow::from(u), id_of)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(store: &UserStore, args: UsersArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        UsersCommand::Get { id } => {
            store.fetch_user(id).await;
            util::check_store(store)?;
            show_current(store, global, &id.to_string())
        }

        UsersCommand::Find { email } => {
            store.find_user_by_email(&email).await;
            util::check_store(store)?;
            show_current(store, global, &email)
        }

        UsersCommand::List { page, size } => {
            store.fetch_users(page, size).await;
            util::check_store(store)?;
            let users = store.users();
            print_users(&users, global)?;
            output::print_status(
                &format!("{} of {} users", users.len(), store.total()),
                global.quiet || global.output != OutputFormat::Table,
            );
            Ok(())
        }

        UsersCommand::All => {
            store.fetch_all_users().await;
            util::check_store(store)?;
            print_users(&store.users(), global)
        }

        UsersCommand::Create { name, email, age } => {
            let created = store.create_user(&NewUser { name, email, age }).await?;
            print_user(&created, global)?;
            output::print_status("User created", global.quiet);
            Ok(())
        }

        UsersCommand::Update {
            id,
            name,
            email,
            age,
        } => {
            let patch = UserPatch { name, email, age };
            if patch.is_empty() {
                return Err(CliError::Validation {
                    field: "update".into(),
                    reason: "pass at least one of --name, --email, --age".into(),
                });
            }
            let updated = store.update_user(id, &patch).await?;
            print_user(&updated, global)?;
            output::print_status("User updated", global.quiet);
            Ok(())
        }

        UsersCommand::Delete { id } => {
            if !util::confirm(&format!("Delete user {id}?"), "users delete", global.yes)? {
                return Ok(());
            }
            store.delete_user(id).await?;
            output::print_status(&format!("User {id} deleted"), global.quiet);
            Ok(())
        }
    }
}

/// Print the store's current user after a successful single-user read.
fn show_current(store: &UserStore, global: &GlobalOpts, identifier: &str) -> Result<(), CliError> {
    let user = store.current_user().ok_or_else(|| CliError::NotFound {
        message: format!("user '{identifier}' not found"),
    })?;
    print_user(&user, global)
}
