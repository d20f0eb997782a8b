use super::{validate, Session};
use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::User;

/// Fields a user may change on their own profile.
#[derive(Debug, Clone, Default)]
pub(crate) struct ProfilePatch {
    pub(crate) name: Option<String>,
    pub(crate) email: Option<String>,
}

pub(crate) fn register_user(db: &Database, email: &str, name: &str) -> Result<User> {
    let email = validate::email(email)?;
    let name = validate::display_name(name)?;
    if db.get_user_by_email(&email)?.is_some() {
        return Err(Error::Conflict(format!("a user with email {email} already exists")));
    }

    let mut user = User::new(email, name);
    user.id = Some(db.insert_user(&user)?);
    tracing::info!(user_id = ?user.id, "registered user");
    Ok(user)
}

pub(crate) fn profile(db: &Database, session: &Session) -> Result<User> {
    db.get_user(session.user_id())?.ok_or(Error::NotFound("user"))
}

pub(crate) fn update_profile(db: &Database, session: &Session, patch: ProfilePatch) -> Result<User> {
    let name = patch.name.as_deref().map(validate::display_name).transpose()?;
    let email = patch.email.as_deref().map(validate::email).transpose()?;

    let mut user = profile(db, session)?;
    if let Some(email) = email {
        if let Some(existing) = db.get_user_by_email(&email)? {
            if existing.id != user.id {
                return Err(Error::Conflict(format!("a user with email {email} already exists")));
            }
        }
        user.email = email;
    }
    if let Some(name) = name {
        user.name = name;
    }

    db.update_user(&user)?;
    tracing::info!(user_id = session.user_id(), "updated profile");
    Ok(user)
}

/// Newest accounts first.
pub(crate) fn list_users(db: &Database, _session: &Session) -> Result<Vec<User>> {
    db.get_users()
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
