use super::{validate, Session};
use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{Category, EntryKind, DEFAULT_COLOR};

/// Editable category fields. Kind is fixed at creation.
#[derive(Debug, Clone, Default)]
pub(crate) struct CategoryPatch {
    pub(crate) name: Option<String>,
    pub(crate) color: Option<String>,
}

/// Shared defaults followed by the caller's own categories.
pub(crate) fn list_categories(
    db: &Database,
    session: &Session,
    kind: Option<EntryKind>,
) -> Result<Vec<Category>> {
    db.get_categories(session.user_id(), kind)
}

pub(crate) fn create_category(
    db: &Database,
    session: &Session,
    name: &str,
    kind: EntryKind,
    color: Option<&str>,
) -> Result<Category> {
    let name = validate::category_name(name)?;
    let color = validate::color(color.unwrap_or(DEFAULT_COLOR))?;

    if db
        .find_owned_category_by_name(session.user_id(), &name, kind, None)?
        .is_some()
    {
        return Err(Error::Conflict(format!(
            "a {kind} category named '{name}' already exists"
        )));
    }

    let mut cat = Category::new(name, kind, session.user_id());
    cat.color = color;
    cat.id = Some(db.insert_category(&cat)?);
    tracing::info!(user_id = session.user_id(), category_id = ?cat.id, "created category");
    Ok(cat)
}

/// Rename or recolor one of the caller's categories. Defaults are never
/// found here.
pub(crate) fn update_category(
    db: &Database,
    session: &Session,
    id: i64,
    patch: CategoryPatch,
) -> Result<Category> {
    let name = patch.name.as_deref().map(validate::category_name).transpose()?;
    let color = patch.color.as_deref().map(validate::color).transpose()?;

    let mut cat = db
        .get_owned_category(session.user_id(), id)?
        .ok_or(Error::NotFound("category"))?;

    if let Some(name) = name {
        if name != cat.name
            && db
                .find_owned_category_by_name(session.user_id(), &name, cat.kind, Some(id))?
                .is_some()
        {
            return Err(Error::Conflict(format!(
                "a {} category named '{name}' already exists",
                cat.kind
            )));
        }
        cat.name = name;
    }
    if let Some(color) = color {
        cat.color = color;
    }

    db.update_category(&cat)?;
    tracing::info!(user_id = session.user_id(), category_id = id, "updated category");
    Ok(cat)
}

/// Fails with `Conflict` while any transaction or recurring definition
/// still points at the category.
pub(crate) fn delete_category(db: &Database, session: &Session, id: i64) -> Result<()> {
    db.get_owned_category(session.user_id(), id)?
        .ok_or(Error::NotFound("category"))?;

    let references = db.count_category_references(id)?;
    if references > 0 {
        return Err(Error::Conflict(format!(
            "category is used by {references} transaction(s) or recurring definition(s)"
        )));
    }

    db.delete_category(session.user_id(), id)?;
    tracing::info!(user_id = session.user_id(), category_id = id, "deleted category");
    Ok(())
}

/// The category if the caller may reference it, otherwise
/// `InvalidReference`.
pub(super) fn visible_category(db: &Database, session: &Session, id: i64) -> Result<Category> {
    db.get_visible_category(session.user_id(), id)?
        .ok_or(Error::InvalidReference(id))
}

/// Entries must carry the same kind as their category.
pub(super) fn check_kind(category: &Category, kind: EntryKind) -> Result<()> {
    if category.kind != kind {
        return Err(Error::validation(
            "type",
            format!("{kind} does not match {} category '{}'", category.kind, category.name),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "categories_tests.rs"]
mod tests;
