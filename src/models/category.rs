use super::EntryKind;

pub const DEFAULT_COLOR: &str = "#3B82F6";

#[derive(Debug, Clone)]
pub struct Category {
    pub id: Option<i64>,
    pub name: String,
    pub kind: EntryKind,
    /// Display hint, `#RRGGBB`.
    pub color: String,
    pub is_default: bool,
    /// `None` for the shared default categories.
    pub user_id: Option<i64>,
}

impl Category {
    pub fn new(name: String, kind: EntryKind, user_id: i64) -> Self {
        Self {
            id: None,
            name,
            kind,
            color: DEFAULT_COLOR.to_string(),
            is_default: false,
            user_id: Some(user_id),
        }
    }

    pub fn new_default(name: &str, kind: EntryKind, color: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            kind,
            color: color.to_string(),
            is_default: true,
            user_id: None,
        }
    }

    /// Find a category by name (case-insensitive) and kind in a slice.
    pub fn find_by_name<'a>(
        categories: &'a [Category],
        name: &str,
        kind: EntryKind,
    ) -> Option<&'a Category> {
        let lower = name.to_lowercase();
        categories
            .iter()
            .find(|c| c.kind == kind && c.name.to_lowercase() == lower)
    }

    /// Find a category by ID in a slice.
    pub fn find_by_id(categories: &[Category], id: i64) -> Option<&Category> {
        categories.iter().find(|c| c.id == Some(id))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.name)
    }
}
