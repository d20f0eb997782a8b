#[derive(Debug, Clone)]
pub struct User {
    pub id: Option<i64>,
    pub email: String,
    pub name: String,
    /// Opaque value owned by whatever authenticates the user.
    pub credential_hash: Option<String>,
    pub created_at: String,
}

impl User {
    pub fn new(email: String, name: String) -> Self {
        Self {
            id: None,
            email,
            name,
            credential_hash: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
