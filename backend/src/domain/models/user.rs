use chrono::{DateTime, Utc};

/// A registered account. `password_hash` is an argon2 PHC string.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}
