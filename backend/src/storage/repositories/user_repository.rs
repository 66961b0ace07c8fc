use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::user::User;
use crate::storage::connection::{decode_timestamp, encode_timestamp, DbConnection};
use crate::storage::errors::map_unique_violation;
use crate::storage::traits::UserStorage;

#[derive(Clone)]
pub struct UserRepository {
    db: DbConnection,
}

impl UserRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn from_row(row: &SqliteRow) -> Result<User> {
        let created_at: String = row.try_get("created_at")?;
        Ok(User {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            created_at: decode_timestamp(&created_at)?,
        })
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<User>> {
        let sql = format!(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE {} = ?",
            column
        );
        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(self.db.pool())
            .await?;
        row.as_ref().map(Self::from_row).transpose()
    }
}

#[async_trait]
impl UserStorage for UserRepository {
    async fn store_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(encode_timestamp(&user.created_at))
        .execute(self.db.pool())
        .await
        .map_err(|e| map_unique_violation(e, "User already exists"))?;
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        self.find_one("id", user_id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.find_one("email", email).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<User>> {
        self.find_one("name", name).await
    }

    async fn delete_user(&self, user_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
