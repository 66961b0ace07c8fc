use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteConnectOptions;
#[cfg(test)]
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;
#[cfg(test)]
use std::time::Duration;

use super::repositories::{
    AnimalRepository, LitterRepository, ProfileRepository, UserRepository, WeightRepository,
};
use super::traits::Connection;

// The database URL used when no other one is configured
pub const DATABASE_URL: &str = "sqlite:studbook.db";

/// DbConnection manages the SQLite pool and the schema
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection
    pub async fn new(url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?
        }

        let options = SqliteConnectOptions::from_str(url)?.foreign_keys(true);
        let pool = SqlitePool::connect_with(options).await?;

        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize the standard database
    pub async fn init() -> Result<Self> {
        Self::new(DATABASE_URL).await
    }

    /// Initialize an isolated in-memory database for a single test
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        // A single connection that never expires keeps the in-memory
        // database alive for the lifetime of the pool.
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await?;

        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS profiles (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL UNIQUE,
                handle TEXT NOT NULL UNIQUE,
                gender TEXT,
                country TEXT,
                club TEXT,
                street TEXT,
                city TEXT,
                state TEXT,
                zip INTEGER,
                telephone TEXT,
                website TEXT,
                facebook TEXT,
                youtube TEXT,
                twitter TEXT,
                instagram TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        // No foreign keys on animals: deleting a user or a
        // parent leaves dangling ids behind.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS animals (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                name TEXT NOT NULL,
                sex TEXT NOT NULL CHECK (sex IN ('0,1', '1,0')),
                race TEXT,
                color TEXT,
                date_of_birth TEXT,
                date_of_death TEXT,
                date_of_slaughter TEXT,
                mother_id TEXT,
                father_id TEXT,
                tattoo_right TEXT,
                tattoo_left INTEGER,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_animals_user_id
            ON animals(user_id);
            "#,
        )
        .execute(pool)
        .await?;

        // Either half of a tattoo may be missing, so uniqueness only applies
        // to complete pairs.
        sqlx::query(
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_animals_tattoo
            ON animals(tattoo_right, tattoo_left)
            WHERE tattoo_right IS NOT NULL AND tattoo_left IS NOT NULL;
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS litters (
                id TEXT PRIMARY KEY,
                doe_id TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS litter_events (
                id TEXT PRIMARY KEY,
                litter_id TEXT NOT NULL,
                seq INTEGER NOT NULL,
                buck_id TEXT NOT NULL,
                date_of_mating TEXT NOT NULL,
                date_of_remating TEXT NOT NULL,
                date_of_kindle TEXT NOT NULL,
                litter_size INTEGER NOT NULL CHECK (litter_size >= 0 AND litter_size <= 20),
                UNIQUE (litter_id, seq),
                FOREIGN KEY (litter_id) REFERENCES litters (id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS weights (
                id TEXT PRIMARY KEY,
                animal_id TEXT NOT NULL,
                month TEXT NOT NULL,
                days TEXT NOT NULL,
                version INTEGER NOT NULL DEFAULT 0,
                UNIQUE (animal_id, month)
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

impl Connection for DbConnection {
    type UserRepository = UserRepository;
    type ProfileRepository = ProfileRepository;
    type AnimalRepository = AnimalRepository;
    type LitterRepository = LitterRepository;
    type WeightRepository = WeightRepository;

    fn create_user_repository(&self) -> Self::UserRepository {
        UserRepository::new(self.clone())
    }

    fn create_profile_repository(&self) -> Self::ProfileRepository {
        ProfileRepository::new(self.clone())
    }

    fn create_animal_repository(&self) -> Self::AnimalRepository {
        AnimalRepository::new(self.clone())
    }

    fn create_litter_repository(&self) -> Self::LitterRepository {
        LitterRepository::new(self.clone())
    }

    fn create_weight_repository(&self) -> Self::WeightRepository {
        WeightRepository::new(self.clone())
    }
}

/// Timestamps are stored as RFC 3339 text
pub(crate) fn encode_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339()
}

pub(crate) fn decode_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("Invalid timestamp in database: {}", value))?;
    Ok(parsed.with_timezone(&Utc))
}

pub(crate) fn decode_optional_timestamp(value: Option<String>) -> Result<Option<DateTime<Utc>>> {
    value.as_deref().map(decode_timestamp).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    #[tokio::test]
    async fn test_schema_is_created() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");

        let rows = sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .fetch_all(db.pool())
            .await
            .expect("Failed to list tables");
        let tables: Vec<String> = rows.iter().map(|r| r.get("name")).collect();

        for expected in ["animals", "litter_events", "litters", "profiles", "users", "weights"] {
            assert!(tables.contains(&expected.to_string()), "missing table {}", expected);
        }
    }

    #[tokio::test]
    async fn test_schema_setup_is_idempotent() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        DbConnection::setup_schema(db.pool())
            .await
            .expect("Running the schema twice should succeed");
    }

    #[test]
    fn test_timestamp_round_trip() {
        let now = Utc::now();
        let decoded = decode_timestamp(&encode_timestamp(&now)).unwrap();
        assert_eq!(decoded, now);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_timestamp("not a date").is_err());
        assert!(decode_optional_timestamp(None).unwrap().is_none());
    }
}
