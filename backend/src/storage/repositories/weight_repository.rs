use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::weight::{WeightBucket, WeightEntry};
use crate::storage::connection::DbConnection;
use crate::storage::errors::map_unique_violation;
use crate::storage::traits::WeightStorage;

/// Buckets are keyed by `YYYY-MM` text, which sorts chronologically
fn month_key(month: &DateTime<Utc>) -> String {
    month.format("%Y-%m").to_string()
}

fn parse_month_key(key: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(&format!("{}-01", key), "%Y-%m-%d")
        .with_context(|| format!("Invalid month in database: {}", key))?;
    Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::default())))
}

#[derive(Clone)]
pub struct WeightRepository {
    db: DbConnection,
}

impl WeightRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn from_row(row: &SqliteRow) -> Result<WeightBucket> {
        let month: String = row.try_get("month")?;
        let days: String = row.try_get("days")?;
        let days: Vec<WeightEntry> =
            serde_json::from_str(&days).context("Invalid weight days in database")?;

        Ok(WeightBucket {
            id: row.try_get("id")?,
            animal_id: row.try_get("animal_id")?,
            month: parse_month_key(&month)?,
            days,
            version: row.try_get("version")?,
        })
    }
}

#[async_trait]
impl WeightStorage for WeightRepository {
    async fn find_bucket(&self, animal_id: &str, month: &DateTime<Utc>) -> Result<Option<WeightBucket>> {
        let row = sqlx::query(
            "SELECT id, animal_id, month, days, version FROM weights WHERE animal_id = ? AND month = ?",
        )
        .bind(animal_id)
        .bind(month_key(month))
        .fetch_optional(self.db.pool())
        .await?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn store_bucket(&self, bucket: &WeightBucket) -> Result<()> {
        sqlx::query(
            "INSERT INTO weights (id, animal_id, month, days, version) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&bucket.id)
        .bind(&bucket.animal_id)
        .bind(month_key(&bucket.month))
        .bind(serde_json::to_string(&bucket.days)?)
        .bind(bucket.version)
        .execute(self.db.pool())
        .await
        .map_err(|e| map_unique_violation(e, "A weight record for this month already exists"))?;
        Ok(())
    }

    async fn update_bucket(&self, bucket: &WeightBucket) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE weights SET days = ?, version = version + 1 WHERE id = ? AND version = ?",
        )
        .bind(serde_json::to_string(&bucket.days)?)
        .bind(&bucket.id)
        .bind(bucket.version)
        .execute(self.db.pool())
        .await?;

        match result.rows_affected() {
            0 => Ok(false),
            1 => Ok(true),
            n => Err(anyhow!("Weight bucket {} matched {} rows", bucket.id, n)),
        }
    }

    async fn list_buckets(
        &self,
        animal_id: &str,
        from_month: &DateTime<Utc>,
        to_month: &DateTime<Utc>,
    ) -> Result<Vec<WeightBucket>> {
        let rows = sqlx::query(
            r#"
            SELECT id, animal_id, month, days, version
            FROM weights
            WHERE animal_id = ? AND month BETWEEN ? AND ?
            ORDER BY month
            "#,
        )
        .bind(animal_id)
        .bind(month_key(from_month))
        .bind(month_key(to_month))
        .fetch_all(self.db.pool())
        .await?;
        rows.iter().map(Self::from_row).collect()
    }
}
