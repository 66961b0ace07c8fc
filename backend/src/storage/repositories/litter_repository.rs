use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, Transaction};

use crate::domain::models::litter::{BreedingEvent, Litter};
use crate::storage::connection::{decode_timestamp, encode_timestamp, DbConnection};
use crate::storage::errors::map_unique_violation;
use crate::storage::traits::LitterStorage;

#[derive(Clone)]
pub struct LitterRepository {
    db: DbConnection,
}

impl LitterRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn event_from_row(row: &SqliteRow) -> Result<BreedingEvent> {
        let mating: String = row.try_get("date_of_mating")?;
        let remating: String = row.try_get("date_of_remating")?;
        let kindle: String = row.try_get("date_of_kindle")?;
        let size: i64 = row.try_get("litter_size")?;

        Ok(BreedingEvent {
            id: row.try_get("id")?,
            buck_id: row.try_get("buck_id")?,
            date_of_mating: decode_timestamp(&mating)?,
            date_of_remating: decode_timestamp(&remating)?,
            date_of_kindle: decode_timestamp(&kindle)?,
            litter_size: u8::try_from(size)?,
        })
    }

    /// Insert an event after the current last one of the ledger
    async fn insert_event(
        tx: &mut Transaction<'_, Sqlite>,
        litter_id: &str,
        event: &BreedingEvent,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO litter_events (
                id, litter_id, seq, buck_id,
                date_of_mating, date_of_remating, date_of_kindle, litter_size
            )
            SELECT ?, ?, COALESCE(MAX(seq), 0) + 1, ?, ?, ?, ?, ?
            FROM litter_events WHERE litter_id = ?
            "#,
        )
        .bind(&event.id)
        .bind(litter_id)
        .bind(&event.buck_id)
        .bind(encode_timestamp(&event.date_of_mating))
        .bind(encode_timestamp(&event.date_of_remating))
        .bind(encode_timestamp(&event.date_of_kindle))
        .bind(i64::from(event.litter_size))
        .bind(litter_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl LitterStorage for LitterRepository {
    async fn get_by_doe(&self, doe_id: &str) -> Result<Option<Litter>> {
        let Some(row) = sqlx::query("SELECT id, doe_id, created_at FROM litters WHERE doe_id = ?")
            .bind(doe_id)
            .fetch_optional(self.db.pool())
            .await?
        else {
            return Ok(None);
        };

        let id: String = row.try_get("id")?;
        let created_at: String = row.try_get("created_at")?;

        let event_rows = sqlx::query(
            r#"
            SELECT id, buck_id, date_of_mating, date_of_remating, date_of_kindle, litter_size
            FROM litter_events
            WHERE litter_id = ?
            ORDER BY seq
            "#,
        )
        .bind(&id)
        .fetch_all(self.db.pool())
        .await?;
        let events = event_rows
            .iter()
            .map(Self::event_from_row)
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(Litter {
            id,
            doe_id: row.try_get("doe_id")?,
            events,
            created_at: decode_timestamp(&created_at)?,
        }))
    }

    async fn create_litter(&self, litter: &Litter) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;

        sqlx::query("INSERT INTO litters (id, doe_id, created_at) VALUES (?, ?, ?)")
            .bind(&litter.id)
            .bind(&litter.doe_id)
            .bind(encode_timestamp(&litter.created_at))
            .execute(&mut *tx)
            .await
            .map_err(|e| map_unique_violation(e, "A litter for this doe already exists"))?;

        for event in &litter.events {
            Self::insert_event(&mut tx, &litter.id, event).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn append_event(&self, litter_id: &str, event: &BreedingEvent) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;
        Self::insert_event(&mut tx, litter_id, event).await?;
        tx.commit().await?;
        Ok(())
    }
}
