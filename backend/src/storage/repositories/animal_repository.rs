use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::animal::{Animal, Sex, Tattoo};
use crate::storage::connection::{
    decode_optional_timestamp, decode_timestamp, encode_timestamp, DbConnection,
};
use crate::storage::errors::map_unique_violation;
use crate::storage::traits::AnimalStorage;

const SELECT_ANIMAL: &str = r#"
    SELECT id, user_id, name, sex, race, color,
           date_of_birth, date_of_death, date_of_slaughter,
           mother_id, father_id, tattoo_right, tattoo_left, created_at
    FROM animals
"#;

const TATTOO_TAKEN: &str = "An animal with that tattoo already exists";

#[derive(Clone)]
pub struct AnimalRepository {
    db: DbConnection,
}

impl AnimalRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn from_row(row: &SqliteRow) -> Result<Animal> {
        let sex: String = row.try_get("sex")?;
        let sex = Sex::from_token(&sex).ok_or_else(|| anyhow!("Invalid sex token in database: {}", sex))?;

        let right: Option<String> = row.try_get("tattoo_right")?;
        let left: Option<i64> = row.try_get("tattoo_left")?;
        let tattoo = match (right, left) {
            (Some(right), Some(left)) => Some(Tattoo {
                right,
                left: u32::try_from(left)?,
            }),
            _ => None,
        };

        let created_at: String = row.try_get("created_at")?;

        Ok(Animal {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            name: row.try_get("name")?,
            sex,
            race: row.try_get("race")?,
            color: row.try_get("color")?,
            date_of_birth: decode_optional_timestamp(row.try_get("date_of_birth")?)?,
            date_of_death: decode_optional_timestamp(row.try_get("date_of_death")?)?,
            date_of_slaughter: decode_optional_timestamp(row.try_get("date_of_slaughter")?)?,
            mother_id: row.try_get("mother_id")?,
            father_id: row.try_get("father_id")?,
            tattoo,
            created_at: decode_timestamp(&created_at)?,
        })
    }
}

#[async_trait]
impl AnimalStorage for AnimalRepository {
    async fn store_animal(&self, animal: &Animal) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO animals (
                id, user_id, name, sex, race, color,
                date_of_birth, date_of_death, date_of_slaughter,
                mother_id, father_id, tattoo_right, tattoo_left, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&animal.id)
        .bind(&animal.user_id)
        .bind(&animal.name)
        .bind(animal.sex.token())
        .bind(&animal.race)
        .bind(&animal.color)
        .bind(animal.date_of_birth.as_ref().map(encode_timestamp))
        .bind(animal.date_of_death.as_ref().map(encode_timestamp))
        .bind(animal.date_of_slaughter.as_ref().map(encode_timestamp))
        .bind(&animal.mother_id)
        .bind(&animal.father_id)
        .bind(animal.tattoo.as_ref().map(|t| t.right.clone()))
        .bind(animal.tattoo.as_ref().map(|t| i64::from(t.left)))
        .bind(encode_timestamp(&animal.created_at))
        .execute(self.db.pool())
        .await
        .map_err(|e| map_unique_violation(e, TATTOO_TAKEN))?;
        Ok(())
    }

    async fn update_animal(&self, animal: &Animal) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE animals SET
                name = ?, sex = ?, race = ?, color = ?,
                date_of_birth = ?, date_of_death = ?, date_of_slaughter = ?,
                mother_id = ?, father_id = ?, tattoo_right = ?, tattoo_left = ?
            WHERE id = ?
            "#,
        )
        .bind(&animal.name)
        .bind(animal.sex.token())
        .bind(&animal.race)
        .bind(&animal.color)
        .bind(animal.date_of_birth.as_ref().map(encode_timestamp))
        .bind(animal.date_of_death.as_ref().map(encode_timestamp))
        .bind(animal.date_of_slaughter.as_ref().map(encode_timestamp))
        .bind(&animal.mother_id)
        .bind(&animal.father_id)
        .bind(animal.tattoo.as_ref().map(|t| t.right.clone()))
        .bind(animal.tattoo.as_ref().map(|t| i64::from(t.left)))
        .bind(&animal.id)
        .execute(self.db.pool())
        .await
        .map_err(|e| map_unique_violation(e, TATTOO_TAKEN))?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_animal(&self, animal_id: &str) -> Result<Option<Animal>> {
        let sql = format!("{} WHERE id = ?", SELECT_ANIMAL);
        let row = sqlx::query(&sql)
            .bind(animal_id)
            .fetch_optional(self.db.pool())
            .await?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn find_by_tattoo(&self, tattoo: &Tattoo) -> Result<Option<Animal>> {
        let sql = format!("{} WHERE tattoo_right = ? AND tattoo_left = ?", SELECT_ANIMAL);
        let row = sqlx::query(&sql)
            .bind(&tattoo.right)
            .bind(i64::from(tattoo.left))
            .fetch_optional(self.db.pool())
            .await?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Animal>> {
        let sql = format!("{} WHERE user_id = ? ORDER BY name, created_at", SELECT_ANIMAL);
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .fetch_all(self.db.pool())
            .await?;
        rows.iter().map(Self::from_row).collect()
    }

    async fn list_animals(&self) -> Result<Vec<Animal>> {
        let sql = format!("{} ORDER BY created_at, id", SELECT_ANIMAL);
        let rows = sqlx::query(&sql).fetch_all(self.db.pool()).await?;
        rows.iter().map(Self::from_row).collect()
    }

    async fn delete_animal(&self, animal_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM animals WHERE id = ?")
            .bind(animal_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::UniqueViolation;
    use chrono::{TimeZone, Utc};

    fn animal(name: &str, tattoo: Option<(&str, u32)>) -> Animal {
        Animal {
            id: Animal::generate_id(),
            user_id: "user-1".to_string(),
            name: name.to_string(),
            sex: Sex::Female,
            race: Some("Rex".to_string()),
            color: None,
            date_of_birth: Some(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()),
            date_of_death: None,
            date_of_slaughter: None,
            mother_id: Some("unknown-mother".to_string()),
            father_id: None,
            tattoo: tattoo.map(|(right, left)| Tattoo {
                right: right.to_string(),
                left,
            }),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_store_and_get_round_trip() {
        let db = DbConnection::init_test().await.expect("Failed to init test DB");
        let repo = AnimalRepository::new(db);
        let daisy = animal("Daisy", Some(("AB12", 345)));
        repo.store_animal(&daisy).await.unwrap();

        assert_eq!(repo.get_animal(&daisy.id).await.unwrap(), Some(daisy.clone()));
        let by_tattoo = repo
            .find_by_tattoo(&Tattoo {
                right: "AB12".to_string(),
                left: 345,
            })
            .await
            .unwrap();
        assert_eq!(by_tattoo, Some(daisy));
    }

    #[tokio::test]
    async fn test_unique_index_covers_complete_pairs_only() {
        let db = DbConnection::init_test().await.expect("Failed to init test DB");
        let repo = AnimalRepository::new(db);
        repo.store_animal(&animal("Daisy", Some(("AB12", 345)))).await.unwrap();
        repo.store_animal(&animal("Dolly", None)).await.unwrap();
        repo.store_animal(&animal("Molly", None)).await.unwrap();

        let err = repo
            .store_animal(&animal("Copy", Some(("AB12", 345))))
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<UniqueViolation>().is_some());
        assert_eq!(repo.list_animals().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = DbConnection::init_test().await.expect("Failed to init test DB");
        let repo = AnimalRepository::new(db);
        let mut daisy = animal("Daisy", None);
        repo.store_animal(&daisy).await.unwrap();

        daisy.color = Some("Castor".to_string());
        daisy.tattoo = Some(Tattoo {
            right: "AJ1".to_string(),
            left: 7,
        });
        assert!(repo.update_animal(&daisy).await.unwrap());
        assert_eq!(repo.get_animal(&daisy.id).await.unwrap(), Some(daisy.clone()));

        assert!(repo.delete_animal(&daisy.id).await.unwrap());
        assert!(repo.get_animal(&daisy.id).await.unwrap().is_none());
        assert!(!repo.update_animal(&daisy).await.unwrap());
    }
}
