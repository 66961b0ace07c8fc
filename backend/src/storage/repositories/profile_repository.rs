use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::profile::{Address, Gender, Profile, ProfileWithOwner, Social};
use crate::storage::connection::{decode_timestamp, encode_timestamp, DbConnection};
use crate::domain::profile_service::{HANDLE_EXISTS, PROFILE_EXISTS};
use crate::storage::errors::map_unique_violation_on;
use crate::storage::traits::ProfileStorage;

const SELECT_PROFILE: &str = r#"
    SELECT p.id, p.user_id, p.handle, p.gender, p.country, p.club,
           p.street, p.city, p.state, p.zip,
           p.telephone, p.website, p.facebook, p.youtube, p.twitter, p.instagram,
           p.created_at, p.updated_at, u.name AS user_name
    FROM profiles p
    LEFT JOIN users u ON u.id = p.user_id
"#;

const UNIQUE_KEYS: &[(&str, &str)] = &[
    ("profiles.handle", HANDLE_EXISTS),
    ("profiles.user_id", PROFILE_EXISTS),
];

#[derive(Clone)]
pub struct ProfileRepository {
    db: DbConnection,
}

impl ProfileRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn from_row(row: &SqliteRow) -> Result<ProfileWithOwner> {
        let gender = row
            .try_get::<Option<String>, _>("gender")?
            .map(|g| g.parse::<Gender>().map_err(|e| anyhow!(e)))
            .transpose()?;
        let zip = row
            .try_get::<Option<i64>, _>("zip")?
            .map(u32::try_from)
            .transpose()?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        let profile = Profile {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            handle: row.try_get("handle")?,
            gender,
            country: row.try_get("country")?,
            club: row.try_get("club")?,
            address: Address {
                street: row.try_get("street")?,
                city: row.try_get("city")?,
                state: row.try_get("state")?,
                zip,
            },
            social: Social {
                telephone: row.try_get("telephone")?,
                website: row.try_get("website")?,
                facebook: row.try_get("facebook")?,
                youtube: row.try_get("youtube")?,
                twitter: row.try_get("twitter")?,
                instagram: row.try_get("instagram")?,
            },
            created_at: decode_timestamp(&created_at)?,
            updated_at: decode_timestamp(&updated_at)?,
        };

        Ok(ProfileWithOwner {
            profile,
            user_name: row.try_get("user_name")?,
        })
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<ProfileWithOwner>> {
        let sql = format!("{} WHERE p.{} = ?", SELECT_PROFILE, column);
        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(self.db.pool())
            .await?;
        row.as_ref().map(Self::from_row).transpose()
    }
}

#[async_trait]
impl ProfileStorage for ProfileRepository {
    async fn store_profile(&self, profile: &Profile) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO profiles (
                id, user_id, handle, gender, country, club,
                street, city, state, zip,
                telephone, website, facebook, youtube, twitter, instagram,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&profile.id)
        .bind(&profile.user_id)
        .bind(&profile.handle)
        .bind(profile.gender.map(|g| g.as_str()))
        .bind(&profile.country)
        .bind(&profile.club)
        .bind(&profile.address.street)
        .bind(&profile.address.city)
        .bind(&profile.address.state)
        .bind(profile.address.zip.map(i64::from))
        .bind(&profile.social.telephone)
        .bind(&profile.social.website)
        .bind(&profile.social.facebook)
        .bind(&profile.social.youtube)
        .bind(&profile.social.twitter)
        .bind(&profile.social.instagram)
        .bind(encode_timestamp(&profile.created_at))
        .bind(encode_timestamp(&profile.updated_at))
        .execute(self.db.pool())
        .await
        .map_err(|e| map_unique_violation_on(e, UNIQUE_KEYS))?;
        Ok(())
    }

    async fn update_profile(&self, profile: &Profile) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE profiles SET
                handle = ?, gender = ?, country = ?, club = ?,
                street = ?, city = ?, state = ?, zip = ?,
                telephone = ?, website = ?, facebook = ?, youtube = ?, twitter = ?, instagram = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&profile.handle)
        .bind(profile.gender.map(|g| g.as_str()))
        .bind(&profile.country)
        .bind(&profile.club)
        .bind(&profile.address.street)
        .bind(&profile.address.city)
        .bind(&profile.address.state)
        .bind(profile.address.zip.map(i64::from))
        .bind(&profile.social.telephone)
        .bind(&profile.social.website)
        .bind(&profile.social.facebook)
        .bind(&profile.social.youtube)
        .bind(&profile.social.twitter)
        .bind(&profile.social.instagram)
        .bind(encode_timestamp(&profile.updated_at))
        .bind(&profile.id)
        .execute(self.db.pool())
        .await
        .map_err(|e| map_unique_violation_on(e, UNIQUE_KEYS))?;

        if result.rows_affected() == 0 {
            return Err(anyhow!("Profile not found: {}", profile.id));
        }
        Ok(())
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Option<ProfileWithOwner>> {
        self.find_one("user_id", user_id).await
    }

    async fn find_by_handle(&self, handle: &str) -> Result<Option<ProfileWithOwner>> {
        self.find_one("handle", handle).await
    }

    async fn list_profiles(&self) -> Result<Vec<ProfileWithOwner>> {
        let sql = format!("{} ORDER BY p.created_at", SELECT_PROFILE);
        let rows = sqlx::query(&sql).fetch_all(self.db.pool()).await?;
        rows.iter().map(Self::from_row).collect()
    }

    async fn delete_by_user(&self, user_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM profiles WHERE user_id = ?")
            .bind(user_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::user::User;
    use crate::storage::repositories::UserRepository;
    use crate::storage::traits::UserStorage;
    use crate::storage::UniqueViolation;
    use chrono::Utc;

    async fn setup() -> (ProfileRepository, String) {
        let db = DbConnection::init_test().await.expect("Failed to init test DB");
        let user = User {
            id: User::generate_id(),
            name: "rexbreeder".to_string(),
            email: "rex@example.com".to_string(),
            password_hash: "$argon2id$fake".to_string(),
            created_at: Utc::now(),
        };
        UserRepository::new(db.clone()).store_user(&user).await.unwrap();
        (ProfileRepository::new(db), user.id)
    }

    fn profile(user_id: &str, handle: &str) -> Profile {
        let now = Utc::now();
        Profile {
            id: Profile::generate_id(),
            user_id: user_id.to_string(),
            handle: handle.to_string(),
            gender: Some(Gender::Female),
            country: Some("Germany".to_string()),
            club: None,
            address: Address {
                zip: Some(30159),
                ..Default::default()
            },
            social: Social {
                instagram: Some("https://instagram.com/rex".to_string()),
                ..Default::default()
            },
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_store_and_find_with_owner_name() {
        let (repo, user_id) = setup().await;
        let stored = profile(&user_id, "rex");
        repo.store_profile(&stored).await.unwrap();

        let found = repo.find_by_handle("rex").await.unwrap().unwrap();
        assert_eq!(found.profile, stored);
        assert_eq!(found.user_name.as_deref(), Some("rexbreeder"));
        assert_eq!(repo.find_by_user(&user_id).await.unwrap().unwrap().profile, stored);
        assert_eq!(repo.list_profiles().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_second_profile_for_user_is_unique_violation() {
        let (repo, user_id) = setup().await;
        repo.store_profile(&profile(&user_id, "rex")).await.unwrap();

        let err = repo.store_profile(&profile(&user_id, "rex2")).await.unwrap_err();
        let violation = err.downcast_ref::<UniqueViolation>().unwrap();
        assert_eq!(violation.message, PROFILE_EXISTS);
    }

    #[tokio::test]
    async fn test_taken_handle_is_reported_as_handle() {
        let (repo, user_id) = setup().await;
        let other = User {
            id: User::generate_id(),
            name: "lopbreeder".to_string(),
            email: "lop@example.com".to_string(),
            password_hash: "$argon2id$fake".to_string(),
            created_at: Utc::now(),
        };
        UserRepository::new(repo.db.clone()).store_user(&other).await.unwrap();
        repo.store_profile(&profile(&user_id, "rex")).await.unwrap();

        let err = repo.store_profile(&profile(&other.id, "rex")).await.unwrap_err();
        let violation = err.downcast_ref::<UniqueViolation>().unwrap();
        assert_eq!(violation.message, HANDLE_EXISTS);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (repo, user_id) = setup().await;
        let mut stored = profile(&user_id, "rex");
        repo.store_profile(&stored).await.unwrap();

        stored.club = Some("Rex Club Nord".to_string());
        stored.gender = None;
        repo.update_profile(&stored).await.unwrap();
        let found = repo.find_by_user(&user_id).await.unwrap().unwrap();
        assert_eq!(found.profile.club.as_deref(), Some("Rex Club Nord"));
        assert_eq!(found.profile.gender, None);

        assert!(repo.delete_by_user(&user_id).await.unwrap());
        assert!(repo.find_by_user(&user_id).await.unwrap().is_none());
    }
}
