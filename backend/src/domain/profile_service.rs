use chrono::Utc;
use tracing::info;

use crate::domain::commands::profile::ProfileInput;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::profile::{Profile, ProfileWithOwner};
use crate::domain::validation::{validate_profile, ValidationMode};
use crate::storage::traits::{Connection, ProfileStorage};

pub const PROFILE_EXISTS: &str = "A profile for this user already exists";
pub const HANDLE_EXISTS: &str = "That handle already exists";

/// Service for the public profile of each user
#[derive(Clone)]
pub struct ProfileService<C: Connection> {
    profile_repository: C::ProfileRepository,
}

impl<C: Connection> ProfileService<C> {
    pub fn new(connection: &C) -> Self {
        Self {
            profile_repository: connection.create_profile_repository(),
        }
    }

    /// Create the requester's profile
    pub async fn create_profile(&self, input: ProfileInput, user_id: &str) -> DomainResult<Profile> {
        let patch = validate_profile(input, ValidationMode::Create)?;
        info!("Creating profile for user: {}", user_id);

        if self.profile_repository.find_by_user(user_id).await?.is_some() {
            return Err(DomainError::conflict(PROFILE_EXISTS));
        }
        if let Some(handle) = &patch.handle {
            if self.profile_repository.find_by_handle(handle).await?.is_some() {
                return Err(DomainError::conflict(HANDLE_EXISTS));
            }
        }

        let now = Utc::now();
        let mut profile = Profile {
            id: Profile::generate_id(),
            user_id: user_id.to_string(),
            handle: String::new(),
            gender: None,
            country: None,
            club: None,
            address: Default::default(),
            social: Default::default(),
            created_at: now,
            updated_at: now,
        };
        patch.apply_to(&mut profile);

        self.profile_repository.store_profile(&profile).await?;
        info!("Created profile {} with handle {}", profile.id, profile.handle);
        Ok(profile)
    }

    /// Apply a partial update to the requester's profile
    pub async fn update_profile(&self, input: ProfileInput, user_id: &str) -> DomainResult<Profile> {
        let patch = validate_profile(input, ValidationMode::Update)?;
        info!("Updating profile for user: {}", user_id);

        let mut profile = self
            .profile_repository
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("There is no profile for this user"))?
            .profile;

        if let Some(handle) = &patch.handle {
            if *handle != profile.handle {
                if let Some(other) = self.profile_repository.find_by_handle(handle).await? {
                    if other.profile.user_id != user_id {
                        return Err(DomainError::conflict(HANDLE_EXISTS));
                    }
                }
            }
        }

        patch.apply_to(&mut profile);
        profile.updated_at = Utc::now();

        self.profile_repository.update_profile(&profile).await?;
        Ok(profile)
    }

    pub async fn get_by_handle(&self, handle: &str) -> DomainResult<ProfileWithOwner> {
        self.profile_repository
            .find_by_handle(handle)
            .await?
            .ok_or_else(|| DomainError::not_found("Profile not found"))
    }

    pub async fn get_by_user(&self, user_id: &str) -> DomainResult<ProfileWithOwner> {
        self.profile_repository
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("There is no profile for this user"))
    }

    pub async fn list_profiles(&self) -> DomainResult<Vec<ProfileWithOwner>> {
        let profiles = self.profile_repository.list_profiles().await?;
        info!("Found {} profiles", profiles.len());
        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::profile::{AddressInput, SocialInput};
    use crate::domain::commands::user::RegisterCommand;
    use crate::domain::models::profile::Gender;
    use crate::domain::user_service::UserService;
    use crate::storage::DbConnection;

    async fn setup() -> (ProfileService<DbConnection>, UserService<DbConnection>) {
        let db = DbConnection::init_test().await.expect("Failed to init test DB");
        (ProfileService::new(&db), UserService::new(&db))
    }

    async fn register(users: &UserService<DbConnection>, name: &str) -> String {
        users
            .register(RegisterCommand {
                name: name.to_string(),
                email: format!("{}@example.com", name),
                password: "Kaninchen2024".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    fn with_handle(handle: &str) -> ProfileInput {
        ProfileInput {
            handle: Some(handle.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_and_fetch_profile() {
        let (profiles, users) = setup().await;
        let user_id = register(&users, "rexbreeder").await;

        let input = ProfileInput {
            handle: Some("rex".to_string()),
            gender: Some("diverse".to_string()),
            address: Some(AddressInput {
                city: Some("Hannover".to_string()),
                zip: Some(30159),
                ..Default::default()
            }),
            social: Some(SocialInput {
                website: Some("https://rex.example.com".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let created = profiles.create_profile(input, &user_id).await.unwrap();
        assert_eq!(created.gender, Some(Gender::Diverse));

        let by_handle = profiles.get_by_handle("rex").await.unwrap();
        assert_eq!(by_handle.profile, created);
        assert_eq!(by_handle.user_name.as_deref(), Some("rexbreeder"));
        assert_eq!(by_handle.profile.address.zip, Some(30159));
    }

    #[tokio::test]
    async fn test_second_profile_for_user_conflicts() {
        let (profiles, users) = setup().await;
        let user_id = register(&users, "rexbreeder").await;
        profiles.create_profile(with_handle("rex"), &user_id).await.unwrap();

        let err = profiles
            .create_profile(with_handle("rex2"), &user_id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(ref m) if m == PROFILE_EXISTS));
    }

    #[tokio::test]
    async fn test_duplicate_handle_conflicts() {
        let (profiles, users) = setup().await;
        let first = register(&users, "rexbreeder").await;
        let second = register(&users, "lopbreeder").await;
        profiles.create_profile(with_handle("rex"), &first).await.unwrap();

        let err = profiles
            .create_profile(with_handle("rex"), &second)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(ref m) if m == HANDLE_EXISTS));

        profiles.create_profile(with_handle("lop"), &second).await.unwrap();
        let err = profiles
            .update_profile(with_handle("rex"), &second)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_is_partial() {
        let (profiles, users) = setup().await;
        let user_id = register(&users, "rexbreeder").await;
        let input = ProfileInput {
            handle: Some("rex".to_string()),
            club: Some("Rex Club Nord".to_string()),
            ..Default::default()
        };
        profiles.create_profile(input, &user_id).await.unwrap();

        let update = ProfileInput {
            country: Some("Germany".to_string()),
            ..Default::default()
        };
        let updated = profiles.update_profile(update, &user_id).await.unwrap();
        assert_eq!(updated.handle, "rex");
        assert_eq!(updated.club.as_deref(), Some("Rex Club Nord"));
        assert_eq!(updated.country.as_deref(), Some("Germany"));
    }

    #[tokio::test]
    async fn test_update_without_profile_is_not_found() {
        let (profiles, users) = setup().await;
        let user_id = register(&users, "rexbreeder").await;
        let err = profiles
            .update_profile(ProfileInput::default(), &user_id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_deleting_user_removes_profile() {
        let (profiles, users) = setup().await;
        let user_id = register(&users, "rexbreeder").await;
        profiles.create_profile(with_handle("rex"), &user_id).await.unwrap();

        users.delete_user(&user_id).await.unwrap();
        assert!(profiles.list_profiles().await.unwrap().is_empty());
    }
}
