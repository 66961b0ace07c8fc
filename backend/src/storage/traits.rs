//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::models::animal::{Animal, Tattoo};
use crate::domain::models::litter::{BreedingEvent, Litter};
use crate::domain::models::profile::{Profile, ProfileWithOwner};
use crate::domain::models::user::User;
use crate::domain::models::weight::WeightBucket;

/// Trait defining the interface for user storage operations
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Store a new user; duplicate name or email yields a `UniqueViolation`
    async fn store_user(&self, user: &User) -> Result<()>;

    async fn get_user(&self, user_id: &str) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_by_name(&self, name: &str) -> Result<Option<User>>;

    /// Returns true if the user was found and deleted
    async fn delete_user(&self, user_id: &str) -> Result<bool>;
}

/// Trait defining the interface for profile storage operations
#[async_trait]
pub trait ProfileStorage: Send + Sync {
    async fn store_profile(&self, profile: &Profile) -> Result<()>;

    async fn update_profile(&self, profile: &Profile) -> Result<()>;

    async fn find_by_user(&self, user_id: &str) -> Result<Option<ProfileWithOwner>>;

    async fn find_by_handle(&self, handle: &str) -> Result<Option<ProfileWithOwner>>;

    /// List every profile together with its owner's name
    async fn list_profiles(&self) -> Result<Vec<ProfileWithOwner>>;

    /// Returns true if the user had a profile
    async fn delete_by_user(&self, user_id: &str) -> Result<bool>;
}

/// Trait defining the interface for animal storage operations
#[async_trait]
pub trait AnimalStorage: Send + Sync {
    /// Store a new animal; a duplicate tattoo pair yields a `UniqueViolation`
    async fn store_animal(&self, animal: &Animal) -> Result<()>;

    /// Returns false if the animal no longer exists
    async fn update_animal(&self, animal: &Animal) -> Result<bool>;

    async fn get_animal(&self, animal_id: &str) -> Result<Option<Animal>>;

    /// Find the animal carrying exactly this tattoo pair
    async fn find_by_tattoo(&self, tattoo: &Tattoo) -> Result<Option<Animal>>;

    /// List the animals owned by a user, ordered by name
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Animal>>;

    /// List all animals, ordered by creation time
    async fn list_animals(&self) -> Result<Vec<Animal>>;

    /// Returns true if the animal was found and deleted
    async fn delete_animal(&self, animal_id: &str) -> Result<bool>;
}

/// Trait defining the interface for breeding ledger storage
#[async_trait]
pub trait LitterStorage: Send + Sync {
    /// Load a doe's ledger with its events in insertion order
    async fn get_by_doe(&self, doe_id: &str) -> Result<Option<Litter>>;

    /// Create a ledger together with its initial events; a second ledger for
    /// the same doe yields a `UniqueViolation`
    async fn create_litter(&self, litter: &Litter) -> Result<()>;

    /// Append one event to the end of an existing ledger
    async fn append_event(&self, litter_id: &str, event: &BreedingEvent) -> Result<()>;
}

/// Trait defining the interface for weight bucket storage
#[async_trait]
pub trait WeightStorage: Send + Sync {
    /// Find the bucket of an animal for the month starting at `month`
    async fn find_bucket(&self, animal_id: &str, month: &DateTime<Utc>) -> Result<Option<WeightBucket>>;

    /// Insert a new bucket; a second bucket for the same animal-month yields a
    /// `UniqueViolation`
    async fn store_bucket(&self, bucket: &WeightBucket) -> Result<()>;

    /// Replace the days of a bucket if its version still matches
    /// `bucket.version`. Returns false when another writer got there first.
    async fn update_bucket(&self, bucket: &WeightBucket) -> Result<bool>;

    /// List buckets whose month lies within `[from_month, to_month]`, ordered by month
    async fn list_buckets(
        &self,
        animal_id: &str,
        from_month: &DateTime<Utc>,
        to_month: &DateTime<Utc>,
    ) -> Result<Vec<WeightBucket>>;
}

/// Trait defining the interface for storage connections
///
/// This trait abstracts away the specific connection type and provides
/// factory methods for creating repositories, so services can be built
/// against any storage backend.
pub trait Connection: Send + Sync + Clone {
    type UserRepository: UserStorage + Clone;
    type ProfileRepository: ProfileStorage + Clone;
    type AnimalRepository: AnimalStorage + Clone;
    type LitterRepository: LitterStorage + Clone;
    type WeightRepository: WeightStorage + Clone;

    fn create_user_repository(&self) -> Self::UserRepository;

    fn create_profile_repository(&self) -> Self::ProfileRepository;

    fn create_animal_repository(&self) -> Self::AnimalRepository;

    fn create_litter_repository(&self) -> Self::LitterRepository;

    fn create_weight_repository(&self) -> Self::WeightRepository;
}
