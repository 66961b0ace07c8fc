//! A [`Connection`] over the in-memory database whose repositories can be
//! told to lose a race, so the services' recovery paths run deterministically.
//!
//! The counters count down: a value of `n` makes the next `n` calls behave as
//! if another writer had acted in between.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::domain::models::animal::{Animal, Tattoo};
use crate::domain::models::litter::{BreedingEvent, Litter};
use crate::domain::models::weight::WeightBucket;
use crate::storage::repositories::{
    AnimalRepository, LitterRepository, ProfileRepository, UserRepository, WeightRepository,
};
use crate::storage::traits::{AnimalStorage, Connection, LitterStorage, WeightStorage};
use crate::storage::DbConnection;

/// Shared switches for the racing repositories
#[derive(Default)]
pub struct Races {
    /// `get_by_doe` misses a ledger that exists
    pub stale_ledger_reads: AtomicUsize,
    /// `find_bucket` misses a bucket that exists
    pub stale_bucket_reads: AtomicUsize,
    /// `update_bucket` finds the version already bumped
    pub lost_bucket_updates: AtomicUsize,
    /// `update_animal` runs after the animal was deleted
    pub delete_before_update: AtomicBool,
}

fn take(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

#[derive(Clone)]
pub struct RacingConnection {
    db: DbConnection,
    pub races: Arc<Races>,
}

impl RacingConnection {
    pub async fn init_test() -> Result<Self> {
        Ok(Self {
            db: DbConnection::init_test().await?,
            races: Arc::new(Races::default()),
        })
    }

    /// The plain connection underneath, for setting up fixtures
    pub fn db(&self) -> &DbConnection {
        &self.db
    }
}

#[derive(Clone)]
pub struct RacingAnimalRepository {
    inner: AnimalRepository,
    races: Arc<Races>,
}

#[async_trait]
impl AnimalStorage for RacingAnimalRepository {
    async fn store_animal(&self, animal: &Animal) -> Result<()> {
        self.inner.store_animal(animal).await
    }

    async fn update_animal(&self, animal: &Animal) -> Result<bool> {
        if self.races.delete_before_update.swap(false, Ordering::SeqCst) {
            self.inner.delete_animal(&animal.id).await?;
        }
        self.inner.update_animal(animal).await
    }

    async fn get_animal(&self, animal_id: &str) -> Result<Option<Animal>> {
        self.inner.get_animal(animal_id).await
    }

    async fn find_by_tattoo(&self, tattoo: &Tattoo) -> Result<Option<Animal>> {
        self.inner.find_by_tattoo(tattoo).await
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Animal>> {
        self.inner.list_by_user(user_id).await
    }

    async fn list_animals(&self) -> Result<Vec<Animal>> {
        self.inner.list_animals().await
    }

    async fn delete_animal(&self, animal_id: &str) -> Result<bool> {
        self.inner.delete_animal(animal_id).await
    }
}

#[derive(Clone)]
pub struct RacingLitterRepository {
    inner: LitterRepository,
    races: Arc<Races>,
}

#[async_trait]
impl LitterStorage for RacingLitterRepository {
    async fn get_by_doe(&self, doe_id: &str) -> Result<Option<Litter>> {
        if take(&self.races.stale_ledger_reads) {
            return Ok(None);
        }
        self.inner.get_by_doe(doe_id).await
    }

    async fn create_litter(&self, litter: &Litter) -> Result<()> {
        self.inner.create_litter(litter).await
    }

    async fn append_event(&self, litter_id: &str, event: &BreedingEvent) -> Result<()> {
        self.inner.append_event(litter_id, event).await
    }
}

#[derive(Clone)]
pub struct RacingWeightRepository {
    inner: WeightRepository,
    races: Arc<Races>,
}

#[async_trait]
impl WeightStorage for RacingWeightRepository {
    async fn find_bucket(&self, animal_id: &str, month: &DateTime<Utc>) -> Result<Option<WeightBucket>> {
        if take(&self.races.stale_bucket_reads) {
            return Ok(None);
        }
        self.inner.find_bucket(animal_id, month).await
    }

    async fn store_bucket(&self, bucket: &WeightBucket) -> Result<()> {
        self.inner.store_bucket(bucket).await
    }

    async fn update_bucket(&self, bucket: &WeightBucket) -> Result<bool> {
        if take(&self.races.lost_bucket_updates) {
            return Ok(false);
        }
        self.inner.update_bucket(bucket).await
    }

    async fn list_buckets(
        &self,
        animal_id: &str,
        from_month: &DateTime<Utc>,
        to_month: &DateTime<Utc>,
    ) -> Result<Vec<WeightBucket>> {
        self.inner.list_buckets(animal_id, from_month, to_month).await
    }
}

impl Connection for RacingConnection {
    type UserRepository = UserRepository;
    type ProfileRepository = ProfileRepository;
    type AnimalRepository = RacingAnimalRepository;
    type LitterRepository = RacingLitterRepository;
    type WeightRepository = RacingWeightRepository;

    fn create_user_repository(&self) -> Self::UserRepository {
        self.db.create_user_repository()
    }

    fn create_profile_repository(&self) -> Self::ProfileRepository {
        self.db.create_profile_repository()
    }

    fn create_animal_repository(&self) -> Self::AnimalRepository {
        RacingAnimalRepository {
            inner: self.db.create_animal_repository(),
            races: self.races.clone(),
        }
    }

    fn create_litter_repository(&self) -> Self::LitterRepository {
        RacingLitterRepository {
            inner: self.db.create_litter_repository(),
            races: self.races.clone(),
        }
    }

    fn create_weight_repository(&self) -> Self::WeightRepository {
        RacingWeightRepository {
            inner: self.db.create_weight_repository(),
            races: self.races.clone(),
        }
    }
}
