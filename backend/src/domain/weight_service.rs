//! Weight series with merge-on-write.
//!
//! A measurement lands in the bucket of its UTC month. Writers race on the
//! same bucket, so updates carry the version they read and are retried
//! against a fresh copy when another writer got there first.

use chrono::{Datelike, Utc};
use tracing::{debug, info, warn};

use crate::domain::commands::weight::{RecordWeightCommand, WeightRangeQuery};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::weight::{MergeOutcome, WeightBucket};
use crate::domain::validation::validate_weight;
use crate::storage::traits::{AnimalStorage, Connection, WeightStorage};
use crate::storage::UniqueViolation;

const MAX_MERGE_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct WeightService<C: Connection> {
    weight_repository: C::WeightRepository,
    animal_repository: C::AnimalRepository,
}

impl<C: Connection> WeightService<C> {
    pub fn new(connection: &C) -> Self {
        Self {
            weight_repository: connection.create_weight_repository(),
            animal_repository: connection.create_animal_repository(),
        }
    }

    /// Record one measurement and return the bucket it ended up in
    pub async fn record_measurement(
        &self,
        animal_id: &str,
        command: RecordWeightCommand,
        user_id: &str,
    ) -> DomainResult<WeightBucket> {
        let (timestamp, weight) = validate_weight(command)?;
        info!("Recording weight {} for animal {} by user {}", weight, animal_id, user_id);

        if self.animal_repository.get_animal(animal_id).await?.is_none() {
            return Err(DomainError::not_found("Animal not found"));
        }

        let month = WeightBucket::month_of(&timestamp);
        let day = timestamp.day();

        for attempt in 1..=MAX_MERGE_ATTEMPTS {
            match self.weight_repository.find_bucket(animal_id, &month).await? {
                None => {
                    let bucket = WeightBucket::new(animal_id, &timestamp, weight);
                    match self.weight_repository.store_bucket(&bucket).await {
                        Ok(()) => return Ok(bucket),
                        Err(err) if err.downcast_ref::<UniqueViolation>().is_some() => {
                            debug!("Bucket for {} appeared concurrently (attempt {})", animal_id, attempt);
                        }
                        Err(err) => return Err(err.into()),
                    }
                }
                Some(mut bucket) => {
                    let outcome = bucket.record(day, weight);
                    if self.weight_repository.update_bucket(&bucket).await? {
                        if let MergeOutcome::Overwritten { previous } = outcome {
                            debug!("Day {} overwritten, was {}", day, previous);
                        }
                        bucket.version += 1;
                        return Ok(bucket);
                    }
                    debug!("Bucket {} changed underneath (attempt {})", bucket.id, attempt);
                }
            }
        }

        warn!("Giving up on weight for animal {} after {} attempts", animal_id, MAX_MERGE_ATTEMPTS);
        Err(DomainError::conflict(
            "The weight record was modified concurrently, please retry",
        ))
    }

    /// All buckets from the month of `from` to the month of `to`, both
    /// inclusive. Missing bounds mean the current month.
    pub async fn query(&self, animal_id: &str, query: WeightRangeQuery) -> DomainResult<Vec<WeightBucket>> {
        let now = Utc::now();
        let from = WeightBucket::month_of(&query.from.unwrap_or(now));
        let to = WeightBucket::month_of(&query.to.unwrap_or(now));

        let buckets = self.weight_repository.list_buckets(animal_id, &from, &to).await?;
        info!("Found {} weight buckets for animal {}", buckets.len(), animal_id);
        Ok(buckets)
    }
}
