use chrono::Utc;
use tracing::{info, warn};

use crate::domain::commands::litter::RecordBreedingCommand;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::animal::Sex;
use crate::domain::models::litter::{BreedingEvent, Litter};
use crate::domain::validation::validate_breeding_event;
use crate::storage::traits::{AnimalStorage, Connection, LitterStorage};
use crate::storage::UniqueViolation;

/// Service for the breeding ledgers of does
#[derive(Clone)]
pub struct LitterService<C: Connection> {
    litter_repository: C::LitterRepository,
    animal_repository: C::AnimalRepository,
}

impl<C: Connection> LitterService<C> {
    pub fn new(connection: &C) -> Self {
        Self {
            litter_repository: connection.create_litter_repository(),
            animal_repository: connection.create_animal_repository(),
        }
    }

    /// Append a breeding event to a doe's ledger, opening the ledger on
    /// the first event. Returns the whole ledger.
    pub async fn record_event(
        &self,
        doe_id: &str,
        command: RecordBreedingCommand,
        user_id: &str,
    ) -> DomainResult<Litter> {
        info!("Recording breeding event for doe {} by user {}", doe_id, user_id);

        let doe = self
            .animal_repository
            .get_animal(doe_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Animal not found"))?;
        if !doe.is_female() {
            return Err(DomainError::InvalidState(
                "Litters can only be recorded for does".to_string(),
            ));
        }

        let event = validate_breeding_event(command)?;

        let buck = self
            .animal_repository
            .get_animal(&event.buck_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Buck not found"))?;
        if buck.sex != Sex::Male {
            return Err(DomainError::InvalidState(
                "The buck of a litter must be male".to_string(),
            ));
        }

        self.append_or_open(doe_id, event).await?;

        self.litter_repository
            .get_by_doe(doe_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Litter not found"))
    }

    async fn append_or_open(&self, doe_id: &str, event: BreedingEvent) -> anyhow::Result<()> {
        if let Some(litter) = self.litter_repository.get_by_doe(doe_id).await? {
            self.litter_repository.append_event(&litter.id, &event).await?;
            info!("Appended event {} to litter {}", event.id, litter.id);
            return Ok(());
        }

        let litter = Litter::open(doe_id, event.clone(), Utc::now());
        match self.litter_repository.create_litter(&litter).await {
            Ok(()) => {
                info!("Opened litter {} for doe {}", litter.id, doe_id);
                Ok(())
            }
            Err(err) if err.downcast_ref::<UniqueViolation>().is_some() => {
                // Another request opened the ledger in between; join it.
                warn!("Litter for doe {} appeared concurrently, appending", doe_id);
                let existing = self
                    .litter_repository
                    .get_by_doe(doe_id)
                    .await?
                    .ok_or_else(|| anyhow::anyhow!("Litter for doe {} vanished", doe_id))?;
                self.litter_repository.append_event(&existing.id, &event).await
            }
            Err(err) => Err(err),
        }
    }

    /// The doe's ledger, or `None` if nothing was recorded yet
    pub async fn get_by_doe(&self, doe_id: &str) -> DomainResult<Option<Litter>> {
        Ok(self.litter_repository.get_by_doe(doe_id).await?)
    }
}
