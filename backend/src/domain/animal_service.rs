//! Pedigree records.
//!
//! The tattoo pair is the natural key of an animal. A lookup before every
//! write gives a friendly `Conflict`; the partial unique index in storage
//! catches the writes that race past the lookup and is reported the same way.

use std::collections::HashSet;

use chrono::Utc;
use tracing::{info, warn};

use crate::domain::commands::animal::{AnimalInput, PedigreeQuery};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::animal::{Animal, PedigreeNode, Sex, Tattoo};
use crate::domain::validation::{validate_animal, validate_animal_dates, ValidationMode};
use crate::storage::traits::{AnimalStorage, Connection};

pub const DEFAULT_PEDIGREE_GENERATIONS: u32 = 3;
pub const MAX_PEDIGREE_GENERATIONS: u32 = 6;

const TATTOO_TAKEN: &str = "An animal with that tattoo already exists";

#[derive(Clone)]
pub struct AnimalService<C: Connection> {
    animal_repository: C::AnimalRepository,
    enforce_update_ownership: bool,
}

impl<C: Connection> AnimalService<C> {
    pub fn new(connection: &C) -> Self {
        Self {
            animal_repository: connection.create_animal_repository(),
            enforce_update_ownership: false,
        }
    }

    /// Reject updates from anyone but the owner. Off by default, matching
    /// how records have always been editable by any signed-in user.
    pub fn with_update_ownership(mut self, enforce: bool) -> Self {
        self.enforce_update_ownership = enforce;
        self
    }

    /// Conflict if `tattoo` is carried by an animal other than `except_id`
    async fn ensure_tattoo_free(&self, tattoo: &Tattoo, except_id: Option<&str>) -> DomainResult<()> {
        if let Some(existing) = self.animal_repository.find_by_tattoo(tattoo).await? {
            if Some(existing.id.as_str()) != except_id {
                warn!(
                    "Tattoo {}/{} already assigned to animal {}",
                    tattoo.right, tattoo.left, existing.id
                );
                return Err(DomainError::conflict(TATTOO_TAKEN));
            }
        }
        Ok(())
    }

    /// Create an animal owned by the requester
    pub async fn create_animal(&self, input: AnimalInput, user_id: &str) -> DomainResult<Animal> {
        let patch = validate_animal(input, ValidationMode::Create)?;
        info!("Creating animal {:?} for user {}", patch.name, user_id);

        if let Some(tattoo) = &patch.tattoo {
            self.ensure_tattoo_free(tattoo, None).await?;
        }

        let mut animal = Animal {
            id: Animal::generate_id(),
            user_id: user_id.to_string(),
            name: String::new(),
            sex: Sex::Female,
            race: None,
            color: None,
            date_of_birth: None,
            date_of_death: None,
            date_of_slaughter: None,
            mother_id: None,
            father_id: None,
            tattoo: None,
            created_at: Utc::now(),
        };
        patch.apply_to(&mut animal);

        self.animal_repository.store_animal(&animal).await?;
        info!("Created animal {} with ID: {}", animal.name, animal.id);
        Ok(animal)
    }

    /// Apply a partial update; the merged record must still be consistent
    pub async fn update_animal(
        &self,
        animal_id: &str,
        input: AnimalInput,
        user_id: &str,
    ) -> DomainResult<Animal> {
        let patch = validate_animal(input, ValidationMode::Update)?;
        info!("Updating animal: {}", animal_id);

        let mut animal = self
            .animal_repository
            .get_animal(animal_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Animal not found"))?;

        if self.enforce_update_ownership && !animal.is_owned_by(user_id) {
            return Err(DomainError::Forbidden("User not authorized".to_string()));
        }

        if let Some(tattoo) = &patch.tattoo {
            self.ensure_tattoo_free(tattoo, Some(animal_id)).await?;
        }

        patch.apply_to(&mut animal);
        validate_animal_dates(
            animal.date_of_birth,
            animal.date_of_death,
            animal.date_of_slaughter,
        )?;

        if !self.animal_repository.update_animal(&animal).await? {
            warn!("Animal {} was deleted while being updated", animal_id);
            return Err(DomainError::not_found("Animal not found"));
        }
        Ok(animal)
    }

    /// Delete an animal; only its owner may do so
    pub async fn delete_animal(&self, animal_id: &str, user_id: &str) -> DomainResult<()> {
        info!("Deleting animal: {}", animal_id);

        let animal = self
            .animal_repository
            .get_animal(animal_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Animal not found"))?;

        if !animal.is_owned_by(user_id) {
            warn!("User {} tried to delete animal {} of {}", user_id, animal.id, animal.user_id);
            return Err(DomainError::Forbidden("User not authorized".to_string()));
        }

        self.animal_repository.delete_animal(animal_id).await?;
        info!("Deleted animal {} with ID: {}", animal.name, animal.id);
        Ok(())
    }

    pub async fn get_animal(&self, animal_id: &str) -> DomainResult<Animal> {
        self.animal_repository
            .get_animal(animal_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Animal not found"))
    }

    pub async fn list_by_user(&self, user_id: &str) -> DomainResult<Vec<Animal>> {
        Ok(self.animal_repository.list_by_user(user_id).await?)
    }

    pub async fn list_animals(&self) -> DomainResult<Vec<Animal>> {
        let animals = self.animal_repository.list_animals().await?;
        info!("Found {} animals", animals.len());
        Ok(animals)
    }

    /// Build the ancestry tree of an animal.
    ///
    /// Parents that cannot be found become empty branches. An animal that
    /// already appears on the path from the root is not expanded again, so
    /// looping parent links still terminate.
    pub async fn pedigree(&self, query: PedigreeQuery) -> DomainResult<PedigreeNode> {
        let generations = query
            .generations
            .unwrap_or(DEFAULT_PEDIGREE_GENERATIONS)
            .clamp(1, MAX_PEDIGREE_GENERATIONS);

        let root = self.get_animal(&query.animal_id).await?;
        let mut path = HashSet::new();
        path.insert(root.id.clone());

        Ok(self.expand(&root, generations - 1, &mut path).await?)
    }

    fn expand<'a>(
        &'a self,
        animal: &'a Animal,
        remaining: u32,
        path: &'a mut HashSet<String>,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = anyhow::Result<PedigreeNode>> + Send + 'a>>
    {
        Box::pin(async move {
            let mut node = PedigreeNode::leaf(animal);
            if remaining == 0 {
                return Ok(node);
            }

            for (parent_id, is_mother) in [(&animal.mother_id, true), (&animal.father_id, false)] {
                let Some(parent_id) = parent_id else { continue };
                if path.contains(parent_id) {
                    warn!("Pedigree of {} loops back to {}", animal.id, parent_id);
                    continue;
                }
                let Some(parent) = self.animal_repository.get_animal(parent_id).await? else {
                    continue;
                };

                path.insert(parent.id.clone());
                let branch = self.expand(&parent, remaining - 1, path).await;
                path.remove(&parent.id);

                let branch = Some(Box::new(branch?));
                if is_mother {
                    node.mother = branch;
                } else {
                    node.father = branch;
                }
            }
            Ok(node)
        })
    }
}
