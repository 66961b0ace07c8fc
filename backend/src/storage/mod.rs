//! # Storage Module
//!
//! Handles all data persistence for the stud book.
//!
//! The domain layer only talks to the traits in [`traits`]; the SQLite
//! repositories in [`repositories`] are the one implementation shipped today.
//!
//! ## Tables
//!
//! - `users`, `profiles`: identity and owner metadata
//! - `animals`: pedigree records, self-referencing through `mother_id` / `father_id`
//! - `litters`, `litter_events`: one breeding ledger per doe plus its ordered events
//! - `weights`: one row per (animal, month) bucket, days kept as a JSON array
//!
//! ## Uniqueness
//!
//! Natural keys that the domain checks up front (tattoo pair, handle, email,
//! user name, doe ledger, animal-month bucket) are also backed by unique
//! indexes. A violation surfaces as [`UniqueViolation`] so the domain can
//! report it as a conflict instead of a storage failure.

pub mod connection;
pub mod errors;
pub mod repositories;
#[cfg(test)]
pub(crate) mod test_support;
pub mod traits;

pub use connection::DbConnection;
pub use errors::UniqueViolation;
pub use repositories::{
    AnimalRepository, LitterRepository, ProfileRepository, UserRepository, WeightRepository,
};
pub use traits::{
    AnimalStorage, Connection, LitterStorage, ProfileStorage, UserStorage, WeightStorage,
};
