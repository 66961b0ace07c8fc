//! # Domain Layer
//!
//! This module contains the business logic of the stud book. It sits between
//! the IO layer (REST handlers) and the storage layer (sqlx repositories).
//!
//! ## Services
//!
//! - **UserService**: registration, login and account deletion
//! - **ProfileService**: one public profile per user, unique handles
//! - **AnimalService**: pedigree records, tattoo uniqueness, ancestry trees
//! - **LitterService**: per-doe breeding ledgers
//! - **WeightService**: month-bucketed weight series with merge-on-write
//!
//! Every service is generic over a storage [`Connection`](crate::storage::Connection),
//! validates its input through [`validation`] before touching storage, and
//! reports failures as [`DomainError`].

pub mod animal_service;
pub mod commands;
pub mod errors;
pub mod litter_service;
pub mod models;
pub mod profile_service;
pub mod user_service;
pub mod validation;
pub mod weight_service;

pub use animal_service::AnimalService;
pub use errors::{DomainError, DomainResult, FieldError};
pub use litter_service::LitterService;
pub use profile_service::ProfileService;
pub use user_service::UserService;
pub use weight_service::WeightService;
