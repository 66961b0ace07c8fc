//! # REST API Interface Layer
//!
//! Every module exposes a `router()` that is nested under `/api` by
//! [`create_router`](crate::create_router):
//!
//! - `/users`: registration and account deletion
//! - `/auth`: login and the current user
//! - `/profiles`: owner profiles
//! - `/animals`: animal records and pedigrees, plus the nested
//!   `/animals/:id/weight` and `/animals/:id/litters` resources
//!
//! Handlers log each request, delegate to one domain service call and map
//! the outcome through [`error::ApiError`]. Bodies and query strings are
//! read with the [`extract`] wrappers so malformed input answers the same way.

pub mod animal_apis;
pub mod auth;
pub mod auth_apis;
pub mod error;
pub mod extract;
pub mod litter_apis;
pub mod mappers;
pub mod profile_apis;
pub mod user_apis;
pub mod weight_apis;

#[cfg(test)]
pub(crate) mod test_support;
