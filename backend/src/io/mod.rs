//! # IO Module
//!
//! The adapter layer between HTTP clients and the domain services.
//!
//! Requests arrive as the DTOs of the `shared` crate, are mapped to domain
//! commands, and the results are mapped back to DTOs. Domain errors are
//! translated to status codes in one place, [`rest::error::ApiError`].

pub mod rest;
