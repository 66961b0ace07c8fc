//! Domain models. These never cross the HTTP boundary; the REST mappers
//! convert them to and from the DTOs in the `shared` crate.

pub mod animal;
pub mod litter;
pub mod profile;
pub mod user;
pub mod weight;
