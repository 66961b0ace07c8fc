//! Conversions between the `shared` DTOs and domain types.
//!
//! Requests become domain commands; domain models become response DTOs.
//! Mappers hold no state and never fail: anything that needs checking is
//! left to the domain validation.

pub mod animal_mapper;
pub mod litter_mapper;
pub mod profile_mapper;
pub mod user_mapper;
pub mod weight_mapper;

pub use animal_mapper::AnimalMapper;
pub use litter_mapper::LitterMapper;
pub use profile_mapper::ProfileMapper;
pub use user_mapper::UserMapper;
pub use weight_mapper::WeightMapper;
