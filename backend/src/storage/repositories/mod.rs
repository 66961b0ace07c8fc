//! SQLite implementations of the storage traits.

pub mod animal_repository;
pub mod litter_repository;
pub mod profile_repository;
pub mod user_repository;
pub mod weight_repository;

pub use animal_repository::AnimalRepository;
pub use litter_repository::LitterRepository;
pub use profile_repository::ProfileRepository;
pub use user_repository::UserRepository;
pub use weight_repository::WeightRepository;
