//! Domain-level command and query types
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer is responsible for mapping the
//! public DTOs defined in the `shared` crate to these internal types.
//!
//! `*Input` types carry raw, unvalidated values exactly as submitted.
//! `*Patch` types are what validation produces: every field optional and
//! already typed, applied to a record only when present.

pub mod user {
    /// Input for registering a new account.
    #[derive(Debug, Clone)]
    pub struct RegisterCommand {
        pub name: String,
        pub email: String,
        pub password: String,
    }

    /// Input for logging in.
    #[derive(Debug, Clone)]
    pub struct LoginCommand {
        pub email: String,
        pub password: String,
    }
}

pub mod profile {
    use crate::domain::models::profile::{Gender, Profile};

    #[derive(Debug, Clone, Default)]
    pub struct AddressInput {
        pub street: Option<String>,
        pub city: Option<String>,
        pub state: Option<String>,
        pub zip: Option<i64>,
    }

    #[derive(Debug, Clone, Default)]
    pub struct SocialInput {
        pub telephone: Option<String>,
        pub website: Option<String>,
        pub facebook: Option<String>,
        pub youtube: Option<String>,
        pub twitter: Option<String>,
        pub instagram: Option<String>,
    }

    /// Raw profile fields from a create or update request.
    #[derive(Debug, Clone, Default)]
    pub struct ProfileInput {
        pub handle: Option<String>,
        pub gender: Option<String>,
        pub country: Option<String>,
        pub club: Option<String>,
        pub address: Option<AddressInput>,
        pub social: Option<SocialInput>,
    }

    /// Validated partial profile.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct ProfilePatch {
        pub handle: Option<String>,
        pub gender: Option<Gender>,
        pub country: Option<String>,
        pub club: Option<String>,
        pub street: Option<String>,
        pub city: Option<String>,
        pub state: Option<String>,
        pub zip: Option<u32>,
        pub telephone: Option<String>,
        pub website: Option<String>,
        pub facebook: Option<String>,
        pub youtube: Option<String>,
        pub twitter: Option<String>,
        pub instagram: Option<String>,
    }

    impl ProfilePatch {
        /// Overwrite the fields of `profile` that this patch carries
        pub fn apply_to(self, profile: &mut Profile) {
            if let Some(handle) = self.handle {
                profile.handle = handle;
            }
            if self.gender.is_some() {
                profile.gender = self.gender;
            }
            if self.country.is_some() {
                profile.country = self.country;
            }
            if self.club.is_some() {
                profile.club = self.club;
            }
            let address = &mut profile.address;
            if self.street.is_some() {
                address.street = self.street;
            }
            if self.city.is_some() {
                address.city = self.city;
            }
            if self.state.is_some() {
                address.state = self.state;
            }
            if self.zip.is_some() {
                address.zip = self.zip;
            }
            let social = &mut profile.social;
            if self.telephone.is_some() {
                social.telephone = self.telephone;
            }
            if self.website.is_some() {
                social.website = self.website;
            }
            if self.facebook.is_some() {
                social.facebook = self.facebook;
            }
            if self.youtube.is_some() {
                social.youtube = self.youtube;
            }
            if self.twitter.is_some() {
                social.twitter = self.twitter;
            }
            if self.instagram.is_some() {
                social.instagram = self.instagram;
            }
        }
    }
}

pub mod animal {
    use chrono::{DateTime, Utc};

    use crate::domain::models::animal::{Animal, Sex, Tattoo};

    #[derive(Debug, Clone, Default)]
    pub struct TattooInput {
        pub right: Option<String>,
        pub left: Option<i64>,
    }

    /// Raw animal fields from a create or update request.
    #[derive(Debug, Clone, Default)]
    pub struct AnimalInput {
        pub name: Option<String>,
        pub sex: Option<String>,
        pub race: Option<String>,
        pub color: Option<String>,
        pub date_of_birth: Option<DateTime<Utc>>,
        pub date_of_death: Option<DateTime<Utc>>,
        pub date_of_slaughter: Option<DateTime<Utc>>,
        pub mother_id: Option<String>,
        pub father_id: Option<String>,
        pub tattoo: Option<TattooInput>,
    }

    /// Validated partial animal.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct AnimalPatch {
        pub name: Option<String>,
        pub sex: Option<Sex>,
        pub race: Option<String>,
        pub color: Option<String>,
        pub date_of_birth: Option<DateTime<Utc>>,
        pub date_of_death: Option<DateTime<Utc>>,
        pub date_of_slaughter: Option<DateTime<Utc>>,
        pub mother_id: Option<String>,
        pub father_id: Option<String>,
        pub tattoo: Option<Tattoo>,
    }

    impl AnimalPatch {
        /// Overwrite the fields of `animal` that this patch carries
        pub fn apply_to(self, animal: &mut Animal) {
            if let Some(name) = self.name {
                animal.name = name;
            }
            if let Some(sex) = self.sex {
                animal.sex = sex;
            }
            if self.race.is_some() {
                animal.race = self.race;
            }
            if self.color.is_some() {
                animal.color = self.color;
            }
            if self.date_of_birth.is_some() {
                animal.date_of_birth = self.date_of_birth;
            }
            if self.date_of_death.is_some() {
                animal.date_of_death = self.date_of_death;
            }
            if self.date_of_slaughter.is_some() {
                animal.date_of_slaughter = self.date_of_slaughter;
            }
            if self.mother_id.is_some() {
                animal.mother_id = self.mother_id;
            }
            if self.father_id.is_some() {
                animal.father_id = self.father_id;
            }
            if self.tattoo.is_some() {
                animal.tattoo = self.tattoo;
            }
        }
    }

    /// Query for an ancestry tree.
    #[derive(Debug, Clone)]
    pub struct PedigreeQuery {
        pub animal_id: String,
        pub generations: Option<u32>,
    }
}

pub mod litter {
    use chrono::{DateTime, Utc};

    /// Raw breeding event as submitted for a doe.
    #[derive(Debug, Clone, Default)]
    pub struct RecordBreedingCommand {
        pub buck_id: Option<String>,
        pub date_of_mating: Option<DateTime<Utc>>,
        pub date_of_remating: Option<DateTime<Utc>>,
        pub date_of_kindle: Option<DateTime<Utc>>,
        pub litter_size: Option<i64>,
    }
}

pub mod weight {
    use chrono::{DateTime, Utc};

    /// Raw single measurement.
    #[derive(Debug, Clone, Default)]
    pub struct RecordWeightCommand {
        pub timestamp: Option<DateTime<Utc>>,
        pub weight: Option<f64>,
    }

    /// Month range for listing buckets; missing bounds mean "now".
    #[derive(Debug, Clone, Default)]
    pub struct WeightRangeQuery {
        pub from: Option<DateTime<Utc>>,
        pub to: Option<DateTime<Utc>>,
    }
}
