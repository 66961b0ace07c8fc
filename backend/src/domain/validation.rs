//! Field validation for every mutating operation.
//!
//! Each `validate_*` function walks the whole input and collects every
//! violation before returning, so callers see all problems at once. On
//! success the raw input comes back as a typed value (patch, event, ...).
//! Field names in errors use the public camelCase spelling.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::commands::animal::{AnimalInput, AnimalPatch, TattooInput};
use crate::domain::commands::litter::RecordBreedingCommand;
use crate::domain::commands::profile::{ProfileInput, ProfilePatch};
use crate::domain::commands::user::RegisterCommand;
use crate::domain::commands::weight::RecordWeightCommand;
use crate::domain::errors::{DomainError, DomainResult, FieldError};
use crate::domain::models::animal::{Sex, Tattoo};
use crate::domain::models::litter::{BreedingEvent, MAX_LITTER_SIZE};
use crate::domain::models::profile::Gender;
use crate::domain::models::weight::{MAX_WEIGHT, MIN_WEIGHT};

static TATTOO_RIGHT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{1,2}J?[0-9]{1,3}$").expect("tattoo pattern compiles"));

static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9 ().\-]+$").expect("phone pattern compiles"));

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)+$").expect("email pattern compiles")
});

pub const TATTOO_LEFT_MAX: i64 = 99_999;

/// Whether a field must be present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    Create,
    Update,
}

/// Accumulates field errors across a whole input
#[derive(Debug, Default)]
struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    fn required<T>(&mut self, field: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.push(field, "is required");
        }
        value
    }

    /// Trimmed text whose length in characters lies in `min..=max`
    fn text(&mut self, field: &str, value: Option<String>, min: usize, max: usize) -> Option<String> {
        let value = value?.trim().to_string();
        let len = value.chars().count();
        if len < min || len > max {
            self.push(field, format!("must be between {} and {} characters", min, max));
            return None;
        }
        Some(value)
    }

    fn absolute_url(&mut self, field: &str, value: Option<String>) -> Option<String> {
        let value = value?.trim().to_string();
        match url::Url::parse(&value) {
            Ok(_) => Some(value),
            Err(_) => {
                self.push(field, "must be a valid URL");
                None
            }
        }
    }

    fn not_before(
        &mut self,
        field: &str,
        value: Option<DateTime<Utc>>,
        earlier_field: &str,
        earlier: Option<DateTime<Utc>>,
    ) {
        if let (Some(value), Some(earlier)) = (value, earlier) {
            if value < earlier {
                self.push(field, format!("must not be before {}", earlier_field));
            }
        }
    }

    fn finish<T>(self, value: T) -> DomainResult<T> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(DomainError::Validation(self.errors))
        }
    }
}

fn check_chronology(
    v: &mut Validator,
    birth: Option<DateTime<Utc>>,
    death: Option<DateTime<Utc>>,
    slaughter: Option<DateTime<Utc>>,
) {
    v.not_before("dateOfDeath", death, "dateOfBirth", birth);
    v.not_before("dateOfSlaughter", slaughter, "dateOfDeath", death);
    if death.is_none() {
        v.not_before("dateOfSlaughter", slaughter, "dateOfBirth", birth);
    }
}

fn tattoo(v: &mut Validator, input: TattooInput) -> Option<Tattoo> {
    let right = v
        .required("tattoo.right", input.right)
        .map(|r| r.trim().to_string());
    let right = match right {
        Some(r) if TATTOO_RIGHT.is_match(&r) => Some(r),
        Some(_) => {
            v.push("tattoo.right", "must look like AB123 or ABJ123");
            None
        }
        None => None,
    };

    let left = match v.required("tattoo.left", input.left) {
        Some(l) if (1..=TATTOO_LEFT_MAX).contains(&l) => u32::try_from(l).ok(),
        Some(_) => {
            v.push("tattoo.left", format!("must be between 1 and {}", TATTOO_LEFT_MAX));
            None
        }
        None => None,
    };

    Some(Tattoo {
        right: right?,
        left: left?,
    })
}

/// Validate animal fields. On create `name` and `sex` are required.
pub fn validate_animal(input: AnimalInput, mode: ValidationMode) -> DomainResult<AnimalPatch> {
    let mut v = Validator::new();

    let name = if mode == ValidationMode::Create {
        v.required("name", input.name)
    } else {
        input.name
    };
    let name = v.text("name", name, 3, 30);

    let sex = if mode == ValidationMode::Create {
        v.required("sex", input.sex)
    } else {
        input.sex
    };
    let sex = match sex {
        Some(token) => match Sex::from_token(&token) {
            Some(sex) => Some(sex),
            None => {
                v.push("sex", "must be \"0,1\" (female) or \"1,0\" (male)");
                None
            }
        },
        None => None,
    };

    let race = v.text("race", input.race, 3, 50);
    let color = v.text("color", input.color, 3, 50);
    let tattoo = input.tattoo.and_then(|t| tattoo(&mut v, t));

    check_chronology(
        &mut v,
        input.date_of_birth,
        input.date_of_death,
        input.date_of_slaughter,
    );

    v.finish(AnimalPatch {
        name,
        sex,
        race,
        color,
        date_of_birth: input.date_of_birth,
        date_of_death: input.date_of_death,
        date_of_slaughter: input.date_of_slaughter,
        mother_id: input.mother_id.filter(|id| !id.trim().is_empty()),
        father_id: input.father_id.filter(|id| !id.trim().is_empty()),
        tattoo,
    })
}

/// Date ordering of a complete record, used after merging a patch
pub fn validate_animal_dates(
    birth: Option<DateTime<Utc>>,
    death: Option<DateTime<Utc>>,
    slaughter: Option<DateTime<Utc>>,
) -> DomainResult<()> {
    let mut v = Validator::new();
    check_chronology(&mut v, birth, death, slaughter);
    v.finish(())
}

/// Validate profile fields. On create `handle` is required.
pub fn validate_profile(input: ProfileInput, mode: ValidationMode) -> DomainResult<ProfilePatch> {
    let mut v = Validator::new();

    let handle = if mode == ValidationMode::Create {
        v.required("handle", input.handle)
    } else {
        input.handle
    };
    let handle = v.text("handle", handle, 2, 40);

    let gender = match input.gender {
        Some(raw) => match raw.parse::<Gender>() {
            Ok(gender) => Some(gender),
            Err(_) => {
                v.push("gender", "must be one of male, female, diverse");
                None
            }
        },
        None => None,
    };

    let country = v.text("country", input.country, 2, 40);
    let club = v.text("club", input.club, 2, 40);

    let address = input.address.unwrap_or_default();
    let street = v.text("address.street", address.street, 2, 40);
    let city = v.text("address.city", address.city, 2, 50);
    let state = v.text("address.state", address.state, 2, 30);
    let zip = match address.zip {
        Some(zip) if zip > 0 => u32::try_from(zip).ok().or_else(|| {
            v.push("address.zip", "is too large");
            None
        }),
        Some(_) => {
            v.push("address.zip", "must be a positive number");
            None
        }
        None => None,
    };

    let social = input.social.unwrap_or_default();
    let telephone = match social.telephone.map(|t| t.trim().to_string()) {
        Some(phone) => {
            let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
            if PHONE.is_match(&phone) && (6..=20).contains(&digits) {
                Some(phone)
            } else {
                v.push("social.telephone", "must be a valid phone number");
                None
            }
        }
        None => None,
    };
    let website = v.absolute_url("social.website", social.website);
    let facebook = v.absolute_url("social.facebook", social.facebook);
    let youtube = v.absolute_url("social.youtube", social.youtube);
    let twitter = v.absolute_url("social.twitter", social.twitter);
    let instagram = v.absolute_url("social.instagram", social.instagram);

    v.finish(ProfilePatch {
        handle,
        gender,
        country,
        club,
        street,
        city,
        state,
        zip,
        telephone,
        website,
        facebook,
        youtube,
        twitter,
        instagram,
    })
}

/// Validate a breeding event and give it an id
pub fn validate_breeding_event(input: RecordBreedingCommand) -> DomainResult<BreedingEvent> {
    let mut v = Validator::new();

    let buck_id = v
        .required("buck", input.buck_id.filter(|b| !b.trim().is_empty()))
        .map(|b| b.trim().to_string());
    let mating = v.required("dateOfMating", input.date_of_mating);
    let remating = v.required("dateOfRemating", input.date_of_remating);
    let kindle = v.required("dateOfKindle", input.date_of_kindle);
    v.not_before("dateOfRemating", remating, "dateOfMating", mating);
    v.not_before("dateOfKindle", kindle, "dateOfMating", mating);

    let litter_size = match v.required("litterSize", input.litter_size) {
        Some(size) if (0..=i64::from(MAX_LITTER_SIZE)).contains(&size) => u8::try_from(size).ok(),
        Some(_) => {
            v.push(
                "litterSize",
                format!("must be between 0 and {}", MAX_LITTER_SIZE),
            );
            None
        }
        None => None,
    };

    match (buck_id, mating, remating, kindle, litter_size) {
        (Some(buck_id), Some(mating), Some(remating), Some(kindle), Some(litter_size))
            if v.errors.is_empty() =>
        {
            Ok(BreedingEvent {
                id: BreedingEvent::generate_id(),
                buck_id,
                date_of_mating: mating,
                date_of_remating: remating,
                date_of_kindle: kindle,
                litter_size,
            })
        }
        _ => Err(DomainError::Validation(v.errors)),
    }
}

/// Validate one weight measurement
pub fn validate_weight(input: RecordWeightCommand) -> DomainResult<(DateTime<Utc>, f64)> {
    let mut v = Validator::new();

    let timestamp = v.required("timestamp", input.timestamp);
    let weight = match v.required("weight", input.weight) {
        Some(w) if w.is_finite() && (MIN_WEIGHT..=MAX_WEIGHT).contains(&w) => Some(w),
        Some(_) => {
            v.push(
                "weight",
                format!("must be between {} and {}", MIN_WEIGHT, MAX_WEIGHT),
            );
            None
        }
        None => None,
    };

    match (timestamp, weight) {
        (Some(timestamp), Some(weight)) if v.errors.is_empty() => Ok((timestamp, weight)),
        _ => Err(DomainError::Validation(v.errors)),
    }
}

fn password_classes(password: &str) -> usize {
    let lower = password.chars().any(|c| c.is_lowercase());
    let upper = password.chars().any(|c| c.is_uppercase());
    let digit = password.chars().any(|c| c.is_ascii_digit());
    let symbol = password
        .chars()
        .any(|c| !c.is_alphanumeric() && !c.is_whitespace());
    [lower, upper, digit, symbol].iter().filter(|b| **b).count()
}

/// Validate registration fields; returns the trimmed command
pub fn validate_registration(input: RegisterCommand) -> DomainResult<RegisterCommand> {
    let mut v = Validator::new();

    let name = input.name.trim().to_string();
    if name.is_empty() {
        v.push("name", "is required");
    } else if !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        v.push("name", "must contain only letters and numbers");
    } else if !(3..=30).contains(&name.len()) {
        v.push("name", "must be between 3 and 30 characters");
    }

    let email = input.email.trim().to_string();
    if email.is_empty() {
        v.push("email", "is required");
    } else if !EMAIL.is_match(&email) {
        v.push("email", "must be a valid email address");
    }

    let password = input.password;
    let len = password.chars().count();
    if !(10..=30).contains(&len) {
        v.push("password", "must be between 10 and 30 characters");
    } else if password_classes(&password) < 2 {
        v.push(
            "password",
            "must mix at least two of lowercase, uppercase, digits and symbols",
        );
    }

    v.finish(RegisterCommand {
        name,
        email,
        password,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::profile::{AddressInput, SocialInput};
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap())
    }

    fn fields(err: DomainError) -> Vec<String> {
        match err {
            DomainError::Validation(errors) => errors.into_iter().map(|e| e.field).collect(),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    fn daisy() -> AnimalInput {
        AnimalInput {
            name: Some("Daisy".to_string()),
            sex: Some("0,1".to_string()),
            race: Some("Rex".to_string()),
            color: Some("Castor".to_string()),
            tattoo: Some(TattooInput {
                right: Some("AB12".to_string()),
                left: Some(345),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_animal_produces_typed_patch() {
        let patch = validate_animal(daisy(), ValidationMode::Create).unwrap();
        assert_eq!(patch.name.as_deref(), Some("Daisy"));
        assert_eq!(patch.sex, Some(Sex::Female));
        assert_eq!(
            patch.tattoo,
            Some(Tattoo {
                right: "AB12".to_string(),
                left: 345
            })
        );
    }

    #[test]
    fn test_create_requires_name_and_sex() {
        let err = validate_animal(AnimalInput::default(), ValidationMode::Create).unwrap_err();
        assert_eq!(fields(err), vec!["name", "sex"]);
    }

    #[test]
    fn test_update_accepts_empty_patch() {
        let patch = validate_animal(AnimalInput::default(), ValidationMode::Update).unwrap();
        assert_eq!(patch, AnimalPatch::default());
    }

    #[test]
    fn test_animal_errors_are_collected() {
        let input = AnimalInput {
            name: Some("Al".to_string()),
            sex: Some("1,1".to_string()),
            race: Some("R".to_string()),
            tattoo: Some(TattooInput {
                right: Some("ab12".to_string()),
                left: Some(100_000),
            }),
            ..Default::default()
        };
        let err = validate_animal(input, ValidationMode::Create).unwrap_err();
        assert_eq!(
            fields(err),
            vec!["name", "sex", "race", "tattoo.right", "tattoo.left"]
        );
    }

    #[test]
    fn test_tattoo_right_patterns() {
        for ok in ["A1", "AB123", "ABJ1", "AJ99"] {
            assert!(TATTOO_RIGHT.is_match(ok), "{} should match", ok);
        }
        for bad in ["ABC1", "AB1234", "J", "AB", "1AB"] {
            assert!(!TATTOO_RIGHT.is_match(bad), "{} should not match", bad);
        }
    }

    #[test]
    fn test_partial_tattoo_is_rejected() {
        let mut input = daisy();
        input.tattoo = Some(TattooInput {
            right: Some("AB12".to_string()),
            left: None,
        });
        let err = validate_animal(input, ValidationMode::Create).unwrap_err();
        assert_eq!(fields(err), vec!["tattoo.left"]);
    }

    #[test]
    fn test_death_before_birth_is_rejected() {
        let mut input = daisy();
        input.date_of_birth = date(2024, 3, 1);
        input.date_of_death = date(2024, 2, 1);
        let err = validate_animal(input, ValidationMode::Create).unwrap_err();
        assert_eq!(fields(err), vec!["dateOfDeath"]);
    }

    #[test]
    fn test_slaughter_before_birth_without_death_is_rejected() {
        let err = validate_animal_dates(date(2024, 3, 1), None, date(2024, 1, 1)).unwrap_err();
        assert_eq!(fields(err), vec!["dateOfSlaughter"]);
        assert!(validate_animal_dates(date(2024, 3, 1), date(2024, 3, 1), date(2024, 3, 2)).is_ok());
    }

    #[test]
    fn test_profile_create_requires_handle() {
        let err = validate_profile(ProfileInput::default(), ValidationMode::Create).unwrap_err();
        assert_eq!(fields(err), vec!["handle"]);
        assert!(validate_profile(ProfileInput::default(), ValidationMode::Update).is_ok());
    }

    #[test]
    fn test_profile_field_rules() {
        let input = ProfileInput {
            handle: Some("rexbreeder".to_string()),
            gender: Some("other".to_string()),
            country: Some("D".to_string()),
            address: Some(AddressInput {
                zip: Some(0),
                ..Default::default()
            }),
            social: Some(SocialInput {
                telephone: Some("call me".to_string()),
                website: Some("example.com".to_string()),
                facebook: Some("https://facebook.com/rex".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = validate_profile(input, ValidationMode::Create).unwrap_err();
        assert_eq!(
            fields(err),
            vec![
                "gender",
                "country",
                "address.zip",
                "social.telephone",
                "social.website"
            ]
        );
    }

    #[test]
    fn test_profile_phone_formats() {
        let input = ProfileInput {
            handle: Some("rexbreeder".to_string()),
            social: Some(SocialInput {
                telephone: Some("+49 (0) 30-123.456".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let patch = validate_profile(input, ValidationMode::Create).unwrap();
        assert_eq!(patch.telephone.as_deref(), Some("+49 (0) 30-123.456"));
    }

    #[test]
    fn test_breeding_event_rules() {
        let event = validate_breeding_event(RecordBreedingCommand {
            buck_id: Some("buck-1".to_string()),
            date_of_mating: date(2024, 1, 1),
            date_of_remating: date(2024, 1, 2),
            date_of_kindle: date(2024, 2, 1),
            litter_size: Some(8),
        })
        .unwrap();
        assert_eq!(event.litter_size, 8);
        assert_eq!(event.buck_id, "buck-1");

        let err = validate_breeding_event(RecordBreedingCommand {
            buck_id: None,
            date_of_mating: date(2024, 1, 10),
            date_of_remating: date(2024, 1, 2),
            date_of_kindle: date(2024, 1, 9),
            litter_size: Some(21),
        })
        .unwrap_err();
        assert_eq!(
            fields(err),
            vec!["buck", "dateOfRemating", "dateOfKindle", "litterSize"]
        );
    }

    #[test]
    fn test_weight_bounds() {
        let ok = validate_weight(RecordWeightCommand {
            timestamp: date(2024, 5, 5),
            weight: Some(20.0),
        });
        assert!(ok.is_ok());

        let err = validate_weight(RecordWeightCommand {
            timestamp: None,
            weight: Some(-0.1),
        })
        .unwrap_err();
        assert_eq!(fields(err), vec!["timestamp", "weight"]);
    }

    #[test]
    fn test_registration_rules() {
        let ok = validate_registration(RegisterCommand {
            name: " rexbreeder ".to_string(),
            email: "rex@example.com".to_string(),
            password: "longpassword1".to_string(),
        })
        .unwrap();
        assert_eq!(ok.name, "rexbreeder");

        let err = validate_registration(RegisterCommand {
            name: "rex breeder".to_string(),
            email: "rex@localhost".to_string(),
            password: "alllowercase".to_string(),
        })
        .unwrap_err();
        assert_eq!(fields(err), vec!["name", "email", "password"]);
    }
}
