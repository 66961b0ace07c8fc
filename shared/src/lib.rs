use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Users & authentication
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Alphanumeric user name (3-30 characters)
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Signed bearer token returned by register and login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// A user as exposed over the API; never carries the credential hash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Generic `{message}` body used for errors and simple acknowledgements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// One field-level validation failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    /// Dotted path of the offending field, e.g. `tattoo.right`
    pub field: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Social {
    pub telephone: Option<String>,
    pub website: Option<String>,
    pub facebook: Option<String>,
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub instagram: Option<String>,
}

/// Body of POST and PUT /api/profiles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileRequest {
    pub handle: Option<String>,
    /// One of `male`, `female`, `diverse`
    pub gender: Option<String>,
    pub country: Option<String>,
    pub club: Option<String>,
    pub address: Option<Address>,
    pub social: Option<Social>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    /// Owning user ID
    pub user: String,
    /// Owning user's name, filled in on reads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub handle: String,
    pub gender: Option<String>,
    pub country: Option<String>,
    pub club: Option<String>,
    pub address: Address,
    pub social: Social,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Animals
// ---------------------------------------------------------------------------

/// Tattoo as submitted by a client; both halves are checked by the server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TattooInput {
    pub right: Option<String>,
    pub left: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tattoo {
    pub right: String,
    pub left: u32,
}

/// Body of POST /api/animals and PUT /api/animals/:id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalRequest {
    pub name: Option<String>,
    /// `"0,1"` for a female, `"1,0"` for a male
    pub sex: Option<String>,
    pub race: Option<String>,
    pub color: Option<String>,
    #[serde(default, with = "flexible_date::option")]
    pub date_of_birth: Option<DateTime<Utc>>,
    #[serde(default, with = "flexible_date::option")]
    pub date_of_death: Option<DateTime<Utc>>,
    #[serde(default, with = "flexible_date::option")]
    pub date_of_slaughter: Option<DateTime<Utc>>,
    /// Mother animal ID
    pub mother: Option<String>,
    /// Father animal ID
    pub father: Option<String>,
    pub tattoo: Option<TattooInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animal {
    pub id: String,
    /// Owning user ID
    pub user: String,
    pub name: String,
    pub sex: String,
    pub race: Option<String>,
    pub color: Option<String>,
    pub date_of_birth: Option<DateTime<Utc>>,
    pub date_of_death: Option<DateTime<Utc>>,
    pub date_of_slaughter: Option<DateTime<Utc>>,
    pub mother: Option<String>,
    pub father: Option<String>,
    pub tattoo: Option<Tattoo>,
    pub created_at: DateTime<Utc>,
}

/// One node of an ancestry tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PedigreeNode {
    pub id: String,
    pub name: String,
    pub sex: String,
    pub tattoo: Option<Tattoo>,
    pub mother: Option<Box<PedigreeNode>>,
    pub father: Option<Box<PedigreeNode>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PedigreeQuery {
    pub generations: Option<u32>,
}

// ---------------------------------------------------------------------------
// Breeding ledger
// ---------------------------------------------------------------------------

/// Body of POST /api/animals/:id/litters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LitterEventRequest {
    /// Buck (male animal) ID
    pub buck: Option<String>,
    #[serde(default, with = "flexible_date::option")]
    pub date_of_mating: Option<DateTime<Utc>>,
    #[serde(default, with = "flexible_date::option")]
    pub date_of_remating: Option<DateTime<Utc>>,
    /// Older clients send this as `dateOfLitter`
    #[serde(default, with = "flexible_date::option", alias = "dateOfLitter")]
    pub date_of_kindle: Option<DateTime<Utc>>,
    pub litter_size: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LitterEvent {
    pub id: String,
    pub buck: String,
    pub date_of_mating: DateTime<Utc>,
    pub date_of_remating: DateTime<Utc>,
    pub date_of_kindle: DateTime<Utc>,
    pub litter_size: u8,
}

/// The breeding ledger of one doe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Litter {
    pub id: String,
    /// Doe (female animal) ID
    pub doe: String,
    #[serde(rename = "litters")]
    pub events: Vec<LitterEvent>,
}

// ---------------------------------------------------------------------------
// Weight series
// ---------------------------------------------------------------------------

/// Body of POST /api/animals/:id/weight
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightRequest {
    #[serde(default, with = "flexible_date::option")]
    pub timestamp: Option<DateTime<Utc>>,
    pub weight: Option<f64>,
}

/// Query string of GET /api/animals/:id/weight
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightRangeQuery {
    #[serde(default, with = "flexible_date::option")]
    pub from: Option<DateTime<Utc>>,
    #[serde(default, with = "flexible_date::option")]
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    /// Day of month, 1-31
    pub day: u32,
    pub weight: f64,
}

/// All measurements of one animal within one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightBucket {
    pub id: String,
    pub animal: String,
    /// First instant (UTC) of the bucket's month
    pub timestamp_month: DateTime<Utc>,
    pub days: Vec<WeightEntry>,
}

/// Date handling for request bodies.
///
/// Accepts full RFC 3339 timestamps as well as plain `YYYY-MM-DD` dates,
/// which are read as midnight UTC.
pub mod flexible_date {
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};

    pub fn parse(value: &str) -> Result<DateTime<Utc>, String> {
        let value = value.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Ok(dt.with_timezone(&Utc));
        }
        let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map_err(|_| format!("invalid date: {}", value))?;
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| format!("invalid date: {}", value))?;
        Ok(Utc.from_utc_datetime(&midnight))
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            raw.map(|s| super::parse(&s).map_err(de::Error::custom))
                .transpose()
        }
    }
}
