use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Diverse,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Diverse => "diverse",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "diverse" => Ok(Gender::Diverse),
            other => Err(format!("Invalid gender: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Social {
    pub telephone: Option<String>,
    pub website: Option<String>,
    pub facebook: Option<String>,
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub instagram: Option<String>,
}

/// Public owner metadata, at most one per user
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: String,
    pub user_id: String,
    pub handle: String,
    pub gender: Option<Gender>,
    pub country: Option<String>,
    pub club: Option<String>,
    pub address: Address,
    pub social: Social,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// A profile as read back from storage, joined with its owner's name
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileWithOwner {
    pub profile: Profile,
    pub user_name: Option<String>,
}
