//! The pedigree entity.
//!
//! Animals form an arena addressed by id: `mother_id` and `father_id` are
//! plain optional identifiers rather than embedded records, so the graph
//! can reference missing animals or even loop back on itself without any
//! ownership cycle in memory.

use chrono::{DateTime, Utc};

/// Sex as stored and transported: an ordered pair token where `"0,1"`
/// marks a female and `"1,0"` a male.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    pub const FEMALE_TOKEN: &'static str = "0,1";
    pub const MALE_TOKEN: &'static str = "1,0";

    pub fn token(&self) -> &'static str {
        match self {
            Sex::Female => Self::FEMALE_TOKEN,
            Sex::Male => Self::MALE_TOKEN,
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim() {
            Self::FEMALE_TOKEN => Some(Sex::Female),
            Self::MALE_TOKEN => Some(Sex::Male),
            _ => None,
        }
    }
}

/// Physical identification mark: right ear code and left ear number
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tattoo {
    pub right: String,
    pub left: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Animal {
    pub id: String,
    /// Owning user
    pub user_id: String,
    pub name: String,
    pub sex: Sex,
    pub race: Option<String>,
    pub color: Option<String>,
    pub date_of_birth: Option<DateTime<Utc>>,
    pub date_of_death: Option<DateTime<Utc>>,
    pub date_of_slaughter: Option<DateTime<Utc>>,
    pub mother_id: Option<String>,
    pub father_id: Option<String>,
    pub tattoo: Option<Tattoo>,
    pub created_at: DateTime<Utc>,
}

impl Animal {
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    pub fn is_female(&self) -> bool {
        self.sex == Sex::Female
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

/// Ancestry tree rooted at one animal
#[derive(Debug, Clone, PartialEq)]
pub struct PedigreeNode {
    pub id: String,
    pub name: String,
    pub sex: Sex,
    pub tattoo: Option<Tattoo>,
    pub mother: Option<Box<PedigreeNode>>,
    pub father: Option<Box<PedigreeNode>>,
}

impl PedigreeNode {
    pub fn leaf(animal: &Animal) -> Self {
        Self {
            id: animal.id.clone(),
            name: animal.name.clone(),
            sex: animal.sex,
            tattoo: animal.tattoo.clone(),
            mother: None,
            father: None,
        }
    }

    /// Number of generations in the tree, counting the root
    pub fn depth(&self) -> usize {
        let mother = self.mother.as_ref().map_or(0, |m| m.depth());
        let father = self.father.as_ref().map_or(0, |f| f.depth());
        1 + mother.max(father)
    }
}
