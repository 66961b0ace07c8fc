use chrono::{DateTime, Utc};

pub const MAX_LITTER_SIZE: u8 = 20;

/// One mating and its outcome
#[derive(Debug, Clone, PartialEq)]
pub struct BreedingEvent {
    pub id: String,
    pub buck_id: String,
    pub date_of_mating: DateTime<Utc>,
    pub date_of_remating: DateTime<Utc>,
    pub date_of_kindle: DateTime<Utc>,
    pub litter_size: u8,
}

impl BreedingEvent {
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// The breeding ledger of a doe. Events are only ever appended.
#[derive(Debug, Clone, PartialEq)]
pub struct Litter {
    pub id: String,
    pub doe_id: String,
    pub events: Vec<BreedingEvent>,
    pub created_at: DateTime<Utc>,
}

impl Litter {
    /// Start a ledger holding exactly one event
    pub fn open(doe_id: &str, first_event: BreedingEvent, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            doe_id: doe_id.to_string(),
            events: vec![first_event],
            created_at: now,
        }
    }

    #[cfg(test)]
    pub fn total_kits(&self) -> u32 {
        self.events.iter().map(|e| u32::from(e.litter_size)).sum()
    }
}
