//! Month-bucketed weight series.
//!
//! Storage keeps one bucket per animal and calendar month, while clients
//! submit one measurement at a time. [`WeightBucket::record`] reconciles a
//! single write with the batched representation: a day that is already
//! present is overwritten in place, a new day is appended.

use chrono::{DateTime, Datelike, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

pub const MIN_WEIGHT: f64 = 0.0;
pub const MAX_WEIGHT: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    /// Day of month, 1-31
    pub day: u32,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeightBucket {
    pub id: String,
    pub animal_id: String,
    /// First instant of the bucket's month (UTC)
    pub month: DateTime<Utc>,
    /// Sparse entries, unique by day, in no particular order
    pub days: Vec<WeightEntry>,
    /// Optimistic concurrency token, bumped on every stored update
    pub version: i64,
}

/// What a single measurement did to its bucket
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MergeOutcome {
    Appended,
    Overwritten { previous: f64 },
}

impl WeightBucket {
    /// Truncate a timestamp to the first instant of its UTC month
    pub fn month_of(timestamp: &DateTime<Utc>) -> DateTime<Utc> {
        let date = timestamp.date_naive();
        let first = date.with_day(1).unwrap_or(date);
        Utc.from_utc_datetime(&first.and_time(NaiveTime::default()))
    }

    /// Bucket holding a single measurement
    pub fn new(animal_id: &str, timestamp: &DateTime<Utc>, weight: f64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            animal_id: animal_id.to_string(),
            month: Self::month_of(timestamp),
            days: vec![WeightEntry {
                day: timestamp.day(),
                weight,
            }],
            version: 0,
        }
    }

    /// Merge one measurement into the bucket
    pub fn record(&mut self, day: u32, weight: f64) -> MergeOutcome {
        match self.days.iter_mut().find(|entry| entry.day == day) {
            Some(entry) => {
                let previous = entry.weight;
                entry.weight = weight;
                MergeOutcome::Overwritten { previous }
            }
            None => {
                self.days.push(WeightEntry { day, weight });
                MergeOutcome::Appended
            }
        }
    }

    #[cfg(test)]
    pub fn weight_on(&self, day: u32) -> Option<f64> {
        self.days.iter().find(|e| e.day == day).map(|e| e.weight)
    }

    #[cfg(test)]
    pub fn covers(&self, timestamp: &DateTime<Utc>) -> bool {
        Self::month_of(timestamp) == self.month
    }
}
