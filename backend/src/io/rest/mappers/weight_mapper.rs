use crate::domain::commands::weight::{RecordWeightCommand, WeightRangeQuery as DomainRangeQuery};
use crate::domain::models::weight::WeightBucket as DomainBucket;
use shared::{WeightBucket as SharedBucket, WeightEntry, WeightRangeQuery, WeightRequest};

/// Mapper between weight DTOs and domain types.
pub struct WeightMapper;

impl WeightMapper {
    pub fn to_command(dto: WeightRequest) -> RecordWeightCommand {
        RecordWeightCommand {
            timestamp: dto.timestamp,
            weight: dto.weight,
        }
    }

    pub fn to_range_query(dto: WeightRangeQuery) -> DomainRangeQuery {
        DomainRangeQuery {
            from: dto.from,
            to: dto.to,
        }
    }

    /// Entries are returned ordered by day
    pub fn to_dto(domain: DomainBucket) -> SharedBucket {
        let mut days: Vec<WeightEntry> = domain
            .days
            .into_iter()
            .map(|e| WeightEntry {
                day: e.day,
                weight: e.weight,
            })
            .collect();
        days.sort_by_key(|e| e.day);

        SharedBucket {
            id: domain.id,
            animal: domain.animal_id,
            timestamp_month: domain.month,
            days,
        }
    }

    pub fn to_dto_list(domain: Vec<DomainBucket>) -> Vec<SharedBucket> {
        domain.into_iter().map(Self::to_dto).collect()
    }
}
