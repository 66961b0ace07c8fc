use crate::domain::commands::litter::RecordBreedingCommand;
use crate::domain::models::litter::{BreedingEvent, Litter as DomainLitter};
use shared::{Litter as SharedLitter, LitterEvent, LitterEventRequest};

/// Mapper between breeding ledger DTOs and domain types.
pub struct LitterMapper;

impl LitterMapper {
    pub fn to_command(dto: LitterEventRequest) -> RecordBreedingCommand {
        RecordBreedingCommand {
            buck_id: dto.buck,
            date_of_mating: dto.date_of_mating,
            date_of_remating: dto.date_of_remating,
            date_of_kindle: dto.date_of_kindle,
            litter_size: dto.litter_size,
        }
    }

    fn event_dto(domain: BreedingEvent) -> LitterEvent {
        LitterEvent {
            id: domain.id,
            buck: domain.buck_id,
            date_of_mating: domain.date_of_mating,
            date_of_remating: domain.date_of_remating,
            date_of_kindle: domain.date_of_kindle,
            litter_size: domain.litter_size,
        }
    }

    pub fn to_dto(domain: DomainLitter) -> SharedLitter {
        SharedLitter {
            id: domain.id,
            doe: domain.doe_id,
            events: domain.events.into_iter().map(Self::event_dto).collect(),
        }
    }
}
