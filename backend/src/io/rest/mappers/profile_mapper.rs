use crate::domain::commands::profile::{AddressInput, ProfileInput, SocialInput};
use crate::domain::models::profile::ProfileWithOwner;
use crate::domain::models::profile::Profile as DomainProfile;
use shared::{Address, Profile as SharedProfile, ProfileRequest, Social};

/// Mapper between profile DTOs and domain types.
pub struct ProfileMapper;

impl ProfileMapper {
    pub fn to_input(dto: ProfileRequest) -> ProfileInput {
        ProfileInput {
            handle: dto.handle,
            gender: dto.gender,
            country: dto.country,
            club: dto.club,
            address: dto.address.map(|a| AddressInput {
                street: a.street,
                city: a.city,
                state: a.state,
                zip: a.zip,
            }),
            social: dto.social.map(|s| SocialInput {
                telephone: s.telephone,
                website: s.website,
                facebook: s.facebook,
                youtube: s.youtube,
                twitter: s.twitter,
                instagram: s.instagram,
            }),
        }
    }

    pub fn to_dto(domain: DomainProfile, user_name: Option<String>) -> SharedProfile {
        SharedProfile {
            id: domain.id,
            user: domain.user_id,
            user_name,
            handle: domain.handle,
            gender: domain.gender.map(|g| g.to_string()),
            country: domain.country,
            club: domain.club,
            address: Address {
                street: domain.address.street,
                city: domain.address.city,
                state: domain.address.state,
                zip: domain.address.zip.map(i64::from),
            },
            social: Social {
                telephone: domain.social.telephone,
                website: domain.social.website,
                facebook: domain.social.facebook,
                youtube: domain.social.youtube,
                twitter: domain.social.twitter,
                instagram: domain.social.instagram,
            },
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }

    pub fn to_owned_dto(domain: ProfileWithOwner) -> SharedProfile {
        Self::to_dto(domain.profile, domain.user_name)
    }

    pub fn to_dto_list(domain: Vec<ProfileWithOwner>) -> Vec<SharedProfile> {
        domain.into_iter().map(Self::to_owned_dto).collect()
    }
}
