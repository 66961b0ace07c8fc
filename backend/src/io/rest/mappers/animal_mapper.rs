use crate::domain::commands::animal::{AnimalInput, TattooInput};
use crate::domain::models::animal::{
    Animal as DomainAnimal, PedigreeNode as DomainPedigreeNode, Tattoo as DomainTattoo,
};
use shared::{
    Animal as SharedAnimal, AnimalRequest, PedigreeNode as SharedPedigreeNode,
    Tattoo as SharedTattoo,
};

/// Mapper between animal DTOs and domain types.
pub struct AnimalMapper;

impl AnimalMapper {
    pub fn to_input(dto: AnimalRequest) -> AnimalInput {
        AnimalInput {
            name: dto.name,
            sex: dto.sex,
            race: dto.race,
            color: dto.color,
            date_of_birth: dto.date_of_birth,
            date_of_death: dto.date_of_death,
            date_of_slaughter: dto.date_of_slaughter,
            mother_id: dto.mother,
            father_id: dto.father,
            tattoo: dto.tattoo.map(|t| TattooInput {
                right: t.right,
                left: t.left,
            }),
        }
    }

    fn tattoo_dto(domain: DomainTattoo) -> SharedTattoo {
        SharedTattoo {
            right: domain.right,
            left: domain.left,
        }
    }

    pub fn to_dto(domain: DomainAnimal) -> SharedAnimal {
        SharedAnimal {
            id: domain.id,
            user: domain.user_id,
            name: domain.name,
            sex: domain.sex.token().to_string(),
            race: domain.race,
            color: domain.color,
            date_of_birth: domain.date_of_birth,
            date_of_death: domain.date_of_death,
            date_of_slaughter: domain.date_of_slaughter,
            mother: domain.mother_id,
            father: domain.father_id,
            tattoo: domain.tattoo.map(Self::tattoo_dto),
            created_at: domain.created_at,
        }
    }

    pub fn to_dto_list(domain: Vec<DomainAnimal>) -> Vec<SharedAnimal> {
        domain.into_iter().map(Self::to_dto).collect()
    }

    pub fn to_pedigree_dto(domain: DomainPedigreeNode) -> SharedPedigreeNode {
        SharedPedigreeNode {
            id: domain.id,
            name: domain.name,
            sex: domain.sex.token().to_string(),
            tattoo: domain.tattoo.map(Self::tattoo_dto),
            mother: domain.mother.map(|m| Box::new(Self::to_pedigree_dto(*m))),
            father: domain.father.map(|f| Box::new(Self::to_pedigree_dto(*f))),
        }
    }
}
