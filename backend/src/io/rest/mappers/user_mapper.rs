use crate::domain::commands::user::{LoginCommand, RegisterCommand};
use crate::domain::models::user::User as DomainUser;
use shared::{LoginRequest, RegisterRequest, User as SharedUser};

/// Mapper between user DTOs and domain types.
pub struct UserMapper;

impl UserMapper {
    pub fn to_register_command(dto: RegisterRequest) -> RegisterCommand {
        RegisterCommand {
            name: dto.name,
            email: dto.email,
            password: dto.password,
        }
    }

    pub fn to_login_command(dto: LoginRequest) -> LoginCommand {
        LoginCommand {
            email: dto.email,
            password: dto.password,
        }
    }

    /// The credential hash is dropped here and never leaves the domain
    pub fn to_dto(domain: DomainUser) -> SharedUser {
        SharedUser {
            id: domain.id,
            name: domain.name,
            email: domain.email,
            created_at: domain.created_at,
        }
    }
}
