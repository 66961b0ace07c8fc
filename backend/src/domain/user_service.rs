//! Account registration, login and removal.

use chrono::Utc;
use tracing::{info, warn};

use crate::auth::{hash_password_blocking, verify_password_blocking};
use crate::domain::commands::user::{LoginCommand, RegisterCommand};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::user::User;
use crate::domain::validation::validate_registration;
use crate::storage::traits::{Connection, ProfileStorage, UserStorage};

#[derive(Clone)]
pub struct UserService<C: Connection> {
    user_repository: C::UserRepository,
    profile_repository: C::ProfileRepository,
}

impl<C: Connection> UserService<C> {
    pub fn new(connection: &C) -> Self {
        Self {
            user_repository: connection.create_user_repository(),
            profile_repository: connection.create_profile_repository(),
        }
    }

    /// Create an account; email and name must both be unused
    pub async fn register(&self, command: RegisterCommand) -> DomainResult<User> {
        let command = validate_registration(command)?;
        info!("Registering user: {}", command.name);

        if self.user_repository.find_by_email(&command.email).await?.is_some() {
            return Err(DomainError::conflict("User with that email already exists"));
        }
        if self.user_repository.find_by_name(&command.name).await?.is_some() {
            return Err(DomainError::conflict("User with that name already exists"));
        }

        let password_hash = hash_password_blocking(command.password).await?;
        let user = User {
            id: User::generate_id(),
            name: command.name,
            email: command.email,
            password_hash,
            created_at: Utc::now(),
        };
        self.user_repository.store_user(&user).await?;

        info!("Registered user {} with ID: {}", user.name, user.id);
        Ok(user)
    }

    /// Check credentials. Unknown email and wrong password look the same.
    pub async fn login(&self, command: LoginCommand) -> DomainResult<User> {
        let user = match self.user_repository.find_by_email(command.email.trim()).await? {
            Some(user) => user,
            None => {
                warn!("Login attempt for unknown email");
                return Err(DomainError::InvalidCredentials);
            }
        };

        let matches =
            verify_password_blocking(command.password, user.password_hash.clone()).await?;
        if !matches {
            warn!("Failed login for user {}", user.id);
            return Err(DomainError::InvalidCredentials);
        }

        info!("User {} logged in", user.id);
        Ok(user)
    }

    pub async fn current_user(&self, user_id: &str) -> DomainResult<User> {
        self.user_repository
            .get_user(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))
    }

    /// Remove the profile, then the account. Animals are left in place.
    pub async fn delete_user(&self, user_id: &str) -> DomainResult<()> {
        info!("Deleting user: {}", user_id);

        self.profile_repository.delete_by_user(user_id).await?;
        if !self.user_repository.delete_user(user_id).await? {
            warn!("User {} was already gone", user_id);
        }
        Ok(())
    }
}
