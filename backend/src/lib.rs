//! # Stud Book Backend
//!
//! Record keeping for livestock breeding: accounts, owner profiles, animal
//! pedigrees, breeding ledgers and weight series, served as a JSON API.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST handlers, bearer auth, DTO mappers)
//!     ↓
//! Domain Layer (services, validation, models)
//!     ↓
//! Storage Layer (sqlx / SQLite repositories)
//! ```
//!
//! `initialize_backend` wires the services onto one database connection and
//! `create_router` mounts every API module under `/api`.

pub mod auth;
pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth::TokenService;
use crate::config::ServerConfig;
use crate::domain::{AnimalService, LitterService, ProfileService, UserService, WeightService};
use crate::io::rest::{animal_apis, auth_apis, litter_apis, profile_apis, user_apis, weight_apis};
use crate::storage::DbConnection;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService<DbConnection>,
    pub profile_service: ProfileService<DbConnection>,
    pub animal_service: AnimalService<DbConnection>,
    pub litter_service: LitterService<DbConnection>,
    pub weight_service: WeightService<DbConnection>,
    pub token_service: TokenService,
}

impl AppState {
    pub fn new(db: &DbConnection, config: &ServerConfig) -> Self {
        Self {
            user_service: UserService::new(db),
            profile_service: ProfileService::new(db),
            animal_service: AnimalService::new(db)
                .with_update_ownership(config.enforce_update_ownership),
            litter_service: LitterService::new(db),
            weight_service: WeightService::new(db),
            token_service: TokenService::new(&config.jwt_secret, config.token_ttl_secs),
        }
    }

    /// State over a fresh in-memory database
    #[cfg(test)]
    pub async fn for_tests() -> Self {
        let db = DbConnection::init_test()
            .await
            .expect("Failed to create test database");
        Self::new(&db, &ServerConfig::for_tests())
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &ServerConfig) -> Result<AppState> {
    info!("Setting up database at {}", config.database_url);
    let db = DbConnection::new(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;

    info!("Setting up application state");
    if config.enforce_update_ownership {
        info!("Animal updates are restricted to their owners");
    }
    Ok(AppState::new(&db, config))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, cors_origin: Option<&str>) -> Result<Router> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);
    let cors = match cors_origin {
        Some(origin) => cors.allow_origin(
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {}", origin))?,
        ),
        None => cors.allow_origin(Any),
    };

    let animal_routes = animal_apis::router()
        .merge(weight_apis::router())
        .merge(litter_apis::router());

    let api_routes = Router::new()
        .nest("/users", user_apis::router())
        .nest("/auth", auth_apis::router())
        .nest("/profiles", profile_apis::router())
        .nest("/animals", animal_routes);

    Ok(Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state))
}
