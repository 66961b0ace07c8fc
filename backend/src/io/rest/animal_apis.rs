//! # REST API for Animals
//!
//! CRUD on pedigree records plus the read-only ancestry tree.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::{info, warn};

use crate::domain::commands::animal::PedigreeQuery as DomainPedigreeQuery;
use crate::io::rest::auth::AuthUser;
use crate::io::rest::error::ApiError;
use crate::io::rest::extract::{ApiJson, ApiQuery};
use crate::io::rest::mappers::AnimalMapper;
use crate::AppState;
use shared::{AnimalRequest, MessageResponse, PedigreeQuery};

/// Create the animal API router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_animals).post(create_animal))
        .route("/user/:user_id", get(list_animals_by_user))
        .route(
            "/:id",
            get(get_animal).put(update_animal).delete(delete_animal),
        )
        .route("/:id/pedigree", get(get_pedigree))
}

/// List every animal
pub async fn list_animals(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    info!("GET /api/animals");

    match state.animal_service.list_animals().await {
        Ok(animals) => (StatusCode::OK, Json(AnimalMapper::to_dto_list(animals))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Create an animal owned by the caller
pub async fn create_animal(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(request): ApiJson<AnimalRequest>,
) -> impl IntoResponse {
    info!("POST /api/animals - user: {}, name: {:?}", auth.user_id, request.name);

    match state
        .animal_service
        .create_animal(AnimalMapper::to_input(request), &auth.user_id)
        .await
    {
        Ok(animal) => (StatusCode::OK, Json(AnimalMapper::to_dto(animal))).into_response(),
        Err(e) => {
            warn!("Failed to create animal: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// List the animals of one user
pub async fn list_animals_by_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/animals/user/{}", user_id);

    match state.animal_service.list_by_user(&user_id).await {
        Ok(animals) => (StatusCode::OK, Json(AnimalMapper::to_dto_list(animals))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn get_animal(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(animal_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/animals/{}", animal_id);

    match state.animal_service.get_animal(&animal_id).await {
        Ok(animal) => (StatusCode::OK, Json(AnimalMapper::to_dto(animal))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Partially update an animal
pub async fn update_animal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(animal_id): Path<String>,
    ApiJson(request): ApiJson<AnimalRequest>,
) -> impl IntoResponse {
    info!("PUT /api/animals/{} - user: {}", animal_id, auth.user_id);

    match state
        .animal_service
        .update_animal(&animal_id, AnimalMapper::to_input(request), &auth.user_id)
        .await
    {
        Ok(animal) => (StatusCode::OK, Json(AnimalMapper::to_dto(animal))).into_response(),
        Err(e) => {
            warn!("Failed to update animal {}: {}", animal_id, e);
            ApiError::from(e).into_response()
        }
    }
}

/// Delete an animal; only its owner may
pub async fn delete_animal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(animal_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/animals/{} - user: {}", animal_id, auth.user_id);

    match state.animal_service.delete_animal(&animal_id, &auth.user_id).await {
        Ok(()) => (StatusCode::OK, Json(MessageResponse::new("Animal removed"))).into_response(),
        Err(e) => {
            warn!("Failed to delete animal {}: {}", animal_id, e);
            ApiError::from(e).into_response()
        }
    }
}

/// Ancestry tree, `?generations=N` deep
pub async fn get_pedigree(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(animal_id): Path<String>,
    ApiQuery(query): ApiQuery<PedigreeQuery>,
) -> impl IntoResponse {
    info!("GET /api/animals/{}/pedigree - generations: {:?}", animal_id, query.generations);

    let query = DomainPedigreeQuery {
        animal_id,
        generations: query.generations,
    };
    match state.animal_service.pedigree(query).await {
        Ok(tree) => (StatusCode::OK, Json(AnimalMapper::to_pedigree_dto(tree))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use crate::io::rest::test_support::{create_animal, register, send, setup_test_app};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    fn daisy() -> serde_json::Value {
        json!({
            "name": "Daisy",
            "sex": "0,1",
            "race": "Rex",
            "color": "Castor",
            "dateOfBirth": "2024-01-15",
            "tattoo": { "right": "AB12", "left": 345 }
        })
    }

    #[tokio::test]
    async fn test_create_get_and_list() {
        let app = setup_test_app().await;
        let token = register(&app, "rexbreeder").await;
        let id = create_animal(&app, &token, daisy()).await;

        let (status, animal) =
            send(&app, Method::GET, &format!("/api/animals/{}", id), Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(animal["name"], "Daisy");
        assert_eq!(animal["sex"], "0,1");
        assert_eq!(animal["tattoo"]["left"], 345);
        assert_eq!(animal["dateOfBirth"], "2024-01-15T00:00:00Z");

        let user_id = animal["user"].as_str().unwrap();
        let (status, list) = send(
            &app,
            Method::GET,
            &format!("/api/animals/user/{}", user_id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);

        let (status, list) = send(&app, Method::GET, "/api/animals/user/nobody", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(list.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_requires_token() {
        let app = setup_test_app().await;
        let (status, _) = send(&app, Method::POST, "/api/animals", None, Some(daisy())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_duplicate_tattoo_is_conflict() {
        let app = setup_test_app().await;
        let token = register(&app, "rexbreeder").await;
        create_animal(&app, &token, daisy()).await;

        let mut copy = daisy();
        copy["name"] = json!("Dolly");
        let (status, body) = send(&app, Method::POST, "/api/animals", Some(&token), Some(copy)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "An animal with that tattoo already exists");
    }

    #[tokio::test]
    async fn test_bad_chronology_is_rejected() {
        let app = setup_test_app().await;
        let token = register(&app, "rexbreeder").await;
        let mut body = daisy();
        body["dateOfDeath"] = json!("2023-12-31");

        let (status, errors) = send(&app, Method::POST, "/api/animals", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(errors[0]["field"], "dateOfDeath");
    }

    #[tokio::test]
    async fn test_update_and_foreign_delete() {
        let app = setup_test_app().await;
        let owner = register(&app, "rexbreeder").await;
        let stranger = register(&app, "lopbreeder").await;
        let id = create_animal(&app, &owner, daisy()).await;
        let uri = format!("/api/animals/{}", id);

        let (status, updated) = send(
            &app,
            Method::PUT,
            &uri,
            Some(&owner),
            Some(json!({ "color": "Chinchilla" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["color"], "Chinchilla");
        assert_eq!(updated["name"], "Daisy");

        let (status, body) = send(&app, Method::DELETE, &uri, Some(&stranger), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "User not authorized");
        let (status, _) = send(&app, Method::GET, &uri, Some(&owner), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, Method::DELETE, &uri, Some(&owner), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, Method::GET, &uri, Some(&owner), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_pedigree_endpoint() {
        let app = setup_test_app().await;
        let token = register(&app, "rexbreeder").await;
        let mother = create_animal(&app, &token, daisy()).await;
        let kit = create_animal(
            &app,
            &token,
            json!({ "name": "Kit", "sex": "1,0", "mother": mother, "father": "unknown" }),
        )
        .await;

        let (status, tree) = send(
            &app,
            Method::GET,
            &format!("/api/animals/{}/pedigree?generations=2", kit),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(tree["name"], "Kit");
        assert_eq!(tree["mother"]["name"], "Daisy");
        assert!(tree["father"].is_null());

        let (status, _) = send(&app, Method::GET, "/api/animals/nobody/pedigree", Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
