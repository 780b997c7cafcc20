//! Entity endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use relgraph_core::{
    EntityAssociation, EntityId, EntitySummary, EntityWithAssociations, Label, Message, NewEntity,
};

use crate::auth::RequireBearer;
use crate::error::ApiError;
use crate::state::AppState;

pub const CREATED_MESSAGE: &str = "Entity and relationships added successfully";
pub const DELETED_MESSAGE: &str = "Entity and relationships deleted successfully";

/// Build the API router.
///
/// `cors_origins` lists the browser origins allowed to call the API; invalid
/// entries are skipped with a warning.
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/entities", get(list_entities).post(create_entity))
        .route(
            "/entities_with_associations",
            get(list_entities_with_associations),
        )
        .route("/entities/:id", get(get_entity).delete(delete_entity))
        .route("/health", get(health))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

// ── Reads ────────────────────────────────────────────────────────

async fn list_entities(
    State(state): State<AppState>,
) -> Result<Json<Vec<EntitySummary>>, ApiError> {
    Ok(Json(state.store.list_entities().await?))
}

async fn list_entities_with_associations(
    State(state): State<AppState>,
) -> Result<Json<Vec<EntityWithAssociations>>, ApiError> {
    Ok(Json(state.store.list_entities_with_associations().await?))
}

/// An empty array covers both "no associations" and "no such entity".
async fn get_entity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<EntityAssociation>>, ApiError> {
    let id = parse_id(&id);
    Ok(Json(state.store.fetch_entity_with_associations(&id).await?))
}

// ── Writes ───────────────────────────────────────────────────────

async fn create_entity(
    _auth: RequireBearer,
    State(state): State<AppState>,
    body: Result<Json<NewEntity>, JsonRejection>,
) -> Result<Json<Message>, ApiError> {
    let Json(entity) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let label = Label::parse_allowed(&entity.label, state.allowed_labels())?;
    entity.validate()?;

    state.store.create_entity(&label, &entity).await?;
    Ok(Json(Message::new(CREATED_MESSAGE)))
}

async fn delete_entity(
    _auth: RequireBearer,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Message>, ApiError> {
    let id = parse_id(&id);
    state.store.remove_entity(&id).await?;
    Ok(Json(Message::new(DELETED_MESSAGE)))
}

// ── Health ───────────────────────────────────────────────────────

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "UP" }))),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "DOWN" })),
            )
        }
    }
}

fn parse_id(raw: &str) -> EntityId {
    match raw.parse() {
        Ok(id) => id,
        Err(never) => match never {},
    }
}
