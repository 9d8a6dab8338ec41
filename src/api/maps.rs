//! Map collection and map item handlers.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::extract::JsonBody;
use crate::api::negotiate::Negotiated;
use crate::api::{urls, views};
use crate::http::server::AppState;

/// GET /api/maps/
pub async fn list_maps(
    State(state): State<AppState>,
    Negotiated(media): Negotiated,
) -> Result<Response, ApiError> {
    views::cached(&state.cache, media, &urls::map_collection(), || {
        Ok(views::render_collection(media, &state.store.list_maps()))
    })
}

/// POST /api/maps/
pub async fn create_map(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Response, ApiError> {
    let payload = state.validators.map(body)?;
    let map = state.store.create_map(payload)?;
    state.cache.invalidate_collection();
    tracing::info!(map = %map.slug, "Map created");

    let location = urls::map_item(&map.slug);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)]).into_response())
}

/// GET /api/maps/{map}/
pub async fn get_map(
    State(state): State<AppState>,
    Negotiated(media): Negotiated,
    Path(map): Path<String>,
) -> Result<Response, ApiError> {
    views::cached(&state.cache, media, &urls::map_item(&map), || {
        Ok(views::render_map(media, &state.store.get_map(&map)?))
    })
}

/// PUT /api/maps/{map}/
pub async fn update_map(
    State(state): State<AppState>,
    Path(map): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<StatusCode, ApiError> {
    let payload = state.validators.map(body)?;
    let updated = state.store.update_map(&map, payload)?;
    state.cache.invalidate_map(&map);
    if updated.slug != map {
        state.cache.invalidate_map(&updated.slug);
    }
    tracing::info!(map = %map, slug = %updated.slug, "Map updated");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/maps/{map}/
pub async fn delete_map(
    State(state): State<AppState>,
    Path(map): Path<String>,
) -> Result<StatusCode, ApiError> {
    let removed = state.store.delete_map(&map)?;
    state.cache.invalidate_map(&map);
    tracing::info!(
        map = %map,
        observers = removed.observers.len(),
        obstacles = removed.obstacles.len(),
        "Map deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}
