//! Obstacle handlers. Obstacles have no readable representation of their
//! own; they show up inside the map item.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::extract::JsonBody;
use crate::api::urls;
use crate::http::server::AppState;

/// POST /api/maps/{map}/obstacles/
pub async fn create_obstacle(
    State(state): State<AppState>,
    Path(map): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<Response, ApiError> {
    let payload = state.validators.obstacle(body)?;
    let obstacle = state.store.create_obstacle(&map, payload)?;
    state.cache.invalidate_map(&map);
    tracing::info!(map = %map, x = obstacle.x, y = obstacle.y, "Obstacle placed");

    let location = urls::obstacle_item(&map, obstacle.x, obstacle.y);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)]).into_response())
}

/// Tile coordinates come straight from the path; anything that is not a
/// tile index names no resource.
fn coordinate(segment: &str) -> Result<u32, ApiError> {
    let not_found = || ApiError::NotFound(format!("'{segment}' is not a tile coordinate"));
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(not_found());
    }
    segment.parse().map_err(|_| not_found())
}

/// DELETE /api/maps/{map}/obstacles/{x}/{y}/
pub async fn delete_obstacle(
    State(state): State<AppState>,
    Path((map, x, y)): Path<(String, String, String)>,
) -> Result<StatusCode, ApiError> {
    let (x, y) = (coordinate(&x)?, coordinate(&y)?);
    let removed = state.store.delete_obstacle(&map, x, y)?;
    state.cache.invalidate_map(&map);
    tracing::info!(map = %map, x, y, removed = removed.is_some(), "Obstacle cleared");
    Ok(StatusCode::NO_CONTENT)
}
