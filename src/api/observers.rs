//! Observer handlers.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::extract::JsonBody;
use crate::api::negotiate::Negotiated;
use crate::api::{urls, views};
use crate::http::server::AppState;

/// POST /api/maps/{map}/observers/
pub async fn create_observer(
    State(state): State<AppState>,
    Path(map): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<Response, ApiError> {
    let payload = state.validators.observer(body)?;
    let observer = state.store.create_observer(&map, payload)?;
    state.cache.invalidate_map(&map);
    tracing::info!(map = %map, observer = %observer.slug, "Observer placed");

    let location = urls::observer_item(&map, &observer.slug);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)]).into_response())
}

/// GET /api/maps/{map}/observers/{observer}/
pub async fn get_observer(
    State(state): State<AppState>,
    Negotiated(media): Negotiated,
    Path((map, observer)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let path = urls::observer_item(&map, &observer);
    views::cached(&state.cache, media, &path, || {
        let placed = state.store.get_observer(&map, &observer)?;
        Ok(views::render_observer(media, &placed))
    })
}

/// PUT /api/maps/{map}/observers/{observer}/
pub async fn update_observer(
    State(state): State<AppState>,
    Path((map, observer)): Path<(String, String)>,
    JsonBody(body): JsonBody,
) -> Result<StatusCode, ApiError> {
    let payload = state.validators.observer(body)?;
    let placed = state.store.update_observer(&map, &observer, payload)?;
    state.cache.invalidate_map(&map);
    tracing::info!(
        map = %map,
        observer = %observer,
        slug = %placed.observer.slug,
        "Observer updated"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/maps/{map}/observers/{observer}/
pub async fn delete_observer(
    State(state): State<AppState>,
    Path((map, observer)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_observer(&map, &observer)?;
    state.cache.invalidate_map(&map);
    tracing::info!(map = %map, observer = %observer, "Observer deleted");
    Ok(StatusCode::NO_CONTENT)
}
