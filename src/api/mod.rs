//! HTTP surface of the map inventory.
//!
//! # Data Flow
//! ```text
//! request
//!     → negotiate.rs (Accept → JSON or Mason, GET only)
//!     → extract.rs (Content-Type check, JSON parse)
//!     → validation (schema check → typed payload)
//!     → store (MapStore operation)
//!     → views.rs (plain JSON) or hypermedia (Mason), through the cache
//! ```
//!
//! # Design Decisions
//! - Every path ends with `/`; URIs are built in urls.rs only
//! - Errors are Mason documents regardless of the Accept header
//! - Writes return no body: 201 with Location, or 204

pub mod error;
pub mod extract;
pub mod maps;
pub mod negotiate;
pub mod observers;
pub mod obstacles;
pub mod urls;
pub mod views;

use axum::http::{Method, Uri};
use axum::routing::{delete, get, post};
use axum::Router;

pub use error::ApiError;
pub use negotiate::MediaType;

use crate::http::server::AppState;

/// All API routes, without middleware.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/maps/", get(maps::list_maps).post(maps::create_map))
        .route(
            "/api/maps/{map}/",
            get(maps::get_map).put(maps::update_map).delete(maps::delete_map),
        )
        .route("/api/maps/{map}/observers/", post(observers::create_observer))
        .route(
            "/api/maps/{map}/observers/{observer}/",
            get(observers::get_observer)
                .put(observers::update_observer)
                .delete(observers::delete_observer),
        )
        .route("/api/maps/{map}/obstacles/", post(obstacles::create_obstacle))
        .route(
            "/api/maps/{map}/obstacles/{x}/{y}/",
            delete(obstacles::delete_obstacle),
        )
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No resource at {}", uri.path()))
}

async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::MethodNotAllowed(format!("{method} is not supported on {}", uri.path()))
}
