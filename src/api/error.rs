//! API errors, rendered as Mason error documents.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::hypermedia::{MasonBuilder, ERROR_PROFILE, MASON};
use crate::hypermedia::builder::DELETE_RELATION;
use crate::store::StoreError;
use crate::validation::ValidationError;

/// Everything a handler can fail with. The message becomes the single
/// entry of `@messages`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    MethodNotAllowed(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    UnsupportedMediaType(String),

    #[error("{0}")]
    NotAcceptable(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::NotAcceptable(_) => StatusCode::NOT_ACCEPTABLE,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short `@message` title.
    pub fn title(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "Bad request",
            ApiError::NotFound(_) => "Not found",
            ApiError::MethodNotAllowed(_) => "Method not allowed",
            ApiError::Conflict(_) => "Conflict",
            ApiError::UnsupportedMediaType(_) => "Unsupported media type",
            ApiError::NotAcceptable(_) => "Not acceptable",
            ApiError::PayloadTooLarge(_) => "Payload too large",
            ApiError::Internal(_) => "Internal server error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let mut body = MasonBuilder::new(DELETE_RELATION);
        body.add_error(self.title(), &self.to_string());
        body.add_control("profile", ERROR_PROFILE);
        let body = body.into_value().to_string();

        (status, [(header::CONTENT_TYPE, MASON)], body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let message = err.to_string();
        match err {
            StoreError::MapNotFound(_) | StoreError::ObserverNotFound { .. } => {
                ApiError::NotFound(message)
            }
            StoreError::DuplicateMap(_)
            | StoreError::DuplicateObserver(_)
            | StoreError::ContentsOutOfBounds { .. } => ApiError::Conflict(message),
            StoreError::UnaddressableName(_) | StoreError::OutOfBounds { .. } => {
                ApiError::BadRequest(message)
            }
            StoreError::Io(_) | StoreError::Snapshot(_) => ApiError::Internal(message),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::Rejected(message) => ApiError::BadRequest(message),
            schema @ ValidationError::Schema { .. } => ApiError::Internal(schema.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(format!("Failed to encode response: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_error_document() {
        let response = ApiError::Conflict("A map named 'Test Map 1' already exists".into())
            .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(response.headers()[header::CONTENT_TYPE], MASON);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            std::str::from_utf8(&body).unwrap(),
            r#"{"@error":{"@message":"Conflict","@messages":["A map named 'Test Map 1' already exists"]},"@controls":{"profile":{"href":"/profiles/error/"}}}"#
        );
    }

    #[test]
    fn test_store_error_mapping() {
        let cases = [
            (StoreError::MapNotFound("x".into()), StatusCode::NOT_FOUND),
            (StoreError::DuplicateObserver("x".into()), StatusCode::CONFLICT),
            (
                StoreError::ContentsOutOfBounds { width: 1, height: 1 },
                StatusCode::CONFLICT,
            ),
            (StoreError::OutOfBounds { kind: "Obstacle" }, StatusCode::BAD_REQUEST),
            (StoreError::UnaddressableName("?".into()), StatusCode::BAD_REQUEST),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn test_out_of_bounds_message() {
        let err = ApiError::from(StoreError::OutOfBounds { kind: "Observer" });
        assert_eq!(err.to_string(), "Observer is outside map");
    }
}
