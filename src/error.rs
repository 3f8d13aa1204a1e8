use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Everything a handler can fail with. The display string of each variant
/// is exactly what clients see in the `error` field.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("not logged in")]
    Unauthenticated,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("only the author may modify a recipe")]
    Forbidden,

    #[error("{0}")]
    NotFound(&'static str),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            // Persistence faults surface to the client as a plain bad
            // request, same shape as every other error.
            ApiError::Store(e) => {
                error!(error = %e, "store operation failed");
                StatusCode::BAD_REQUEST
            }
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_the_error_kind() {
        let cases = [
            (
                ApiError::Validation("missing username".into()),
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (ApiError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden, StatusCode::FORBIDDEN),
            (ApiError::NotFound("recipe not found"), StatusCode::NOT_FOUND),
            (
                ApiError::Store(anyhow::anyhow!("connection reset")),
                StatusCode::BAD_REQUEST,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn body_is_json() {
        let response = ApiError::Unauthenticated.into_response();
        let content_type = response
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .expect("content type set");
        assert_eq!(content_type, "application/json");
    }
}
