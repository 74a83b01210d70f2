use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use manila_axum::ErrorDetails;

/// Application-level error type for the demo handlers.
///
/// Produces a plain error response and attaches [`ErrorDetails`] so the
/// formatting layer can envelope it for JSON clients; non-JSON clients
/// see the plain body unchanged.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A named thing does not exist.
    #[error("{entity} '{name}' not found")]
    NotFound {
        entity: &'static str,
        name: String,
    },

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for handler return values.
pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotFound { entity, name } => (
                StatusCode::NOT_FOUND,
                format!("{entity} '{name}' not found"),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let details = ErrorDetails::new(message.clone()).exception(format!("{self:?}"));

        let mut response = (status, message).into_response();
        response.extensions_mut().insert(details);
        response
    }
}
