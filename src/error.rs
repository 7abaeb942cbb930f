use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// The failure modes surfaced by the API.
///
/// Every handler returns `Result<_, ApiError>`; the variant decides the HTTP
/// status and the JSON `{"message": ...}` body the client sees.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed request fields.
    #[error("{0}")]
    Validation(String),

    /// Bad email/password combination. One generic message for both the
    /// unknown-email and wrong-password cases.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// A password re-check failed (change-password, delete-account).
    #[error("{0}")]
    WrongPassword(&'static str),

    /// A uniqueness rule was violated (duplicate email).
    #[error("{0}")]
    Conflict(String),

    /// The resource is absent, or belongs to a different user.
    #[error("{0}")]
    NotFound(&'static str),

    /// Unexpected store or runtime failure.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Internal(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials => StatusCode::BAD_REQUEST,
            ApiError::WrongPassword(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = Json(json!({ "message": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn statuses_match_taxonomy() {
        let cases = [
            (
                ApiError::Validation("Missing required fields".into()),
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::InvalidCredentials, StatusCode::BAD_REQUEST),
            (
                ApiError::WrongPassword("Incorrect password"),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Conflict("Email already registered".into()),
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::NotFound("Expense not found"), StatusCode::NOT_FOUND),
            (
                ApiError::Internal(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn invalid_credentials_message_is_generic() {
        assert_eq!(ApiError::InvalidCredentials.to_string(), "Invalid credentials");
    }
}
