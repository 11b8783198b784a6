use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No active session")]
    Unauthorized,

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("External API returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether a retry of the same request could plausibly succeed.
    ///
    /// Connection failures, timeouts and 5xx answers from the recommendation
    /// service qualify; client errors and malformed payloads do not.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::HttpClient(e) => {
                e.is_connect()
                    || e.is_timeout()
                    || e.status().is_some_and(|s| s.is_server_error())
            }
            AppError::UpstreamStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Short, user-facing notice shown in place of a list that failed to load
    pub fn notice(&self) -> String {
        match self {
            AppError::HttpClient(_)
            | AppError::ExternalApi(_)
            | AppError::UpstreamStatus { .. } => {
                "Could not load recommendations. Please try again later.".to_string()
            }
            AppError::Unauthorized => "Please sign in to see recommendations.".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::Cache(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::ExternalApi(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::HttpClient(_) | AppError::UpstreamStatus { .. } => {
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_api_is_not_transient() {
        let err = AppError::ExternalApi("API returned status 400".to_string());
        assert!(!err.is_transient());
    }

    #[test]
    fn test_upstream_5xx_is_transient() {
        let err = AppError::UpstreamStatus {
            status: 503,
            body: String::new(),
        };
        assert!(err.is_transient());
    }

    #[test]
    fn test_upstream_4xx_is_not_transient() {
        let err = AppError::UpstreamStatus {
            status: 400,
            body: "bad profile".to_string(),
        };
        assert!(!err.is_transient());
    }

    #[test]
    fn test_notice_hides_transport_details() {
        let err = AppError::ExternalApi("API returned status 502: upstream".to_string());
        assert_eq!(
            err.notice(),
            "Could not load recommendations. Please try again later."
        );
    }

    #[test]
    fn test_unauthorized_maps_to_401() {
        let response = AppError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
