use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::advice::AdviceError;
use crate::workflows::decisions::DecisionServiceError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("server error: {0}")]
    Server(#[from] axum::Error),
    #[error("decision error: {0}")]
    Decision(#[from] DecisionServiceError),
    #[error("advice provider error: {0}")]
    Advice(#[from] AdviceError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Decision(err) => err.into_response(),
            other => {
                let body = Json(json!({ "error": other.to_string() }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::decisions::HistoryError;

    #[test]
    fn decision_errors_keep_their_status() {
        let response =
            AppError::from(DecisionServiceError::History(HistoryError::NotFound)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn config_errors_are_internal() {
        let error = AppError::from(ConfigError::InvalidPort);
        assert_eq!(
            error.to_string(),
            "configuration error: APP_PORT must be a valid u16"
        );
        assert!(std::error::Error::source(&error).is_some());
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
