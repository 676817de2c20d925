use crate::config::ConfigError;
use crate::flows::assets::AssetError;
use crate::flows::session::FlowError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Flow(FlowError),
    Asset(AssetError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Flow(err) => write!(f, "{}", err),
            AppError::Asset(err) => write!(f, "content error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Flow(err) => Some(err),
            AppError::Asset(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Flow(FlowError::UnknownSession(_)) => StatusCode::NOT_FOUND,
            AppError::Flow(FlowError::ActionNotAvailable { .. }) => StatusCode::CONFLICT,
            AppError::Asset(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<FlowError> for AppError {
    fn from(value: FlowError) -> Self {
        Self::Flow(value)
    }
}

impl From<AssetError> for AppError {
    fn from(value: AssetError) -> Self {
        Self::Asset(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::screens::ScreenId;

    #[test]
    fn flow_errors_map_to_client_statuses() {
        let missing = AppError::from(FlowError::UnknownSession("abc".to_string()));
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);

        let misuse = AppError::from(FlowError::ActionNotAvailable {
            action: "apply",
            screen: ScreenId::Login,
        });
        assert_eq!(misuse.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn asset_errors_are_bad_requests() {
        let err = AppError::from(AssetError::InvalidListing {
            id: "9".to_string(),
            reason: "match percentage 120 exceeds 100".to_string(),
        });
        assert!(err.to_string().starts_with("content error"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
