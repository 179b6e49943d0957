//! HTTP handlers and error mapping.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

use crate::app::pipeline::forecast_response;
use crate::domain::{ForecastRequest, ForecastResponse};
use crate::error::{AppError, ErrorKind};
use crate::server::AppState;

/// Liveness probe.
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// `POST /forecast/`
pub async fn forecast(
    State(state): State<AppState>,
    payload: Result<Json<ForecastRequest>, JsonRejection>,
) -> Result<Json<ForecastResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::input(rejection.body_text()))?;

    let config = state.config.clone();
    let response = tokio::task::spawn_blocking(move || forecast_response(&request, &config))
        .await
        .map_err(|e| AppError::internal(format!("forecast task failed: {e}")))??;

    Ok(Json(response))
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Input => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::Upstream => StatusCode::BAD_GATEWAY,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = match self.kind() {
            ErrorKind::Internal => {
                error!(error = %self.message(), "Error during prediction");
                format!("Internal server error: {}", self.message())
            }
            _ => {
                warn!(status = status.as_u16(), error = %self.message(), "request rejected");
                self.message().to_string()
            }
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_statuses() {
        assert_eq!(AppError::validation("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::input("x").status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(AppError::upstream("x").status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(AppError::internal("x").status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn internal_errors_map_to_server_error() {
        let resp = AppError::internal("boom").into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
