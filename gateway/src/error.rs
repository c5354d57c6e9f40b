//! Gateway errors
//!
//! Only failures the gateway detects itself end up here. Anything the lookup
//! service answers, error or not, is relayed as-is.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cep_common::InvalidPostalCode;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    InvalidZipcode(#[from] InvalidPostalCode),

    #[error("error calling weather service: {0}")]
    Upstream(#[from] reqwest::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ForwardError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, "invalid request format".to_string())
            }
            ForwardError::InvalidZipcode(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            ForwardError::Upstream(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        if status.is_server_error() {
            tracing::error!(error = ?self, status = status.as_u16(), "Forwarding failed");
        } else {
            tracing::info!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
