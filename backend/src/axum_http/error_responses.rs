use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::usecases::subscriptions::SubscriptionError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

impl ErrorResponse {
    pub fn into_response_with(status: StatusCode, message: impl Into<String>) -> Response {
        let body = Json(ErrorResponse {
            code: status.as_u16(),
            message: message.into(),
        });
        (status, body).into_response()
    }
}

/// Errors raised by the HTTP layer itself, before a use case runs.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Premium subscription required")]
    Forbidden,

    #[error("{0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        ErrorResponse::into_response_with(status, self.to_string())
    }
}

impl IntoResponse for SubscriptionError {
    fn into_response(self) -> Response {
        ErrorResponse::into_response_with(self.status_code(), self.to_string())
    }
}
