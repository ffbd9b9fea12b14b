//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::pricing::responses::PricingErrorResponse;
use crate::pricing::PricingError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    #[error("Could not fetch message templates: {0}")]
    TemplateFetch(String),

    #[error("Message template '{0}' is not defined")]
    MissingTemplateKey(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn error_type(&self) -> &'static str {
        match self {
            AppError::NotFound => "not_found",
            AppError::Database(_) => "database",
            AppError::Pricing(PricingError::InvalidRange { .. }) => "invalid_range",
            AppError::Pricing(PricingError::StayTooLong { .. }) => "stay_too_long",
            AppError::Pricing(PricingError::Overflow) => "amount_overflow",
            AppError::TemplateFetch(_) => "template_fetch",
            AppError::MissingTemplateKey(_) => "missing_template_key",
            AppError::Validation(_) => "validation",
            AppError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Pricing(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }
            AppError::TemplateFetch(msg) => {
                tracing::error!("Template fetch failed: {}", msg);
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            AppError::MissingTemplateKey(key) => {
                tracing::error!("Missing message template: {}", key);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
        };

        let body = PricingErrorResponse {
            error_type: self.error_type().to_string(),
            message,
            details: match &self {
                AppError::Pricing(e) => e.details(),
                _ => None,
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
