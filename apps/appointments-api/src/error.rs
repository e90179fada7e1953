//! Mapeamento dos erros de domínio para respostas HTTP
//!
//! Corpo de erro sempre no formato `{"error": "<motivo>"}`.

use appointments_core::{AppointmentError, SpecialtyError, StoreError};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Appointment(#[from] AppointmentError),

    #[error(transparent)]
    Specialty(#[from] SpecialtyError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Appointment(err) => match err {
                AppointmentError::Validation(_)
                | AppointmentError::PastDate(_)
                | AppointmentError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                AppointmentError::NotFound(_) => StatusCode::NOT_FOUND,
                AppointmentError::AlreadyCancelled(_)
                | AppointmentError::InvalidTransition { .. } => StatusCode::CONFLICT,
                AppointmentError::Store(store) => store_status(store),
            },
            ApiError::Specialty(err) => match err {
                SpecialtyError::NotFound(_) => StatusCode::NOT_FOUND,
                SpecialtyError::DuplicateName(_) => StatusCode::CONFLICT,
                SpecialtyError::Store(store) => store_status(store),
            },
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

fn store_status(error: &StoreError) -> StatusCode {
    match error {
        StoreError::ConstraintViolation(_) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            // detalhes do armazenamento ficam só no log
            error!("Erro interno ao processar requisição: {}", self);
            let body = json!({ "error": "internal server error" });
            return (status, Json(body)).into_response();
        }

        let body = match &self {
            ApiError::Appointment(err) => match err.rejected() {
                Some(candidate) => json!({ "error": self.to_string(), "appointment": candidate }),
                None => json!({ "error": self.to_string() }),
            },
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<&str> = errors.field_errors().keys().copied().collect();
        fields.sort_unstable();
        ApiError::BadRequest(format!("{} must not be blank", fields.join(", ")))
    }
}

/// Corpo JSON malformado ou com tipos inválidos
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
