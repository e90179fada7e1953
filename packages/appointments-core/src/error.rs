//! Definições de erro do núcleo de agendamento
//!
//! `StoreError` cobre falhas do armazenamento; `ValidationError`,
//! `AppointmentError` e `SpecialtyError` são os erros de regra de negócio
//! devolvidos aos chamadores.

use thiserror::Error;

use crate::models::{Appointment, AppointmentState};

/// Erros específicos para operações de armazenamento
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("record not found: {0}")]
    NotFound(String),

    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("internal store error: {0}")]
    Internal(String),
}

/// Conversão de erros específicos do SQLx para nossos tipos de erro
impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => StoreError::NotFound("row not found".to_string()),
            sqlx::Error::Database(dbe) => {
                if let Some(code) = dbe.code() {
                    // 2067: SQLITE_CONSTRAINT_UNIQUE, 275: SQLITE_CONSTRAINT_CHECK
                    if matches!(code.as_ref(), "23000" | "2067" | "275" | "1555") {
                        return StoreError::ConstraintViolation(dbe.message().to_string());
                    }
                }
                StoreError::Query(dbe.message().to_string())
            }
            sqlx::Error::ColumnNotFound(col) => {
                StoreError::Query(format!("column not found: {}", col))
            }
            sqlx::Error::TypeNotFound { type_name } => {
                StoreError::Query(format!("type not found: {}", type_name))
            }
            sqlx::Error::ColumnDecode { index, source } => {
                StoreError::Query(format!("failed to decode column {}: {}", index, source))
            }
            sqlx::Error::Io(io_err) => StoreError::Connection(io_err.to_string()),
            sqlx::Error::Configuration(conf_err) => StoreError::Connection(conf_err.to_string()),
            sqlx::Error::PoolClosed => StoreError::Connection("connection pool closed".to_string()),
            sqlx::Error::PoolTimedOut => {
                StoreError::Connection("timed out waiting for a connection".to_string())
            }
            sqlx::Error::WorkerCrashed => {
                StoreError::Internal("database worker crashed".to_string())
            }
            _ => StoreError::Internal(format!("unexpected error: {:?}", error)),
        }
    }
}

/// Falhas estruturais de uma consulta candidata, na ordem em que são verificadas
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("full name is required")]
    MissingFullName,

    #[error("national id is required")]
    MissingNationalId,

    #[error("national id must contain 8 to 15 digits")]
    MalformedNationalId,

    #[error("email is required")]
    MissingEmail,

    #[error("email must be well-formed")]
    MalformedEmail,

    #[error("appointment date is required")]
    MissingAppointmentDate,

    #[error("specialty is required")]
    MissingSpecialty,

    #[error("doctor is required")]
    MissingDoctor,

    #[error("location is required")]
    MissingLocation,
}

/// Erros das operações do serviço de consultas
#[derive(Error, Debug)]
pub enum AppointmentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Data anterior a hoje; carrega a candidata marcada como `REJECTED`
    #[error("cannot schedule an appointment on a date before today")]
    PastDate(Box<Appointment>),

    #[error("appointment not found: {0}")]
    NotFound(String),

    #[error("appointment is already cancelled")]
    AlreadyCancelled(String),

    /// Estados terminais não têm transições de saída
    #[error("cannot move appointment from {from} to {to}")]
    InvalidTransition {
        from: AppointmentState,
        to: AppointmentState,
    },

    #[error("{0}")]
    InvalidInput(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppointmentError {
    /// Candidata recusada pela regra de data, quando for o caso
    pub fn rejected(&self) -> Option<&Appointment> {
        match self {
            AppointmentError::PastDate(candidate) => Some(candidate),
            _ => None,
        }
    }
}

/// Erros do catálogo de especialidades
#[derive(Error, Debug)]
pub enum SpecialtyError {
    #[error("specialty not found: {0}")]
    NotFound(String),

    #[error("a specialty named {0} already exists")]
    DuplicateName(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
