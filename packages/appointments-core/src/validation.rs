//! Validação estrutural de consultas candidatas
//!
//! As verificações são feitas em ordem fixa e param na primeira falha, para
//! que a mesma candidata produza sempre o mesmo motivo.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;
use crate::models::Appointment;

static NATIONAL_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{8,15}$").expect("national id pattern is valid"));

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

/// Validador de consultas injetável no serviço
pub trait AppointmentValidator: Send + Sync {
    fn validate(&self, candidate: &Appointment) -> Result<(), ValidationError>;
}

/// Validador padrão com as regras de campo obrigatórias
#[derive(Debug, Default, Clone, Copy)]
pub struct FieldValidator;

impl AppointmentValidator for FieldValidator {
    fn validate(&self, candidate: &Appointment) -> Result<(), ValidationError> {
        validate_appointment(candidate)
    }
}

/// Verifica os campos da candidata, sem efeitos colaterais
pub fn validate_appointment(candidate: &Appointment) -> Result<(), ValidationError> {
    if is_blank(&candidate.full_name) {
        return Err(ValidationError::MissingFullName);
    }

    if is_blank(&candidate.national_id) {
        return Err(ValidationError::MissingNationalId);
    }
    if !is_valid_national_id(&candidate.national_id) {
        return Err(ValidationError::MalformedNationalId);
    }

    if is_blank(&candidate.contact_email) {
        return Err(ValidationError::MissingEmail);
    }
    if !is_valid_email(&candidate.contact_email) {
        return Err(ValidationError::MalformedEmail);
    }

    if candidate.appointment_date.is_none() {
        return Err(ValidationError::MissingAppointmentDate);
    }

    if is_blank(&candidate.specialty_name) {
        return Err(ValidationError::MissingSpecialty);
    }
    if is_blank(&candidate.doctor_name) {
        return Err(ValidationError::MissingDoctor);
    }
    if is_blank(&candidate.location) {
        return Err(ValidationError::MissingLocation);
    }

    Ok(())
}

/// Vazio ou apenas espaços em branco
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn is_valid_national_id(value: &str) -> bool {
    NATIONAL_ID_PATTERN.is_match(value)
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}
