//! Modelos de dados do agendamento de consultas
//!
//! Este módulo define a consulta (`Appointment`), o seu estado de ciclo de
//! vida e a especialidade médica que a consulta referencia pelo nome.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use std::str::FromStr;
use thiserror::Error;

/// Estados possíveis de uma consulta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentState {
    /// Consulta ativa; estado inicial de toda consulta construída
    #[default]
    Confirmed,
    /// Cancelada pelo paciente ou pela clínica (terminal)
    Cancelled,
    /// Recusada no momento do agendamento (terminal, nunca persistida)
    Rejected,
}

impl AppointmentState {
    pub const ALL: [AppointmentState; 3] = [
        AppointmentState::Confirmed,
        AppointmentState::Cancelled,
        AppointmentState::Rejected,
    ];

    /// Tag usada na serialização e na coluna `state`
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentState::Confirmed => "CONFIRMED",
            AppointmentState::Cancelled => "CANCELLED",
            AppointmentState::Rejected => "REJECTED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, AppointmentState::Confirmed)
    }

    /// Única transição permitida: CONFIRMED -> CANCELLED
    pub fn can_transition_to(&self, next: AppointmentState) -> bool {
        matches!(
            (self, next),
            (AppointmentState::Confirmed, AppointmentState::Cancelled)
        )
    }
}

/// Rótulo de exibição de um estado, mantido fora do tipo
pub fn state_label(state: AppointmentState) -> &'static str {
    match state {
        AppointmentState::Confirmed => "Confirmada",
        AppointmentState::Cancelled => "Cancelada",
        AppointmentState::Rejected => "Rechazada",
    }
}

impl std::fmt::Display for AppointmentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag de estado desconhecida
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown appointment state: {0}")]
pub struct ParseStateError(pub String);

impl FromStr for AppointmentState {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CONFIRMED" => Ok(AppointmentState::Confirmed),
            "CANCELLED" => Ok(AppointmentState::Cancelled),
            "REJECTED" => Ok(AppointmentState::Rejected),
            _ => Err(ParseStateError(s.to_string())),
        }
    }
}

/// Representa uma consulta médica
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    /// Identificador atribuído pelo armazenamento no primeiro `save`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Nome completo do paciente
    pub full_name: String,
    /// Documento de identidade (8 a 15 dígitos)
    pub national_id: String,
    /// E-mail de contato do paciente
    pub contact_email: String,
    /// Data da consulta, sem componente de hora
    pub appointment_date: Option<NaiveDate>,
    /// Nome da especialidade (referência, não chave estrangeira)
    pub specialty_name: String,
    /// Médico responsável
    pub doctor_name: String,
    /// Consultório ou sala
    pub location: String,
    /// Estado atual do ciclo de vida
    pub state: AppointmentState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Cria uma consulta ainda não validada, no estado `CONFIRMED`
    pub fn new(
        full_name: impl Into<String>,
        national_id: impl Into<String>,
        contact_email: impl Into<String>,
        appointment_date: NaiveDate,
        specialty_name: impl Into<String>,
        doctor_name: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            national_id: national_id.into(),
            contact_email: contact_email.into(),
            appointment_date: Some(appointment_date),
            specialty_name: specialty_name.into(),
            doctor_name: doctor_name.into(),
            location: location.into(),
            ..Self::default()
        }
    }

    /// Altera o estado e renova `updated_at`
    pub fn set_state(&mut self, state: AppointmentState, now: DateTime<Utc>) {
        self.state = state;
        self.updated_at = now;
    }
}

impl Default for Appointment {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: None,
            full_name: String::new(),
            national_id: String::new(),
            contact_email: String::new(),
            appointment_date: None,
            specialty_name: String::new(),
            doctor_name: String::new(),
            location: String::new(),
            state: AppointmentState::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl FromRow<'_, SqliteRow> for Appointment {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        let state: String = row.try_get("state")?;
        let state = state.parse().map_err(|e: ParseStateError| sqlx::Error::ColumnDecode {
            index: String::from("state"),
            source: Box::new(e),
        })?;

        Ok(Self {
            id: Some(row.try_get("id")?),
            full_name: row.try_get("full_name")?,
            national_id: row.try_get("national_id")?,
            contact_email: row.try_get("contact_email")?,
            appointment_date: Some(row.try_get("appointment_date")?),
            specialty_name: row.try_get("specialty_name")?,
            doctor_name: row.try_get("doctor_name")?,
            location: row.try_get("location")?,
            state,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Especialidade médica do catálogo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specialty {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Nome único da especialidade
    pub name: String,
    pub description: String,
    /// Médico designado
    pub doctor_name: String,
    pub location: String,
    /// Referência (URL) da imagem ilustrativa
    pub image_ref: String,
}

impl Specialty {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        doctor_name: impl Into<String>,
        location: impl Into<String>,
        image_ref: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
            doctor_name: doctor_name.into(),
            location: location.into(),
            image_ref: image_ref.into(),
        }
    }
}

impl FromRow<'_, SqliteRow> for Specialty {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: Some(row.try_get("id")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            doctor_name: row.try_get("doctor_name")?,
            location: row.try_get("location")?,
            image_ref: row.try_get("image_ref")?,
        })
    }
}
