//! Contratos de armazenamento consumidos pelo núcleo
//!
//! O núcleo não conhece a tecnologia de persistência: depende apenas destes
//! traits. Há duas implementações, SQLite (`sqlite`) e em memória (`memory`).

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::StoreError;
use crate::models::{Appointment, AppointmentState, Specialty};

pub mod memory;
pub mod sqlite;

pub use memory::{InMemoryAppointmentStore, InMemorySpecialtyStore};
pub use sqlite::{SqliteAppointmentStore, SqliteSpecialtyStore};

/// Coleção de consultas indexada por identificador opaco
///
/// Listagens são ordenadas por data da consulta e depois por criação.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Insere (sem `id`) ou substitui (com `id`) e devolve a entidade gravada
    async fn save(&self, appointment: Appointment) -> Result<Appointment, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Appointment>, StoreError>;

    async fn find_all(&self) -> Result<Vec<Appointment>, StoreError>;

    async fn find_by_contact_email(&self, email: &str) -> Result<Vec<Appointment>, StoreError>;

    async fn find_by_contact_email_and_state(
        &self,
        email: &str,
        state: AppointmentState,
    ) -> Result<Vec<Appointment>, StoreError>;

    async fn find_by_state(&self, state: AppointmentState)
        -> Result<Vec<Appointment>, StoreError>;

    async fn find_by_specialty(&self, specialty_name: &str)
        -> Result<Vec<Appointment>, StoreError>;

    async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<Appointment>, StoreError>;

    async fn find_by_national_id(&self, national_id: &str)
        -> Result<Vec<Appointment>, StoreError>;

    /// Intervalo fechado `[start, end]`
    async fn find_by_date_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Appointment>, StoreError>;

    async fn exists_by_id(&self, id: &str) -> Result<bool, StoreError>;

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError>;

    async fn count_by_state(&self, state: AppointmentState) -> Result<u64, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;
}

/// Catálogo de especialidades
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpecialtyStore: Send + Sync {
    async fn save(&self, specialty: Specialty) -> Result<Specialty, StoreError>;

    async fn save_all(&self, specialties: Vec<Specialty>) -> Result<Vec<Specialty>, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Specialty>, StoreError>;

    async fn find_all(&self) -> Result<Vec<Specialty>, StoreError>;

    /// Busca pelo nome sem diferenciar maiúsculas de minúsculas
    async fn find_by_name_ignore_case(&self, name: &str) -> Result<Option<Specialty>, StoreError>;

    /// Comparação exata do nome
    async fn exists_by_name(&self, name: &str) -> Result<bool, StoreError>;

    async fn exists_by_id(&self, id: &str) -> Result<bool, StoreError>;

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;
}

/// Gera um identificador novo para entidades ainda não gravadas
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
