//! Serviço de consultas: ciclo de vida e consultas de leitura
//!
//! O serviço não guarda estado próprio. Cada operação valida as entradas,
//! aplica as regras de transição e delega ao armazenamento; a consistência
//! entre chamadas concorrentes fica a cargo do armazenamento.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, instrument, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::{AppointmentError, ValidationError};
use crate::models::{Appointment, AppointmentState};
use crate::store::AppointmentStore;
use crate::validation::{is_blank, AppointmentValidator, FieldValidator};

pub type Result<T> = std::result::Result<T, AppointmentError>;

#[derive(Clone)]
pub struct AppointmentService {
    store: Arc<dyn AppointmentStore>,
    validator: Arc<dyn AppointmentValidator>,
    clock: Arc<dyn Clock>,
}

impl AppointmentService {
    pub fn new(
        store: Arc<dyn AppointmentStore>,
        validator: Arc<dyn AppointmentValidator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            validator,
            clock,
        }
    }

    /// Validador de campos padrão e relógio do sistema
    pub fn with_defaults(store: Arc<dyn AppointmentStore>) -> Self {
        Self::new(store, Arc::new(FieldValidator), Arc::new(SystemClock))
    }

    /// Agenda uma nova consulta
    ///
    /// A validação estrutural vem antes da regra de data: uma candidata
    /// inválida nunca chega ao armazenamento, seja qual for a data. Uma data
    /// anterior a hoje marca a candidata como `REJECTED` e a devolve dentro
    /// do erro, sem gravar nada. Um `id` vindo na candidata é descartado.
    #[instrument(
        name = "Agendando consulta",
        skip(self, candidate),
        fields(specialty = %candidate.specialty_name)
    )]
    pub async fn book_appointment(&self, mut candidate: Appointment) -> Result<Appointment> {
        if let Err(reason) = self.validator.validate(&candidate) {
            warn!("Consulta recusada na validação: {}", reason);
            return Err(reason.into());
        }

        let date = candidate
            .appointment_date
            .ok_or(ValidationError::MissingAppointmentDate)?;
        if date < self.clock.today() {
            warn!("Consulta recusada: data {} anterior a hoje", date);
            // os dois carimbos vêm do relógio injetado, nunca do valor de construção
            let now = self.clock.now();
            candidate.created_at = now;
            candidate.set_state(AppointmentState::Rejected, now);
            return Err(AppointmentError::PastDate(Box::new(candidate)));
        }

        let now = self.clock.now();
        candidate.id = None;
        candidate.state = AppointmentState::Confirmed;
        candidate.created_at = now;
        candidate.updated_at = now;

        let saved = self.store.save(candidate).await?;
        info!("Consulta {:?} agendada para {}", saved.id, date);
        Ok(saved)
    }

    /// Cancela uma consulta confirmada
    ///
    /// Cancelar de novo é um conflito, não uma operação idempotente.
    #[instrument(name = "Cancelando consulta", skip(self))]
    pub async fn cancel(&self, id: &str) -> Result<Appointment> {
        let mut appointment = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppointmentError::NotFound(id.to_string()))?;

        let target = AppointmentState::Cancelled;
        if appointment.state == target {
            return Err(AppointmentError::AlreadyCancelled(id.to_string()));
        }
        if !appointment.state.can_transition_to(target) {
            return Err(AppointmentError::InvalidTransition {
                from: appointment.state,
                to: target,
            });
        }

        appointment.set_state(target, self.clock.now());
        let saved = self.store.save(appointment).await?;
        info!("Consulta {} cancelada", id);
        Ok(saved)
    }

    /// Remove a consulta definitivamente, sem transição de estado
    #[instrument(name = "Removendo consulta", skip(self))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        if !self.store.exists_by_id(id).await? {
            return Err(AppointmentError::NotFound(id.to_string()));
        }
        self.store.delete_by_id(id).await?;
        info!("Consulta {} removida", id);
        Ok(())
    }

    pub async fn get_by_contact(&self, email: &str) -> Result<Vec<Appointment>> {
        require(email, "email is required")?;
        Ok(self.store.find_by_contact_email(email).await?)
    }

    pub async fn filter_by_contact_and_state(
        &self,
        email: &str,
        state: AppointmentState,
    ) -> Result<Vec<Appointment>> {
        require(email, "email is required")?;
        Ok(self
            .store
            .find_by_contact_email_and_state(email, state)
            .await?)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Appointment>> {
        Ok(self.store.find_by_id(id).await?)
    }

    pub async fn list_all(&self) -> Result<Vec<Appointment>> {
        Ok(self.store.find_all().await?)
    }

    pub async fn list_by_state(&self, state: AppointmentState) -> Result<Vec<Appointment>> {
        Ok(self.store.find_by_state(state).await?)
    }

    pub async fn list_by_specialty(&self, specialty_name: &str) -> Result<Vec<Appointment>> {
        Ok(self.store.find_by_specialty(specialty_name).await?)
    }

    pub async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Appointment>> {
        Ok(self.store.find_by_date(date).await?)
    }

    pub async fn list_by_national_id(&self, national_id: &str) -> Result<Vec<Appointment>> {
        require(national_id, "national id is required")?;
        Ok(self.store.find_by_national_id(national_id).await?)
    }

    /// Consultas entre duas datas, inclusive
    pub async fn list_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Appointment>> {
        if start > end {
            return Err(AppointmentError::InvalidInput(
                "date range start must not be after its end",
            ));
        }
        Ok(self.store.find_by_date_between(start, end).await?)
    }

    pub async fn count_by_state(&self, state: AppointmentState) -> Result<u64> {
        Ok(self.store.count_by_state(state).await?)
    }
}

fn require(value: &str, reason: &'static str) -> Result<()> {
    if is_blank(value) {
        return Err(AppointmentError::InvalidInput(reason));
    }
    Ok(())
}
