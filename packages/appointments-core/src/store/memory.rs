//! Armazenamento em memória
//!
//! Usado nos testes e pelo backend `memory` da API. Cada coleção é um mapa
//! protegido por `RwLock`; nenhuma transação entre chamadas.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::NaiveDate;

use super::{new_id, AppointmentStore, SpecialtyStore};
use crate::error::StoreError;
use crate::models::{Appointment, AppointmentState, Specialty};

fn poisoned() -> StoreError {
    StoreError::Internal("in-memory store lock poisoned".to_string())
}

#[derive(Debug, Default)]
pub struct InMemoryAppointmentStore {
    records: RwLock<HashMap<String, Appointment>>,
}

impl InMemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Appointment>>, StoreError> {
        self.records.read().map_err(|_| poisoned())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Appointment>>, StoreError> {
        self.records.write().map_err(|_| poisoned())
    }

    fn select(
        &self,
        predicate: impl Fn(&Appointment) -> bool,
    ) -> Result<Vec<Appointment>, StoreError> {
        let records = self.read()?;
        let mut found: Vec<Appointment> = records
            .values()
            .filter(|a| predicate(a))
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            a.appointment_date
                .cmp(&b.appointment_date)
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(found)
    }
}

#[async_trait]
impl AppointmentStore for InMemoryAppointmentStore {
    async fn save(&self, mut appointment: Appointment) -> Result<Appointment, StoreError> {
        let id = appointment.id.get_or_insert_with(new_id).clone();
        self.write()?.insert(id, appointment.clone());
        Ok(appointment)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Appointment>, StoreError> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Appointment>, StoreError> {
        self.select(|_| true)
    }

    async fn find_by_contact_email(&self, email: &str) -> Result<Vec<Appointment>, StoreError> {
        self.select(|a| a.contact_email == email)
    }

    async fn find_by_contact_email_and_state(
        &self,
        email: &str,
        state: AppointmentState,
    ) -> Result<Vec<Appointment>, StoreError> {
        self.select(|a| a.contact_email == email && a.state == state)
    }

    async fn find_by_state(
        &self,
        state: AppointmentState,
    ) -> Result<Vec<Appointment>, StoreError> {
        self.select(|a| a.state == state)
    }

    async fn find_by_specialty(
        &self,
        specialty_name: &str,
    ) -> Result<Vec<Appointment>, StoreError> {
        self.select(|a| a.specialty_name == specialty_name)
    }

    async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<Appointment>, StoreError> {
        self.select(|a| a.appointment_date == Some(date))
    }

    async fn find_by_national_id(
        &self,
        national_id: &str,
    ) -> Result<Vec<Appointment>, StoreError> {
        self.select(|a| a.national_id == national_id)
    }

    async fn find_by_date_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Appointment>, StoreError> {
        self.select(|a| {
            a.appointment_date
                .map_or(false, |date| date >= start && date <= end)
        })
    }

    async fn exists_by_id(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.read()?.contains_key(id))
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        self.write()?.remove(id);
        Ok(())
    }

    async fn count_by_state(&self, state: AppointmentState) -> Result<u64, StoreError> {
        Ok(self.read()?.values().filter(|a| a.state == state).count() as u64)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.read()?.len() as u64)
    }
}

#[derive(Debug, Default)]
pub struct InMemorySpecialtyStore {
    records: RwLock<Vec<Specialty>>,
}

impl InMemorySpecialtyStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Specialty>>, StoreError> {
        self.records.read().map_err(|_| poisoned())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Specialty>>, StoreError> {
        self.records.write().map_err(|_| poisoned())
    }

    /// Mesma regra da coluna `name UNIQUE` do SQLite
    fn upsert(
        records: &mut Vec<Specialty>,
        mut specialty: Specialty,
    ) -> Result<Specialty, StoreError> {
        let id = specialty.id.get_or_insert_with(new_id).clone();
        if records
            .iter()
            .any(|s| s.name == specialty.name && s.id.as_deref() != Some(id.as_str()))
        {
            return Err(StoreError::ConstraintViolation(format!(
                "UNIQUE constraint failed: specialties.name ({})",
                specialty.name
            )));
        }
        match records.iter_mut().find(|s| s.id.as_deref() == Some(id.as_str())) {
            Some(existing) => *existing = specialty.clone(),
            None => records.push(specialty.clone()),
        }
        Ok(specialty)
    }
}

#[async_trait]
impl SpecialtyStore for InMemorySpecialtyStore {
    async fn save(&self, specialty: Specialty) -> Result<Specialty, StoreError> {
        let mut records = self.write()?;
        Self::upsert(&mut records, specialty)
    }

    async fn save_all(&self, specialties: Vec<Specialty>) -> Result<Vec<Specialty>, StoreError> {
        let mut records = self.write()?;
        // tudo ou nada, como a transação do SQLite
        let mut staged = records.clone();
        let saved = specialties
            .into_iter()
            .map(|s| Self::upsert(&mut staged, s))
            .collect::<Result<Vec<_>, _>>()?;
        *records = staged;
        Ok(saved)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Specialty>, StoreError> {
        Ok(self
            .read()?
            .iter()
            .find(|s| s.id.as_deref() == Some(id))
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<Specialty>, StoreError> {
        Ok(self.read()?.clone())
    }

    async fn find_by_name_ignore_case(&self, name: &str) -> Result<Option<Specialty>, StoreError> {
        let wanted = name.to_lowercase();
        Ok(self
            .read()?
            .iter()
            .find(|s| s.name.to_lowercase() == wanted)
            .cloned())
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self.read()?.iter().any(|s| s.name == name))
    }

    async fn exists_by_id(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.read()?.iter().any(|s| s.id.as_deref() == Some(id)))
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        self.write()?.retain(|s| s.id.as_deref() != Some(id));
        Ok(())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.read()?.len() as u64)
    }
}
