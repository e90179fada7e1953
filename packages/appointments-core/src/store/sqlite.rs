//! Armazenamento SQLite via `sqlx`
//!
//! As tabelas são criadas por `migrations::run_migrations`. Datas são
//! gravadas como texto ISO-8601, o que mantém a comparação de intervalos
//! correta na ordem lexicográfica.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::{SqliteArguments, SqlitePool};
use sqlx::query::Query;
use sqlx::Sqlite;
use tracing::debug;

use super::{new_id, AppointmentStore, SpecialtyStore};
use crate::error::StoreError;
use crate::models::{Appointment, AppointmentState, Specialty};

const APPOINTMENT_COLUMNS: &str = "id, full_name, national_id, contact_email, appointment_date, \
     specialty_name, doctor_name, location, state, created_at, updated_at";

const APPOINTMENT_ORDER: &str = "ORDER BY appointment_date, created_at";

const UPSERT_APPOINTMENT: &str = r#"
    INSERT INTO appointments (id, full_name, national_id, contact_email, appointment_date,
        specialty_name, doctor_name, location, state, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
    ON CONFLICT(id) DO UPDATE SET
        full_name = excluded.full_name,
        national_id = excluded.national_id,
        contact_email = excluded.contact_email,
        appointment_date = excluded.appointment_date,
        specialty_name = excluded.specialty_name,
        doctor_name = excluded.doctor_name,
        location = excluded.location,
        state = excluded.state,
        updated_at = excluded.updated_at
"#;

const UPSERT_SPECIALTY: &str = r#"
    INSERT INTO specialties (id, name, description, doctor_name, location, image_ref)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    ON CONFLICT(id) DO UPDATE SET
        name = excluded.name,
        description = excluded.description,
        doctor_name = excluded.doctor_name,
        location = excluded.location,
        image_ref = excluded.image_ref
"#;

/// Consultas gravadas na tabela `appointments`
#[derive(Debug, Clone)]
pub struct SqliteAppointmentStore {
    pool: SqlitePool,
}

impl SqliteAppointmentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn select_appointments(filter: &str) -> String {
    format!(
        "SELECT {} FROM appointments {} {}",
        APPOINTMENT_COLUMNS, filter, APPOINTMENT_ORDER
    )
}

#[async_trait]
impl AppointmentStore for SqliteAppointmentStore {
    async fn save(&self, mut appointment: Appointment) -> Result<Appointment, StoreError> {
        let date = appointment.appointment_date.ok_or_else(|| {
            StoreError::ConstraintViolation("appointment_date cannot be null".to_string())
        })?;
        let id = appointment.id.get_or_insert_with(new_id).clone();

        sqlx::query(UPSERT_APPOINTMENT)
            .bind(id.as_str())
            .bind(appointment.full_name.as_str())
            .bind(appointment.national_id.as_str())
            .bind(appointment.contact_email.as_str())
            .bind(date)
            .bind(appointment.specialty_name.as_str())
            .bind(appointment.doctor_name.as_str())
            .bind(appointment.location.as_str())
            .bind(appointment.state.as_str())
            .bind(appointment.created_at)
            .bind(appointment.updated_at)
            .execute(&self.pool)
            .await?;

        debug!("Consulta {} gravada ({})", id, appointment.state);
        Ok(appointment)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Appointment>, StoreError> {
        let sql = select_appointments("WHERE id = ?1");
        let row = sqlx::query_as::<_, Appointment>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_all(&self) -> Result<Vec<Appointment>, StoreError> {
        let rows = sqlx::query_as::<_, Appointment>(&select_appointments(""))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_contact_email(&self, email: &str) -> Result<Vec<Appointment>, StoreError> {
        let sql = select_appointments("WHERE contact_email = ?1");
        let rows = sqlx::query_as::<_, Appointment>(&sql)
            .bind(email)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_contact_email_and_state(
        &self,
        email: &str,
        state: AppointmentState,
    ) -> Result<Vec<Appointment>, StoreError> {
        let sql = select_appointments("WHERE contact_email = ?1 AND state = ?2");
        let rows = sqlx::query_as::<_, Appointment>(&sql)
            .bind(email)
            .bind(state.as_str())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_state(
        &self,
        state: AppointmentState,
    ) -> Result<Vec<Appointment>, StoreError> {
        let sql = select_appointments("WHERE state = ?1");
        let rows = sqlx::query_as::<_, Appointment>(&sql)
            .bind(state.as_str())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_specialty(
        &self,
        specialty_name: &str,
    ) -> Result<Vec<Appointment>, StoreError> {
        let sql = select_appointments("WHERE specialty_name = ?1");
        let rows = sqlx::query_as::<_, Appointment>(&sql)
            .bind(specialty_name)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<Appointment>, StoreError> {
        let sql = select_appointments("WHERE appointment_date = ?1");
        let rows = sqlx::query_as::<_, Appointment>(&sql)
            .bind(date)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_national_id(
        &self,
        national_id: &str,
    ) -> Result<Vec<Appointment>, StoreError> {
        let sql = select_appointments("WHERE national_id = ?1");
        let rows = sqlx::query_as::<_, Appointment>(&sql)
            .bind(national_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_date_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Appointment>, StoreError> {
        let sql = select_appointments("WHERE appointment_date BETWEEN ?1 AND ?2");
        let rows = sqlx::query_as::<_, Appointment>(&sql)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn exists_by_id(&self, id: &str) -> Result<bool, StoreError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM appointments WHERE id = ?1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM appointments WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn count_by_state(&self, state: AppointmentState) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM appointments WHERE state = ?1")
            .bind(state.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM appointments")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}

/// Especialidades gravadas na tabela `specialties`
#[derive(Debug, Clone)]
pub struct SqliteSpecialtyStore {
    pool: SqlitePool,
}

impl SqliteSpecialtyStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn upsert_specialty<'q>(id: &'q str, s: &'q Specialty) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    sqlx::query(UPSERT_SPECIALTY)
        .bind(id)
        .bind(s.name.as_str())
        .bind(s.description.as_str())
        .bind(s.doctor_name.as_str())
        .bind(s.location.as_str())
        .bind(s.image_ref.as_str())
}

#[async_trait]
impl SpecialtyStore for SqliteSpecialtyStore {
    async fn save(&self, mut specialty: Specialty) -> Result<Specialty, StoreError> {
        let id = specialty.id.get_or_insert_with(new_id).clone();
        upsert_specialty(&id, &specialty)
            .execute(&self.pool)
            .await?;
        Ok(specialty)
    }

    async fn save_all(&self, specialties: Vec<Specialty>) -> Result<Vec<Specialty>, StoreError> {
        let mut transaction = self.pool.begin().await?;
        let mut saved = Vec::with_capacity(specialties.len());

        for mut specialty in specialties {
            let id = specialty.id.get_or_insert_with(new_id).clone();
            upsert_specialty(&id, &specialty)
                .execute(&mut *transaction)
                .await?;
            saved.push(specialty);
        }

        transaction.commit().await?;
        Ok(saved)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Specialty>, StoreError> {
        let row = sqlx::query_as::<_, Specialty>("SELECT * FROM specialties WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_all(&self) -> Result<Vec<Specialty>, StoreError> {
        let rows = sqlx::query_as::<_, Specialty>("SELECT * FROM specialties ORDER BY rowid")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_name_ignore_case(&self, name: &str) -> Result<Option<Specialty>, StoreError> {
        // lower() do SQLite só trata ASCII; nomes como "Psicología" exigem a
        // comparação Unicode do Rust. O catálogo é pequeno.
        let wanted = name.to_lowercase();
        Ok(self
            .find_all()
            .await?
            .into_iter()
            .find(|s| s.name.to_lowercase() == wanted))
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool, StoreError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM specialties WHERE name = ?1)")
                .bind(name)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn exists_by_id(&self, id: &str) -> Result<bool, StoreError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM specialties WHERE id = ?1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM specialties WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM specialties")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}
