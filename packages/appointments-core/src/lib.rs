//! Appointments Core - núcleo de agendamento de consultas médicas
//!
//! Esta biblioteca fornece:
//! - Modelos de consulta e especialidade
//! - Validação estrutural e regras de ciclo de vida das consultas
//! - Serviço de consultas e catálogo de especialidades
//! - Contratos de armazenamento com implementações SQLite e em memória
//! - Migrações automáticas do banco de dados

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::info;

pub mod clock;
pub mod error;
pub mod migrations;
pub mod models;
pub mod service;
pub mod specialty;
pub mod store;
pub mod validation;

pub use clock::{Clock, SystemClock};
pub use error::{AppointmentError, SpecialtyError, StoreError, ValidationError};
pub use models::{state_label, Appointment, AppointmentState, Specialty};
pub use service::AppointmentService;
pub use specialty::SpecialtyService;
pub use store::{AppointmentStore, SpecialtyStore};
pub use validation::{AppointmentValidator, FieldValidator};

/// Configuração da conexão com o banco de dados
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Caminho para o arquivo SQLite
    pub db_path: String,
    /// Número máximo de conexões no pool
    pub max_connections: u32,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            db_path: "data/appointments.db".to_string(),
            max_connections: 5,
        }
    }
}

/// Inicializa o pool SQLite e aplica as migrações pendentes
pub async fn init_db_pool(config: &DbConfig) -> Result<SqlitePool> {
    let db_path = Path::new(&config.db_path);

    // Verifica se o diretório pai existe
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .context("Falha ao criar diretório para banco de dados")?;
        }
    }

    let connection_options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .pragma("synchronous", "NORMAL");

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(connection_options)
        .await
        .context("Falha ao conectar ao banco de dados SQLite")?;

    migrations::run_migrations(&pool)
        .await
        .context("Falha ao aplicar migrações")?;

    info!("Banco de dados inicializado com sucesso: {}", config.db_path);
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_db_connection() -> Result<()> {
        let temp_dir = tempdir()?;
        let db_path = temp_dir.path().join("nested").join("test.db");

        let config = DbConfig {
            db_path: db_path.to_str().unwrap().to_string(),
            max_connections: 2,
        };

        let pool = init_db_pool(&config).await?;

        let result: (i64,) = sqlx::query_as("SELECT 1").fetch_one(&pool).await?;
        assert_eq!(result.0, 1);
        assert!(db_path.exists());

        Ok(())
    }

    #[tokio::test]
    async fn sqlite_backed_services_work_together() -> Result<()> {
        use chrono::{Duration, Local};
        use std::sync::Arc;

        let temp_dir = tempdir()?;
        let config = DbConfig {
            db_path: temp_dir.path().join("e2e.db").to_str().unwrap().to_string(),
            max_connections: 2,
        };
        let pool = init_db_pool(&config).await?;

        let specialties = SpecialtyService::new(Arc::new(store::SqliteSpecialtyStore::new(
            pool.clone(),
        )));
        specialties.seed_defaults().await?;
        let psychology = specialties
            .get_by_name("psicología")
            .await?
            .expect("seeded specialty");

        let appointments =
            AppointmentService::with_defaults(Arc::new(store::SqliteAppointmentStore::new(pool)));
        let booked = appointments
            .book_appointment(Appointment::new(
                "Juan Pérez",
                "12345678",
                "juan@x.com",
                Local::now().date_naive() + Duration::days(1),
                psychology.name.clone(),
                psychology.doctor_name.clone(),
                psychology.location.clone(),
            ))
            .await?;
        let id = booked.id.clone().expect("id");

        let cancelled = appointments.cancel(&id).await?;
        assert_eq!(cancelled.state, AppointmentState::Cancelled);
        assert!(cancelled.updated_at >= booked.updated_at);
        assert_eq!(
            appointments.list_by_specialty("Psicología").await?.len(),
            1
        );

        Ok(())
    }
}
