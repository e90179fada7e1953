//! Sistema de migrações para banco de dados
//!
//! Este módulo gerencia as migrações do banco de dados SQLite. A versão
//! aplicada fica em `PRAGMA user_version`.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::{error, info};

/// Lista de migrações SQL a serem aplicadas
const MIGRATIONS: &[&str] = &[
    // 001_initial_schema.sql
    r#"
    -- Tabela de consultas
    CREATE TABLE IF NOT EXISTS appointments (
        id TEXT PRIMARY KEY NOT NULL,
        full_name TEXT NOT NULL,
        national_id TEXT NOT NULL,
        contact_email TEXT NOT NULL,
        appointment_date DATE NOT NULL,
        specialty_name TEXT NOT NULL,
        doctor_name TEXT NOT NULL,
        location TEXT NOT NULL,
        state TEXT NOT NULL CHECK (state IN ('CONFIRMED', 'CANCELLED', 'REJECTED')),
        created_at TIMESTAMP NOT NULL,
        updated_at TIMESTAMP NOT NULL
    );

    -- Catálogo de especialidades
    CREATE TABLE IF NOT EXISTS specialties (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL UNIQUE,
        description TEXT NOT NULL,
        doctor_name TEXT NOT NULL,
        location TEXT NOT NULL,
        image_ref TEXT NOT NULL
    );

    -- Índices para as buscas por predicado
    CREATE INDEX IF NOT EXISTS idx_appointments_contact_email ON appointments (contact_email);
    CREATE INDEX IF NOT EXISTS idx_appointments_state ON appointments (state);
    CREATE INDEX IF NOT EXISTS idx_appointments_specialty ON appointments (specialty_name);
    CREATE INDEX IF NOT EXISTS idx_appointments_date ON appointments (appointment_date);
    "#,
    // 002_national_id_index.sql
    r#"
    CREATE INDEX IF NOT EXISTS idx_appointments_national_id ON appointments (national_id);
    "#,
];

/// Executa todas as migrações pendentes no banco de dados
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    info!("Aplicando migrações de banco de dados...");

    // Obter a versão atual do banco de dados
    let version: i64 = match sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(pool)
        .await
    {
        Ok(v) => v,
        Err(e) => {
            // Pode ser a primeira execução
            error!("Erro ao obter versão do banco: {}", e);
            0
        }
    };

    info!("Versão atual do banco: {}", version);

    for (i, migration_sql) in MIGRATIONS.iter().enumerate() {
        let migration_version = (i + 1) as i64;

        if migration_version <= version {
            info!("Migração {} já aplicada", migration_version);
            continue;
        }

        info!("Aplicando migração {}...", migration_version);

        // Cada migração roda em uma transação própria
        let mut transaction = pool.begin().await.with_context(|| {
            format!("Falha ao iniciar transação para migração {}", migration_version)
        })?;

        sqlx::query(migration_sql)
            .execute(&mut *transaction)
            .await
            .with_context(|| format!("Falha ao executar migração {}", migration_version))?;

        sqlx::query(&format!("PRAGMA user_version = {}", migration_version))
            .execute(&mut *transaction)
            .await
            .with_context(|| format!("Falha ao atualizar versão para {}", migration_version))?;

        transaction.commit().await.with_context(|| {
            format!("Falha ao confirmar transação para migração {}", migration_version)
        })?;

        info!("Migração {} aplicada com sucesso", migration_version);
    }

    info!("Migrações concluídas. Versão atual: {}", MIGRATIONS.len());
    Ok(())
}
