//! Configuração da API
//!
//! Ordem de precedência: valores padrão, arquivo opcional
//! `config/appointments-api.toml` e variáveis de ambiente com prefixo
//! `APPOINTMENTS` (ex.: `APPOINTMENTS__SERVER__PORT=9000`).

use appointments_core::DbConfig;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
    pub catalog: CatalogSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Limite de requisições atendidas ao mesmo tempo
    pub max_concurrent_requests: usize,
}

/// Onde as consultas e especialidades são guardadas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub backend: StorageBackend,
    pub db_path: String,
    pub max_connections: u32,
}

impl DatabaseSettings {
    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            db_path: self.db_path.clone(),
            max_connections: self.max_connections,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    /// Carrega as especialidades padrão quando o catálogo está vazio
    pub seed_on_startup: bool,
}

fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    let defaults = DbConfig::default();
    Config::builder()
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8080_i64)?
        .set_default("server.max_concurrent_requests", 256_i64)?
        .set_default("database.backend", "sqlite")?
        .set_default("database.db_path", defaults.db_path)?
        .set_default("database.max_connections", defaults.max_connections as i64)?
        .set_default("logging.format", "pretty")?
        .set_default("catalog.seed_on_startup", true)
}

/// Lê a configuração a partir do arquivo e do ambiente
pub fn get_configuration() -> Result<Settings, ConfigError> {
    builder()?
        .add_source(File::with_name("config/appointments-api").required(false))
        .add_source(
            Environment::with_prefix("APPOINTMENTS")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_complete() {
        let settings: Settings = builder().unwrap().build().unwrap().try_deserialize().unwrap();

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.database.backend, StorageBackend::Sqlite);
        assert_eq!(settings.database.db_path, "data/appointments.db");
        assert_eq!(settings.logging.format, LogFormat::Pretty);
        assert!(settings.catalog.seed_on_startup);
    }

    #[test]
    fn overrides_replace_defaults() {
        let settings: Settings = builder()
            .unwrap()
            .set_override("database.backend", "memory")
            .unwrap()
            .set_override("logging.format", "json")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.database.backend, StorageBackend::Memory);
        assert_eq!(settings.logging.format, LogFormat::Json);
        assert_eq!(settings.database.db_config().max_connections, 5);
    }
}
