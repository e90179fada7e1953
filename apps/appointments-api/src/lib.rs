//! Appointments API - servidor HTTP sobre `appointments-core`
//!
//! Expõe o agendamento de consultas e o catálogo de especialidades em JSON.

pub mod config;
pub mod error;
pub mod routes;
pub mod startup;
pub mod telemetry;

/// Informações geradas em tempo de build
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}
