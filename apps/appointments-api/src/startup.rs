//! Montagem do estado, do roteador e do servidor HTTP

use std::net::TcpListener;
use std::sync::Arc;

use anyhow::{Context, Result};
use appointments_core::store::{
    InMemoryAppointmentStore, InMemorySpecialtyStore, SqliteAppointmentStore,
    SqliteSpecialtyStore,
};
use appointments_core::{
    init_db_pool, AppointmentService, AppointmentStore, SpecialtyService, SpecialtyStore,
};
use axum::routing::{get, put};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::{Settings, StorageBackend};
use crate::routes::*;

/// Serviços compartilhados entre os handlers
#[derive(Clone)]
pub struct AppState {
    pub appointments: AppointmentService,
    pub specialties: SpecialtyService,
}

impl AppState {
    pub fn new(appointments: AppointmentService, specialties: SpecialtyService) -> Self {
        Self {
            appointments,
            specialties,
        }
    }

    /// Cria os armazenamentos do backend configurado e, se pedido, carrega o catálogo
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        let (appointment_store, specialty_store): (
            Arc<dyn AppointmentStore>,
            Arc<dyn SpecialtyStore>,
        ) = match settings.database.backend {
            StorageBackend::Sqlite => {
                let pool = init_db_pool(&settings.database.db_config()).await?;
                (
                    Arc::new(SqliteAppointmentStore::new(pool.clone())),
                    Arc::new(SqliteSpecialtyStore::new(pool)),
                )
            }
            StorageBackend::Memory => (
                Arc::new(InMemoryAppointmentStore::new()),
                Arc::new(InMemorySpecialtyStore::new()),
            ),
        };

        let state = Self::new(
            AppointmentService::with_defaults(appointment_store),
            SpecialtyService::new(specialty_store),
        );

        if settings.catalog.seed_on_startup {
            let inserted = state
                .specialties
                .seed_defaults()
                .await
                .context("Falha ao carregar o catálogo de especialidades")?;
            info!("{} especialidades carregadas na inicialização", inserted);
        }

        Ok(state)
    }
}

pub fn router(state: AppState, max_concurrent_requests: usize) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/appointments",
            get(list_appointments).post(book_appointment),
        )
        .route("/appointments/contact", get(appointments_by_contact))
        .route("/appointments/range", get(appointments_between))
        .route("/appointments/state/:state", get(appointments_by_state))
        .route("/appointments/state/:state/count", get(count_by_state))
        .route("/appointments/specialty/:name", get(appointments_by_specialty))
        .route("/appointments/date/:date", get(appointments_by_date))
        .route(
            "/appointments/patient/:national_id",
            get(appointments_by_patient),
        )
        .route(
            "/appointments/:id",
            get(get_appointment).delete(delete_appointment),
        )
        .route("/appointments/:id/cancel", put(cancel_appointment))
        .route(
            "/specialties",
            get(list_specialties).post(create_specialty),
        )
        .route("/specialties/name/:name", get(get_specialty_by_name))
        .route(
            "/specialties/:id",
            get(get_specialty)
                .put(update_specialty)
                .delete(delete_specialty),
        )
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive())
                .layer(ConcurrencyLimitLayer::new(max_concurrent_requests)),
        )
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(settings: Settings) -> Result<Self> {
        let address = format!("{}:{}", settings.server.host, settings.server.port);
        let listener = TcpListener::bind(&address)
            .with_context(|| format!("Falha ao abrir {}", address))?;
        let port = listener.local_addr()?.port();

        let state = AppState::from_settings(&settings).await?;
        let router = router(state, settings.server.max_concurrent_requests);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<()> {
        info!("API de consultas ouvindo na porta {}", self.port);
        axum::Server::from_tcp(self.listener)?
            .serve(self.router.into_make_service())
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        info!("Servidor encerrado");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Falha ao instalar o handler de Ctrl-C: {}", e);
        return std::future::pending::<()>().await;
    }
    info!("Sinal de parada recebido, encerrando...");
}
