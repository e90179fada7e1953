use std::sync::Arc;

use appointments_api::startup::{router, AppState};
use appointments_core::clock::ManualClock;
use appointments_core::store::{InMemoryAppointmentStore, InMemorySpecialtyStore};
use appointments_core::{AppointmentService, FieldValidator, SpecialtyService};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

/// "Hoje" para todos os testes da API
pub const TODAY: &str = "2030-01-10";

pub struct TestApp {
    pub router: Router,
}

pub async fn spawn_app() -> TestApp {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2030, 1, 10, 9, 0, 0).unwrap(),
    ));
    let appointments = AppointmentService::new(
        Arc::new(InMemoryAppointmentStore::new()),
        Arc::new(FieldValidator),
        clock,
    );
    let specialties = SpecialtyService::new(Arc::new(InMemorySpecialtyStore::new()));
    specialties.seed_defaults().await.unwrap();

    TestApp {
        router: router(AppState::new(appointments, specialties), 16),
    }
}

pub fn booking(date: &str) -> Value {
    json!({
        "full_name": "Juan Pérez",
        "national_id": "12345678",
        "contact_email": "juan@x.com",
        "appointment_date": date,
        "specialty_name": "Psicología",
        "doctor_name": "Dra. Ana García",
        "location": "Consulta 201 - Piso 2",
    })
}

impl TestApp {
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        match body {
            Some(json) => self.send(method, uri, Body::from(json.to_string())).await,
            None => self.send(method, uri, Body::empty()).await,
        }
    }

    /// Envia o corpo sem serializar, para testar JSON inválido
    pub async fn request_raw(&self, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
        self.send(method, uri, Body::from(body.to_string())).await
    }

    async fn send(&self, method: Method, uri: &str, body: Body) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    /// Agenda e devolve o id gerado
    pub async fn book(&self, date: &str) -> String {
        let (status, body) = self
            .request(Method::POST, "/appointments", Some(booking(date)))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().to_string()
    }
}
