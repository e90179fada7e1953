//! Rotas de consultas
//!
//! `POST /appointments` recebe todos os campos como opcionais: a ausência de
//! um campo chega ao validador do núcleo, que devolve o motivo exato.

use appointments_core::{Appointment, AppointmentState};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::startup::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BookingRequest {
    pub full_name: Option<String>,
    pub national_id: Option<String>,
    pub contact_email: Option<String>,
    pub appointment_date: Option<NaiveDate>,
    pub specialty_name: Option<String>,
    pub doctor_name: Option<String>,
    pub location: Option<String>,
}

impl From<BookingRequest> for Appointment {
    fn from(request: BookingRequest) -> Self {
        Appointment {
            full_name: request.full_name.unwrap_or_default(),
            national_id: request.national_id.unwrap_or_default(),
            contact_email: request.contact_email.unwrap_or_default(),
            appointment_date: request.appointment_date,
            specialty_name: request.specialty_name.unwrap_or_default(),
            doctor_name: request.doctor_name.unwrap_or_default(),
            location: request.location.unwrap_or_default(),
            ..Appointment::default()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ContactQuery {
    pub email: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: String,
    pub end: String,
}

fn parse_state(raw: &str) -> ApiResult<AppointmentState> {
    raw.parse::<AppointmentState>()
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}

fn parse_date(raw: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest(format!("invalid date: {raw}")))
}

pub async fn book_appointment(
    State(state): State<AppState>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Appointment>)> {
    let Json(request) = payload?;
    let saved = state.appointments.book_appointment(request.into()).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn list_appointments(State(state): State<AppState>) -> ApiResult<Json<Vec<Appointment>>> {
    Ok(Json(state.appointments.list_all().await?))
}

pub async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Appointment>> {
    state
        .appointments
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("appointment not found: {id}")))
}

pub async fn cancel_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Appointment>> {
    Ok(Json(state.appointments.cancel(&id).await?))
}

pub async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.appointments.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `?email=` obrigatório; `?state=` restringe ao estado informado
pub async fn appointments_by_contact(
    State(state): State<AppState>,
    Query(query): Query<ContactQuery>,
) -> ApiResult<Json<Vec<Appointment>>> {
    let email = query.email.unwrap_or_default();
    let found = match query.state.as_deref() {
        Some(raw) => {
            let wanted = parse_state(raw)?;
            state
                .appointments
                .filter_by_contact_and_state(&email, wanted)
                .await?
        }
        None => state.appointments.get_by_contact(&email).await?,
    };
    Ok(Json(found))
}

pub async fn appointments_by_state(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> ApiResult<Json<Vec<Appointment>>> {
    let wanted = parse_state(&raw)?;
    Ok(Json(state.appointments.list_by_state(wanted).await?))
}

pub async fn count_by_state(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> ApiResult<Json<Value>> {
    let wanted = parse_state(&raw)?;
    let count = state.appointments.count_by_state(wanted).await?;
    Ok(Json(json!({ "state": wanted, "count": count })))
}

pub async fn appointments_by_specialty(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<Vec<Appointment>>> {
    Ok(Json(state.appointments.list_by_specialty(&name).await?))
}

pub async fn appointments_by_date(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> ApiResult<Json<Vec<Appointment>>> {
    let date = parse_date(&raw)?;
    Ok(Json(state.appointments.list_by_date(date).await?))
}

pub async fn appointments_between(
    State(state): State<AppState>,
    Query(range): Query<RangeQuery>,
) -> ApiResult<Json<Vec<Appointment>>> {
    let start = parse_date(&range.start)?;
    let end = parse_date(&range.end)?;
    Ok(Json(state.appointments.list_between(start, end).await?))
}

pub async fn appointments_by_patient(
    State(state): State<AppState>,
    Path(national_id): Path<String>,
) -> ApiResult<Json<Vec<Appointment>>> {
    Ok(Json(
        state.appointments.list_by_national_id(&national_id).await?,
    ))
}
