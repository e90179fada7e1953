//! Rotas do catálogo de especialidades

use appointments_core::Specialty;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::error::{ApiError, ApiResult};
use crate::startup::AppState;

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Corpo de criação e de substituição de uma especialidade
#[derive(Debug, Deserialize, Validate)]
pub struct SpecialtyRequest {
    #[validate(custom = "not_blank")]
    pub name: String,
    #[validate(custom = "not_blank")]
    pub description: String,
    #[validate(custom = "not_blank")]
    pub doctor_name: String,
    #[validate(custom = "not_blank")]
    pub location: String,
    #[validate(custom = "not_blank")]
    pub image_ref: String,
}

impl From<SpecialtyRequest> for Specialty {
    fn from(request: SpecialtyRequest) -> Self {
        Specialty::new(
            request.name,
            request.description,
            request.doctor_name,
            request.location,
            request.image_ref,
        )
    }
}

pub async fn list_specialties(State(state): State<AppState>) -> ApiResult<Json<Vec<Specialty>>> {
    Ok(Json(state.specialties.list_all().await?))
}

pub async fn get_specialty(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Specialty>> {
    state
        .specialties
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("specialty not found: {id}")))
}

pub async fn get_specialty_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<Specialty>> {
    state
        .specialties
        .get_by_name(&name)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("specialty not found: {name}")))
}

pub async fn create_specialty(
    State(state): State<AppState>,
    payload: Result<Json<SpecialtyRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Specialty>)> {
    let Json(request) = payload?;
    request.validate()?;
    let created = state.specialties.create(request.into()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_specialty(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<SpecialtyRequest>, JsonRejection>,
) -> ApiResult<Json<Specialty>> {
    let Json(request) = payload?;
    request.validate()?;
    Ok(Json(state.specialties.update(&id, request.into()).await?))
}

pub async fn delete_specialty(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.specialties.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
