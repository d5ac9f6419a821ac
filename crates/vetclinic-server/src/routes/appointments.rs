//! `/api/citas`

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use vetclinic_core::models::{AppointmentDetail, AppointmentInput};

use crate::error::{message, parse_id, ApiJson, ApiResult, MessageBody};
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<AppointmentDetail>>> {
    Ok(Json(state.db(|db| db.list_appointments()).await?))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<AppointmentInput>,
) -> ApiResult<(StatusCode, Json<AppointmentDetail>)> {
    let new = input.into_new()?;
    let created = state.db(move |db| db.create_appointment(&new)).await?;
    info!(
        id = created.appointment.id,
        pet_id = created.pet.id,
        veterinarian_id = created.veterinarian.id,
        "Booked appointment"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<AppointmentDetail>> {
    let id = parse_id(&id)?;
    Ok(Json(state.db(move |db| db.get_appointment(id)).await?))
}

/// Serves both PUT and PATCH.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<AppointmentInput>,
) -> ApiResult<Json<AppointmentDetail>> {
    let id = parse_id(&id)?;
    let patch = input.into_patch()?;
    Ok(Json(state.db(move |db| db.update_appointment(id, patch)).await?))
}

pub async fn destroy(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<MessageBody>> {
    let id = parse_id(&id)?;
    state.db(move |db| db.delete_appointment(id)).await?;
    info!(id, "Deleted appointment");
    Ok(message("Cita eliminada correctamente"))
}
