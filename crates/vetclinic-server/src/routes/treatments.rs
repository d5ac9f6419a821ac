//! `/api/tratamientos`

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use vetclinic_core::models::{TreatmentDetail, TreatmentInput};

use crate::error::{message, parse_id, ApiJson, ApiResult, MessageBody};
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<TreatmentDetail>>> {
    Ok(Json(state.db(|db| db.list_treatments()).await?))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<TreatmentInput>,
) -> ApiResult<(StatusCode, Json<TreatmentDetail>)> {
    let new = input.into_new()?;
    let created = state.db(move |db| db.create_treatment(&new)).await?;
    info!(id = created.treatment.id, "Created treatment");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<TreatmentDetail>> {
    let id = parse_id(&id)?;
    Ok(Json(state.db(move |db| db.get_treatment(id)).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<TreatmentInput>,
) -> ApiResult<Json<TreatmentDetail>> {
    let id = parse_id(&id)?;
    let patch = input.into_patch()?;
    Ok(Json(state.db(move |db| db.update_treatment(id, patch)).await?))
}

pub async fn destroy(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<MessageBody>> {
    let id = parse_id(&id)?;
    state.db(move |db| db.delete_treatment(id)).await?;
    info!(id, "Deleted treatment");
    Ok(message("Tratamiento eliminado correctamente"))
}
