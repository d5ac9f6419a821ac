//! `/api/veterinarios` and `/api/especialidades`

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use vetclinic_core::models::{Specialty, VeterinarianDetail, VeterinarianInput};

use crate::error::{message, parse_id, ApiJson, ApiResult, MessageBody};
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<VeterinarianDetail>>> {
    Ok(Json(state.db(|db| db.list_veterinarians()).await?))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<VeterinarianInput>,
) -> ApiResult<(StatusCode, Json<VeterinarianDetail>)> {
    let new = input.into_new()?;
    let created = state.db(move |db| db.create_veterinarian(&new)).await?;
    info!(id = created.veterinarian.id, "Created veterinarian");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<VeterinarianDetail>> {
    let id = parse_id(&id)?;
    Ok(Json(state.db(move |db| db.get_veterinarian(id)).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<VeterinarianInput>,
) -> ApiResult<Json<VeterinarianDetail>> {
    let id = parse_id(&id)?;
    let patch = input.into_patch()?;
    Ok(Json(state.db(move |db| db.update_veterinarian(id, patch)).await?))
}

pub async fn destroy(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<MessageBody>> {
    let id = parse_id(&id)?;
    state.db(move |db| db.delete_veterinarian(id)).await?;
    info!(id, "Deleted veterinarian");
    Ok(message("Veterinario eliminado correctamente"))
}

pub async fn specialties(State(state): State<AppState>) -> ApiResult<Json<Vec<Specialty>>> {
    Ok(Json(state.db(|db| db.list_specialties()).await?))
}
