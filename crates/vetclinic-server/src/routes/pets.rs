//! `/api/mascotas`

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use vetclinic_core::models::{PetDetail, PetInput};

use crate::error::{message, parse_id, ApiJson, ApiResult, MessageBody};
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<PetDetail>>> {
    Ok(Json(state.db(|db| db.list_pets()).await?))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<PetInput>,
) -> ApiResult<(StatusCode, Json<PetDetail>)> {
    let new = input.into_new()?;
    let created = state.db(move |db| db.create_pet(&new)).await?;
    info!(id = created.pet.id, client_id = created.client.id, "Created pet");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<PetDetail>> {
    let id = parse_id(&id)?;
    Ok(Json(state.db(move |db| db.get_pet(id)).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<PetInput>,
) -> ApiResult<Json<PetDetail>> {
    let id = parse_id(&id)?;
    let patch = input.into_patch()?;
    Ok(Json(state.db(move |db| db.update_pet(id, patch)).await?))
}

pub async fn destroy(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<MessageBody>> {
    let id = parse_id(&id)?;
    state.db(move |db| db.delete_pet(id)).await?;
    info!(id, "Deleted pet");
    Ok(message("Mascota eliminada correctamente"))
}
