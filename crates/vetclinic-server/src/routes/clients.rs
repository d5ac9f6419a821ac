//! `/api/clientes`

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use vetclinic_core::models::{ClientDetail, ClientInput};

use crate::error::{message, parse_id, ApiJson, ApiResult, MessageBody};
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<ClientDetail>>> {
    Ok(Json(state.db(|db| db.list_clients()).await?))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ClientInput>,
) -> ApiResult<(StatusCode, Json<ClientDetail>)> {
    let new = input.into_new()?;
    let created = state.db(move |db| db.create_client(&new)).await?;
    info!(id = created.client.id, "Created client");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<ClientDetail>> {
    let id = parse_id(&id)?;
    Ok(Json(state.db(move |db| db.get_client(id)).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<ClientInput>,
) -> ApiResult<Json<ClientDetail>> {
    let id = parse_id(&id)?;
    let patch = input.into_patch()?;
    Ok(Json(state.db(move |db| db.update_client(id, patch)).await?))
}

pub async fn destroy(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<MessageBody>> {
    let id = parse_id(&id)?;
    state.db(move |db| db.delete_client(id)).await?;
    info!(id, "Deleted client");
    Ok(message("Cliente eliminado correctamente"))
}
