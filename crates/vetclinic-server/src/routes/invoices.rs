//! `/api/facturas`

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use vetclinic_core::models::{InvoiceDetail, InvoiceInput};

use crate::error::{message, parse_id, ApiJson, ApiResult, MessageBody};
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<InvoiceDetail>>> {
    Ok(Json(state.db(|db| db.list_invoices()).await?))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<InvoiceInput>,
) -> ApiResult<(StatusCode, Json<InvoiceDetail>)> {
    let new = input.into_new()?;
    let created = state.db(move |db| db.create_invoice(&new)).await?;
    info!(
        id = created.invoice.id,
        lines = created.lines.len(),
        total = created.invoice.total,
        "Created invoice"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<InvoiceDetail>> {
    let id = parse_id(&id)?;
    Ok(Json(state.db(move |db| db.get_invoice(id)).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<InvoiceInput>,
) -> ApiResult<Json<InvoiceDetail>> {
    let id = parse_id(&id)?;
    let patch = input.into_patch()?;
    Ok(Json(state.db(move |db| db.update_invoice(id, patch)).await?))
}

pub async fn destroy(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<MessageBody>> {
    let id = parse_id(&id)?;
    state.db(move |db| db.delete_invoice(id)).await?;
    info!(id, "Deleted invoice");
    Ok(message("Factura eliminada correctamente"))
}
