use axum::{extract::State, Extension, Json};
use tracing::debug;
use vetclinic_core::{models::ClinicSummary, Session};

use crate::error::ApiResult;
use crate::state::AppState;

/// Landing data for the management panel. The gate attaches the session
/// when `/dashboard` is among the protected prefixes.
pub async fn summary(
    State(state): State<AppState>,
    session: Option<Extension<Session>>,
) -> ApiResult<Json<ClinicSummary>> {
    if let Some(Extension(session)) = session {
        debug!(user_id = session.user_id, "Dashboard summary");
    }
    Ok(Json(state.db(|db| db.summary()).await?))
}
