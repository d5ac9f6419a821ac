//! `/api/auth`: signup, login, logout and the current session.

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse},
    Json,
};
use serde::Serialize;
use tracing::info;
use vetclinic_core::{
    auth::{authenticate, register},
    models::{LoginInput, SignupInput, User},
};

use crate::error::{message, ApiError, ApiJson, ApiResult};
use crate::session::{expired_cookie, session_cookie, session_from_headers};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SignupBody {
    pub message: &'static str,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct LoginBody {
    pub message: &'static str,
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct SessionBody {
    pub user: User,
}

pub async fn signup(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<SignupInput>,
) -> ApiResult<(StatusCode, Json<SignupBody>)> {
    let user = state.db(move |db| register(db, input)).await?;
    Ok((
        StatusCode::CREATED,
        Json(SignupBody {
            message: "Usuario registrado",
            user,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<LoginInput>,
) -> ApiResult<impl IntoResponse> {
    let user = state.db(move |db| authenticate(db, input)).await?;
    let token = state
        .signer
        .issue(user.id, &user.email)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let cookie = session_cookie(&token, state.signer.ttl_secs(), state.auth.secure_cookie);
    info!(user_id = user.id, "Login succeeded");

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(LoginBody {
            message: "Login exitoso",
            token,
            user,
        }),
    ))
}

pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        AppendHeaders([(SET_COOKIE, expired_cookie(state.auth.secure_cookie))]),
        message("Sesión cerrada"),
    )
}

pub async fn session(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Json<SessionBody>> {
    let session = session_from_headers(&headers, &state.signer)
        .ok_or_else(|| ApiError::Unauthorized("No autenticado".into()))?;
    let user = state.db(move |db| db.get_user(session.user_id)).await?;
    Ok(Json(SessionBody { user }))
}
