//! Session cookie handling and the gate in front of protected pages.

use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue,
    },
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;
use vetclinic_core::{Session, TokenSigner};

use crate::state::AppState;

pub const SESSION_COOKIE: &str = "token";

/// Pages that bounce an already logged-in visitor to `/`.
const AUTH_PAGES: &[&str] = &["/login", "/signup"];

pub fn session_cookie(token: &str, ttl_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; Path=/; Max-Age={}; SameSite=Lax",
        SESSION_COOKIE, token, ttl_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn expired_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}

/// The `token` cookie, if the request carries one.
pub fn cookie_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Token from the cookie, falling back to `Authorization: Bearer`.
pub fn request_token(headers: &HeaderMap) -> Option<String> {
    cookie_token(headers).or_else(|| {
        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
    })
}

pub fn session_from_headers(headers: &HeaderMap, signer: &TokenSigner) -> Option<Session> {
    let token = request_token(headers)?;
    signer.verify(&token).ok().map(Session::from)
}

fn is_protected(path: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|prefix| {
        path == prefix
            || path
                .strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

fn with_cleared_cookie(mut response: Response, secure: bool) -> Response {
    if let Ok(value) = HeaderValue::from_str(&expired_cookie(secure)) {
        response.headers_mut().append(SET_COOKIE, value);
    }
    response
}

/// Middleware guarding protected prefixes. `/api` is never gated.
pub async fn session_gate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    if path == "/api" || path.starts_with("/api/") {
        return next.run(request).await;
    }

    let secure = state.auth.secure_cookie;
    let token = cookie_token(request.headers());

    if AUTH_PAGES.contains(&path.as_str()) {
        return match token.map(|t| state.signer.verify(&t)) {
            Some(Ok(_)) => Redirect::to("/").into_response(),
            Some(Err(e)) => {
                debug!(%path, error = %e, "Clearing invalid session");
                with_cleared_cookie(next.run(request).await, secure)
            }
            None => next.run(request).await,
        };
    }

    if !is_protected(&path, &state.auth.protected_prefixes) {
        return next.run(request).await;
    }

    let Some(token) = token else {
        return Redirect::to("/login").into_response();
    };
    match state.signer.verify(&token) {
        Ok(claims) => {
            request.extensions_mut().insert(Session::from(claims));
            next.run(request).await
        }
        Err(e) => {
            debug!(%path, error = %e, "Rejected session");
            with_cleared_cookie(Redirect::to("/login").into_response(), secure)
        }
    }
}
