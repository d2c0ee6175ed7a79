use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::error::Error;
use crate::identity::AuthUser;
use crate::session::viewer::Viewer;
use crate::utils::jwt::decode_access_token;
use crate::AppState;

/// Raw bearer token of the current request, kept for sign-out.
#[derive(Debug, Clone)]
pub struct AccessToken(pub String);

fn reject(status: StatusCode, code: &str) -> Response {
    (status, Json(json!({ "error": code }))).into_response()
}

fn bearer_token(req: &Request) -> Result<String, Response> {
    let Some(auth_header) = req.headers().get(AUTHORIZATION) else {
        return Err(reject(StatusCode::UNAUTHORIZED, "missing_authorization"));
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return Err(reject(StatusCode::UNAUTHORIZED, "bad_authorization"));
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return Err(reject(StatusCode::UNAUTHORIZED, "unsupported_scheme"));
    };
    Ok(token.trim().to_string())
}

/// Verifies the bearer token and reconciles the caller's profile.
async fn authenticate(state: &AppState, token: String) -> Result<(AccessToken, AuthUser, Viewer), Response> {
    let user = decode_access_token(&token, &state.jwt_secret)
        .and_then(|claims| claims.to_user())
        .map_err(|_| reject(StatusCode::UNAUTHORIZED, "invalid_token"))?;
    let viewer = state
        .auth_service
        .resolve_viewer(&user)
        .await
        .map_err(Error::into_response)?;
    Ok((AccessToken(token), user, viewer))
}

fn attach(req: &mut Request, token: AccessToken, user: AuthUser, viewer: Viewer) {
    let extensions = req.extensions_mut();
    extensions.insert(token);
    extensions.insert(user);
    extensions.insert(viewer);
}

pub async fn require_session(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let token = match bearer_token(&req) {
        Ok(token) => token,
        Err(resp) => return resp,
    };
    match authenticate(&state, token).await {
        Ok((token, user, viewer)) => {
            attach(&mut req, token, user, viewer);
            next.run(req).await
        }
        Err(resp) => resp,
    }
}

pub async fn require_admin(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let token = match bearer_token(&req) {
        Ok(token) => token,
        Err(resp) => return resp,
    };
    match authenticate(&state, token).await {
        Ok((token, user, viewer)) => {
            let Some(admin) = viewer.as_admin().cloned() else {
                return reject(StatusCode::FORBIDDEN, "forbidden");
            };
            req.extensions_mut().insert(admin);
            attach(&mut req, token, user, viewer);
            next.run(req).await
        }
        Err(resp) => resp,
    }
}

pub async fn require_student(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let token = match bearer_token(&req) {
        Ok(token) => token,
        Err(resp) => return resp,
    };
    match authenticate(&state, token).await {
        Ok((token, user, viewer)) => {
            let Some(student) = viewer.as_student().cloned() else {
                return reject(StatusCode::FORBIDDEN, "forbidden");
            };
            req.extensions_mut().insert(student);
            attach(&mut req, token, user, viewer);
            next.run(req).await
        }
        Err(resp) => resp,
    }
}
