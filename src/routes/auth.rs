use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::auth_dto::{AuthResponse, MeResponse, RefreshPayload, SignInPayload, SignUpPayload},
    error::Result,
    identity::AuthUser,
    middleware::auth::AccessToken,
    session::viewer::Viewer,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignUpPayload,
    responses(
        (status = 201, description = "Account created", body = Json<AuthResponse>),
        (status = 400, description = "Invalid payload or provider refusal")
    )
)]
#[axum::debug_handler]
pub async fn sign_up(
    State(state): State<AppState>,
    Json(payload): Json<SignUpPayload>,
) -> Result<impl IntoResponse> {
    let signup = state.auth_service.sign_up(&payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: signup.user,
            session: signup.session,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/signin",
    request_body = SignInPayload,
    responses(
        (status = 200, description = "Signed in", body = Json<AuthResponse>),
        (status = 400, description = "Invalid credentials")
    )
)]
#[axum::debug_handler]
pub async fn sign_in(
    State(state): State<AppState>,
    Json(payload): Json<SignInPayload>,
) -> Result<impl IntoResponse> {
    let session = state.auth_service.sign_in(&payload).await?;
    Ok(Json(AuthResponse {
        user: session.user.clone(),
        session: Some(session),
    }))
}

#[utoipa::path(
    post,
    path = "/api/auth/signout",
    responses(
        (status = 204, description = "Signed out"),
        (status = 401, description = "Missing or invalid token")
    )
)]
#[axum::debug_handler]
pub async fn sign_out(
    State(state): State<AppState>,
    Extension(token): Extension<AccessToken>,
) -> Result<impl IntoResponse> {
    state.auth_service.sign_out(&token.0).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshPayload,
    responses(
        (status = 200, description = "Session refreshed", body = Json<AuthResponse>),
        (status = 400, description = "Refresh token rejected")
    )
)]
#[axum::debug_handler]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let session = state.auth_service.refresh(&payload.refresh_token).await?;
    Ok(Json(AuthResponse {
        user: session.user.clone(),
        session: Some(session),
    }))
}

#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Current user and profile", body = Json<MeResponse>),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Profile could not be set up")
    )
)]
#[axum::debug_handler]
pub async fn me(
    Extension(user): Extension<AuthUser>,
    Extension(viewer): Extension<Viewer>,
) -> Result<impl IntoResponse> {
    Ok(Json(MeResponse {
        user,
        profile: viewer.into_profile(),
    }))
}
