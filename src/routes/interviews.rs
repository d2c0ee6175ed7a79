use axum::{
    extract::{Extension, Path, State},
    response::{IntoResponse, Json},
};
use uuid::Uuid;

use crate::{
    dto::interview_dto::{InterviewStatusPayload, JoinInterviewPayload},
    error::Result,
    session::viewer::{AdminProfile, StudentProfile},
    utils::time::now,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/interviews",
    responses(
        (status = 200, description = "The caller's interviews", body = Json<Vec<StudentInterview>>)
    )
)]
#[axum::debug_handler]
pub async fn list_my_interviews(
    State(state): State<AppState>,
    Extension(student): Extension<StudentProfile>,
) -> Result<impl IntoResponse> {
    let interviews = state
        .interview_service
        .list_for_student(&student, now())
        .await?;
    Ok(Json(interviews))
}

#[utoipa::path(
    get,
    path = "/api/admin/interviews",
    responses(
        (status = 200, description = "Interviews for the caller's jobs", body = Json<Vec<AdminInterview>>)
    )
)]
#[axum::debug_handler]
pub async fn list_admin_interviews(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminProfile>,
) -> Result<impl IntoResponse> {
    let interviews = state
        .interview_service
        .list_for_admin(&admin, now())
        .await?;
    Ok(Json(interviews))
}

#[utoipa::path(
    post,
    path = "/api/interviews/{id}/join",
    params(
        ("id" = Uuid, Path, description = "Interview ID")
    ),
    request_body = JoinInterviewPayload,
    responses(
        (status = 200, description = "Meeting link", body = Json<JoinResponse>),
        (status = 400, description = "Wrong passcode or interview not open"),
        (status = 404, description = "Interview not found")
    )
)]
#[axum::debug_handler]
pub async fn join_interview(
    State(state): State<AppState>,
    Extension(student): Extension<StudentProfile>,
    Path(id): Path<Uuid>,
    Json(payload): Json<JoinInterviewPayload>,
) -> Result<impl IntoResponse> {
    let joined = state
        .interview_service
        .join(&student, id, payload, now())
        .await?;
    Ok(Json(joined))
}

#[utoipa::path(
    post,
    path = "/api/admin/interviews/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Interview ID")
    ),
    request_body = InterviewStatusPayload,
    responses(
        (status = 200, description = "Interview updated", body = Json<Interview>),
        (status = 400, description = "Interview already closed"),
        (status = 403, description = "Interview belongs to another admin")
    )
)]
#[axum::debug_handler]
pub async fn set_interview_status(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminProfile>,
    Path(id): Path<Uuid>,
    Json(payload): Json<InterviewStatusPayload>,
) -> Result<impl IntoResponse> {
    let interview = state
        .interview_service
        .set_status(&admin, id, payload.status)
        .await?;
    Ok(Json(interview))
}
