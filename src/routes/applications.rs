use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;

use crate::{
    dto::{
        application_dto::{AdminApplicationQuery, SubmitApplicationPayload},
        interview_dto::ScheduleInterviewPayload,
    },
    error::Result,
    session::viewer::{AdminProfile, StudentProfile},
    utils::time::now,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/applications",
    request_body = SubmitApplicationPayload,
    responses(
        (status = 201, description = "Application submitted", body = Json<Application>),
        (status = 400, description = "Invalid payload or deadline passed"),
        (status = 404, description = "Job not found"),
        (status = 409, description = "Already applied")
    )
)]
#[axum::debug_handler]
pub async fn submit_application(
    State(state): State<AppState>,
    Extension(student): Extension<StudentProfile>,
    Json(payload): Json<SubmitApplicationPayload>,
) -> Result<impl IntoResponse> {
    let application = state
        .application_service
        .submit(&student, payload, now())
        .await?;
    Ok((StatusCode::CREATED, Json(application)))
}

#[utoipa::path(
    get,
    path = "/api/applications",
    responses(
        (status = 200, description = "The caller's applications", body = Json<Vec<StudentApplication>>)
    )
)]
#[axum::debug_handler]
pub async fn list_my_applications(
    State(state): State<AppState>,
    Extension(student): Extension<StudentProfile>,
) -> Result<impl IntoResponse> {
    let applications = state.application_service.list_for_student(&student).await?;
    Ok(Json(applications))
}

#[utoipa::path(
    get,
    path = "/api/admin/applications",
    params(
        ("status" = Option<String>, Query, description = "Application status filter"),
        ("job_id" = Option<Uuid>, Query, description = "Restrict to one job")
    ),
    responses(
        (status = 200, description = "Applications to the caller's jobs", body = Json<Vec<JobApplication>>)
    )
)]
#[axum::debug_handler]
pub async fn list_admin_applications(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminProfile>,
    Query(query): Query<AdminApplicationQuery>,
) -> Result<impl IntoResponse> {
    let applications = state
        .application_service
        .list_for_admin(&admin, &query)
        .await?;
    Ok(Json(applications))
}

#[utoipa::path(
    post,
    path = "/api/admin/applications/{id}/shortlist",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Application shortlisted", body = Json<Application>),
        (status = 409, description = "Application is not pending")
    )
)]
#[axum::debug_handler]
pub async fn shortlist_application(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminProfile>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let application = state.lifecycle_service.shortlist(&admin, id).await?;
    Ok(Json(application))
}

#[utoipa::path(
    post,
    path = "/api/admin/applications/{id}/reject",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Application rejected", body = Json<Application>),
        (status = 409, description = "Application is not pending")
    )
)]
#[axum::debug_handler]
pub async fn reject_application(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminProfile>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let application = state.lifecycle_service.reject(&admin, id).await?;
    Ok(Json(application))
}

#[utoipa::path(
    post,
    path = "/api/admin/applications/{id}/interview",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    request_body = ScheduleInterviewPayload,
    responses(
        (status = 201, description = "Interview scheduled", body = Json<ScheduledInterviewResponse>),
        (status = 400, description = "Date not in the future"),
        (status = 409, description = "Application is not shortlisted")
    )
)]
#[axum::debug_handler]
pub async fn schedule_interview(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminProfile>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ScheduleInterviewPayload>,
) -> Result<impl IntoResponse> {
    let scheduled = state
        .lifecycle_service
        .schedule_interview(&admin, id, payload, now())
        .await?;
    Ok((StatusCode::CREATED, Json(scheduled)))
}
