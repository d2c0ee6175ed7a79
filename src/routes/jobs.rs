use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;

use crate::{
    dto::job_dto::{CreateJobPayload, JobQuery},
    error::Result,
    session::viewer::AdminProfile,
    utils::time::now,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/jobs",
    params(
        ("skill" = Option<String>, Query, description = "Only jobs requiring this skill"),
        ("search" = Option<String>, Query, description = "Title or description contains")
    ),
    responses(
        (status = 200, description = "Jobs still accepting applications", body = Json<Vec<Job>>)
    )
)]
#[axum::debug_handler]
pub async fn list_open_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobQuery>,
) -> Result<impl IntoResponse> {
    let jobs = state.job_service.list_open(now(), &query).await?;
    Ok(Json(jobs))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job detail", body = Json<Job>),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.get(id).await?;
    Ok(Json(job))
}

#[utoipa::path(
    post,
    path = "/api/admin/jobs",
    request_body = CreateJobPayload,
    responses(
        (status = 201, description = "Job posted", body = Json<Job>),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminProfile>,
    Json(payload): Json<CreateJobPayload>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.create(&admin, payload, now()).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

#[utoipa::path(
    get,
    path = "/api/admin/jobs",
    responses(
        (status = 200, description = "Jobs posted by the caller", body = Json<Vec<Job>>)
    )
)]
#[axum::debug_handler]
pub async fn list_admin_jobs(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminProfile>,
) -> Result<impl IntoResponse> {
    let jobs = state.job_service.list_for_admin(&admin).await?;
    Ok(Json(jobs))
}

#[utoipa::path(
    delete,
    path = "/api/admin/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 204, description = "Job deleted"),
        (status = 403, description = "Job belongs to another admin"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_job(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminProfile>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.job_service.delete(&admin, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
