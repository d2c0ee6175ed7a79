pub mod applications;
pub mod auth;
pub mod health;
pub mod interviews;
pub mod jobs;
pub mod notifications;

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};

use crate::middleware::{
    auth::{require_admin, require_session, require_student},
    rate_limit::{rps_middleware, RateLimiter},
};
use crate::AppState;

/// Full API surface. Credential endpoints share one per-client rate limiter;
/// everything else is grouped by the role its middleware admits.
pub fn router(state: AppState, limiter: RateLimiter) -> Router {
    let public_auth = Router::new()
        .route("/api/auth/signup", post(auth::sign_up))
        .route("/api/auth/signin", post(auth::sign_in))
        .route("/api/auth/refresh", post(auth::refresh))
        .route_layer(from_fn_with_state(limiter, rps_middleware));

    let signed_in = Router::new()
        .route("/api/auth/signout", post(auth::sign_out))
        .route("/api/me", get(auth::me))
        .route("/api/jobs/:id", get(jobs::get_job))
        .route("/api/notifications", get(notifications::list_notifications))
        .route(
            "/api/notifications/read-all",
            post(notifications::mark_all_read),
        )
        .route("/api/notifications/:id/read", post(notifications::mark_read))
        .route(
            "/api/notifications/:id",
            delete(notifications::delete_notification),
        )
        .route_layer(from_fn_with_state(state.clone(), require_session));

    let student = Router::new()
        .route("/api/jobs", get(jobs::list_open_jobs))
        .route(
            "/api/applications",
            get(applications::list_my_applications).post(applications::submit_application),
        )
        .route("/api/interviews", get(interviews::list_my_interviews))
        .route("/api/interviews/:id/join", post(interviews::join_interview))
        .route_layer(from_fn_with_state(state.clone(), require_student));

    let admin = Router::new()
        .route(
            "/api/admin/jobs",
            get(jobs::list_admin_jobs).post(jobs::create_job),
        )
        .route("/api/admin/jobs/:id", delete(jobs::delete_job))
        .route(
            "/api/admin/applications",
            get(applications::list_admin_applications),
        )
        .route(
            "/api/admin/applications/:id/shortlist",
            post(applications::shortlist_application),
        )
        .route(
            "/api/admin/applications/:id/reject",
            post(applications::reject_application),
        )
        .route(
            "/api/admin/applications/:id/interview",
            post(applications::schedule_interview),
        )
        .route(
            "/api/admin/interviews",
            get(interviews::list_admin_interviews),
        )
        .route(
            "/api/admin/interviews/:id/status",
            post(interviews::set_interview_status),
        )
        .route_layer(from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/health", get(health::health))
        .merge(public_auth)
        .merge(signed_in)
        .merge(student)
        .merge(admin)
        .with_state(state)
}
