use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::models::application::ApplicationStatus;

pub type Result<T> = std::result::Result<T, Error>;

const UNIQUE_VIOLATION: &str = "23505";
const APPLICATION_UNIQUE_KEY: &str = "applications_job_student_key";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("You have already applied for this job")]
    AlreadyApplied,

    #[error("Cannot move application from {from} to {to}")]
    InvalidTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },

    #[error("Identity provider error: {0}")]
    Identity(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Message safe to show an end user. Infrastructure failures collapse into a
    /// generic sentence; everything the user can act on keeps its detail.
    pub fn user_message(&self) -> String {
        match self {
            Error::BadRequest(msg)
            | Error::Unauthorized(msg)
            | Error::Forbidden(msg)
            | Error::NotFound(msg)
            | Error::Identity(msg) => msg.clone(),
            Error::AlreadyApplied | Error::InvalidTransition { .. } => self.to_string(),
            Error::Validation(err) => err.to_string(),
            Error::Json(_) => "The request could not be understood".to_string(),
            Error::Reqwest(_) => {
                "Could not reach the server. Please check your connection and try again."
                    .to_string()
            }
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Error::BadRequest(_) | Error::Validation(_) | Error::Json(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::AlreadyApplied | Error::InvalidTransition { .. } => StatusCode::CONFLICT,
            Error::Identity(_) => StatusCode::BAD_REQUEST,
            Error::Reqwest(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(json!({ "error": self.user_message() }));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(ref db)
                if db.code().as_deref() == Some(UNIQUE_VIOLATION)
                    && db.constraint() == Some(APPLICATION_UNIQUE_KEY) =>
            {
                Error::AlreadyApplied
            }
            other => Error::Database(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infrastructure_errors_are_not_leaked() {
        let err = Error::Internal("connection reset by peer".into());
        assert_eq!(err.user_message(), "Something went wrong. Please try again.");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn already_applied_is_a_conflict() {
        let err = Error::AlreadyApplied;
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.user_message(), "You have already applied for this job");
    }

    #[test]
    fn transition_message_names_both_states() {
        let err = Error::InvalidTransition {
            from: ApplicationStatus::Rejected,
            to: ApplicationStatus::Shortlisted,
        };
        assert_eq!(
            err.user_message(),
            "Cannot move application from rejected to shortlisted"
        );
    }
}
