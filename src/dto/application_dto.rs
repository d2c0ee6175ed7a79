use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::application::ApplicationStatus;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitApplicationPayload {
    pub job_id: Uuid,
    #[validate(url(message = "Please provide a valid resume link"))]
    pub resume_url: String,
    #[serde(default)]
    #[validate(length(max = 5000, message = "Cover letter is too long"))]
    pub cover_letter: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AdminApplicationQuery {
    pub status: Option<ApplicationStatus>,
    pub job_id: Option<Uuid>,
}
