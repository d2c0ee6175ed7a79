use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateJobPayload {
    #[validate(custom(function = "crate::utils::validation::validate_not_blank"))]
    pub title: String,
    #[validate(custom(function = "crate::utils::validation::validate_not_blank"))]
    pub description: String,
    #[serde(default)]
    pub skills_required: Vec<String>,
    pub application_deadline: DateTime<Utc>,
    #[validate(range(min = 1, message = "At least one opening is required"))]
    pub openings_count: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JobQuery {
    /// Keep jobs requiring this skill (case-insensitive).
    pub skill: Option<String>,
    /// Substring match on title or description (case-insensitive).
    pub search: Option<String>,
}
