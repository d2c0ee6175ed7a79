use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "interview_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InterviewStatus {
    Scheduled,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Interview {
    pub id: Uuid,
    pub application_id: Uuid,
    pub scheduled_date: DateTime<Utc>,
    pub passcode: String,
    pub meeting_url: String,
    pub status: InterviewStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewInterview {
    pub application_id: Uuid,
    pub scheduled_date: DateTime<Utc>,
    pub passcode: String,
    pub meeting_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct InterviewDetails {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub interview: Interview,
    pub job_id: Uuid,
    pub job_title: String,
    pub student_id: Uuid,
    pub student_name: String,
}
