use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::access::AccessStatus;
use crate::models::application::Application;
use crate::models::interview::{Interview, InterviewDetails, InterviewStatus};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScheduleInterviewPayload {
    pub scheduled_date: DateTime<Utc>,
    /// Generated when absent.
    #[validate(length(min = 4, max = 32, message = "Passcode must be 4 to 32 characters"))]
    pub passcode: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct JoinInterviewPayload {
    #[validate(length(min = 1, message = "Passcode is required"))]
    pub passcode: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewStatusPayload {
    pub status: InterviewStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledInterviewResponse {
    pub interview: Interview,
    pub application: Application,
}

/// Student view: no passcode and no meeting link until the gate is passed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentInterview {
    pub id: Uuid,
    pub application_id: Uuid,
    pub job_id: Uuid,
    pub job_title: String,
    pub scheduled_date: DateTime<Utc>,
    pub status: InterviewStatus,
    pub access_status: AccessStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminInterview {
    #[serde(flatten)]
    pub details: InterviewDetails,
    pub access_status: AccessStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinResponse {
    pub meeting_url: String,
}

impl StudentInterview {
    pub fn from_details(details: InterviewDetails, now: DateTime<Utc>) -> Self {
        let access_status = details.interview.access_status(now);
        Self {
            id: details.interview.id,
            application_id: details.interview.application_id,
            job_id: details.job_id,
            job_title: details.job_title,
            scheduled_date: details.interview.scheduled_date,
            status: details.interview.status,
            access_status,
        }
    }
}

impl AdminInterview {
    pub fn from_details(details: InterviewDetails, now: DateTime<Utc>) -> Self {
        let access_status = details.interview.access_status(now);
        Self {
            details,
            access_status,
        }
    }
}
