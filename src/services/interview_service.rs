use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::domain::access::{passcode_matches, AccessStatus};
use crate::dto::interview_dto::{AdminInterview, JoinInterviewPayload, JoinResponse, StudentInterview};
use crate::error::{Error, Result};
use crate::gateway::RecordStore;
use crate::models::interview::{Interview, InterviewStatus};
use crate::models::job::JobFilter;
use crate::session::viewer::{AdminProfile, StudentProfile};

#[derive(Clone)]
pub struct InterviewService {
    store: Arc<dyn RecordStore>,
}

impl InterviewService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn list_for_student(
        &self,
        student: &StudentProfile,
        now: DateTime<Utc>,
    ) -> Result<Vec<StudentInterview>> {
        let application_ids: Vec<Uuid> = self
            .store
            .list_student_applications(student.id)
            .await?
            .into_iter()
            .map(|a| a.application.id)
            .collect();
        let rows = self.store.list_interviews(&application_ids).await?;
        Ok(rows
            .into_iter()
            .map(|d| StudentInterview::from_details(d, now))
            .collect())
    }

    pub async fn list_for_admin(
        &self,
        admin: &AdminProfile,
        now: DateTime<Utc>,
    ) -> Result<Vec<AdminInterview>> {
        let job_ids: Vec<Uuid> = self
            .store
            .list_jobs(JobFilter {
                created_by: Some(admin.id),
                open_at: None,
            })
            .await?
            .into_iter()
            .map(|j| j.id)
            .collect();
        let application_ids: Vec<Uuid> = self
            .store
            .list_job_applications(&job_ids)
            .await?
            .into_iter()
            .map(|a| a.application.id)
            .collect();
        let rows = self.store.list_interviews(&application_ids).await?;
        Ok(rows
            .into_iter()
            .map(|d| AdminInterview::from_details(d, now))
            .collect())
    }

    /// Hands out the meeting link once the passcode matches and the interview
    /// window is open. The link itself is unauthenticated; this is a
    /// convenience gate, not a security boundary.
    pub async fn join(
        &self,
        student: &StudentProfile,
        interview_id: Uuid,
        payload: JoinInterviewPayload,
        now: DateTime<Utc>,
    ) -> Result<JoinResponse> {
        payload.validate()?;
        let details = self
            .store
            .get_interview(interview_id)
            .await?
            .filter(|d| d.student_id == student.id)
            .ok_or_else(|| Error::NotFound("Interview not found".into()))?;

        let access = details.interview.access_status(now);
        if !access.can_join() {
            return Err(Error::BadRequest(join_refusal(access).into()));
        }
        if !passcode_matches(&details.interview.passcode, &payload.passcode) {
            return Err(Error::BadRequest("Invalid passcode".into()));
        }

        tracing::info!(interview_id = %interview_id, student_id = %student.id, "interview joined");
        Ok(JoinResponse {
            meeting_url: details.interview.meeting_url,
        })
    }

    /// Closes out an interview. The application keeps its
    /// `interview_scheduled` status.
    pub async fn set_status(
        &self,
        admin: &AdminProfile,
        interview_id: Uuid,
        status: InterviewStatus,
    ) -> Result<Interview> {
        let details = self
            .store
            .get_interview(interview_id)
            .await?
            .ok_or_else(|| Error::NotFound("Interview not found".into()))?;
        let job = self
            .store
            .get_job(details.job_id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".into()))?;
        if job.created_by != admin.id {
            return Err(Error::Forbidden(
                "Only the admin who posted this job can manage its interviews".into(),
            ));
        }
        if details.interview.status != InterviewStatus::Scheduled {
            return Err(Error::BadRequest(
                "Only scheduled interviews can be updated".into(),
            ));
        }
        if status == InterviewStatus::Scheduled {
            return Err(Error::BadRequest(
                "Interview status must be completed or cancelled".into(),
            ));
        }
        self.store.update_interview_status(interview_id, status).await
    }
}

fn join_refusal(access: AccessStatus) -> &'static str {
    match access {
        AccessStatus::Scheduled => "This interview has not started yet",
        AccessStatus::Past => "This interview has ended",
        AccessStatus::Completed => "This interview has been completed",
        AccessStatus::Cancelled => "This interview has been cancelled",
        AccessStatus::Upcoming | AccessStatus::Live => "This interview cannot be joined",
    }
}
