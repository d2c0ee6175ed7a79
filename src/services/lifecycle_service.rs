use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::domain::lifecycle::{interview_notice, rejected_notice, shortlisted_notice};
use crate::dto::interview_dto::{ScheduleInterviewPayload, ScheduledInterviewResponse};
use crate::error::{Error, Result};
use crate::gateway::RecordStore;
use crate::models::application::{Application, ApplicationStatus};
use crate::models::interview::NewInterview;
use crate::models::job::Job;
use crate::services::meeting_service::MeetingService;
use crate::services::notification_service::NotificationService;
use crate::session::viewer::AdminProfile;
use crate::utils::{time::display_instant, token::generate_passcode};

/// Admin-driven status transitions.
///
/// Each transition is a short sequence of independent writes with no rollback.
/// A failing step is logged and the remaining steps are skipped, so a caller
/// may observe e.g. a status change without its notification. Concurrent
/// admins are not coordinated: the last status write wins.
#[derive(Clone)]
pub struct LifecycleService {
    store: Arc<dyn RecordStore>,
    notifications: NotificationService,
    meetings: MeetingService,
}

impl LifecycleService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        notifications: NotificationService,
        meetings: MeetingService,
    ) -> Self {
        Self {
            store,
            notifications,
            meetings,
        }
    }

    pub async fn shortlist(&self, admin: &AdminProfile, application_id: Uuid) -> Result<Application> {
        let (application, job) = self.load_owned(admin, application_id).await?;
        let next = application.status.transition_to(ApplicationStatus::Shortlisted)?;
        let updated = self.write_status(&application, next).await?;
        self.notify_student(&updated, shortlisted_notice(&job.title))
            .await?;
        Ok(updated)
    }

    pub async fn reject(&self, admin: &AdminProfile, application_id: Uuid) -> Result<Application> {
        let (application, job) = self.load_owned(admin, application_id).await?;
        let next = application.status.transition_to(ApplicationStatus::Rejected)?;
        let updated = self.write_status(&application, next).await?;
        self.notify_student(&updated, rejected_notice(&job.title))
            .await?;
        Ok(updated)
    }

    /// Interview row first, then the status, then the notification. The
    /// interview must exist before the application reads as scheduled.
    pub async fn schedule_interview(
        &self,
        admin: &AdminProfile,
        application_id: Uuid,
        payload: ScheduleInterviewPayload,
        now: DateTime<Utc>,
    ) -> Result<ScheduledInterviewResponse> {
        payload.validate()?;
        if payload.scheduled_date <= now {
            return Err(Error::BadRequest(
                "Interview date must be in the future".into(),
            ));
        }

        let (application, job) = self.load_owned(admin, application_id).await?;
        let next = application
            .status
            .transition_to(ApplicationStatus::InterviewScheduled)?;

        let passcode = payload
            .passcode
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(generate_passcode);

        let interview = self
            .store
            .insert_interview(NewInterview {
                application_id: application.id,
                scheduled_date: payload.scheduled_date,
                passcode,
                meeting_url: self.meetings.new_room_url(),
            })
            .await
            .map_err(|e| {
                tracing::error!(application_id = %application.id, error = %e, "interview insert failed");
                e
            })?;

        let updated = self.write_status(&application, next).await.map_err(|e| {
            tracing::error!(
                application_id = %application.id,
                interview_id = %interview.id,
                "interview created but application status not updated"
            );
            e
        })?;

        self.notify_student(
            &updated,
            interview_notice(
                &job.title,
                &display_instant(interview.scheduled_date),
                &interview.passcode,
            ),
        )
        .await?;

        Ok(ScheduledInterviewResponse {
            interview,
            application: updated,
        })
    }

    async fn load_owned(&self, admin: &AdminProfile, application_id: Uuid) -> Result<(Application, Job)> {
        let application = self
            .store
            .get_application(application_id)
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".into()))?;
        let job = self
            .store
            .get_job(application.job_id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".into()))?;
        if job.created_by != admin.id {
            return Err(Error::Forbidden(
                "Only the admin who posted this job can manage its applications".into(),
            ));
        }
        Ok((application, job))
    }

    async fn write_status(&self, application: &Application, next: ApplicationStatus) -> Result<Application> {
        match self.store.update_application_status(application.id, next).await {
            Ok(updated) => {
                tracing::info!(
                    application_id = %application.id,
                    from = %application.status,
                    to = %next,
                    "application status changed"
                );
                Ok(updated)
            }
            Err(e) => {
                tracing::error!(application_id = %application.id, to = %next, error = %e, "status update failed");
                Err(e)
            }
        }
    }

    async fn notify_student(
        &self,
        application: &Application,
        notice: crate::domain::lifecycle::StatusNotice,
    ) -> Result<()> {
        self.notifications
            .notify(application.student_id, notice)
            .await
            .map(|_| ())
            .map_err(|e| {
                tracing::error!(
                    application_id = %application.id,
                    student_id = %application.student_id,
                    error = %e,
                    "status notification not written"
                );
                e
            })
    }
}
