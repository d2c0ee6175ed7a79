use std::sync::Arc;

use chrono::{DateTime, Utc};
use validator::Validate;

use crate::domain::lifecycle::submission_notice;
use crate::dto::application_dto::{AdminApplicationQuery, SubmitApplicationPayload};
use crate::error::{Error, Result};
use crate::gateway::RecordStore;
use crate::models::application::{Application, JobApplication, NewApplication, StudentApplication};
use crate::models::job::JobFilter;
use crate::services::notification_service::NotificationService;
use crate::session::viewer::{AdminProfile, StudentProfile};

#[derive(Clone)]
pub struct ApplicationService {
    store: Arc<dyn RecordStore>,
    notifications: NotificationService,
}

impl ApplicationService {
    pub fn new(store: Arc<dyn RecordStore>, notifications: NotificationService) -> Self {
        Self {
            store,
            notifications,
        }
    }

    /// Inserts the application, then the confirmation notification. The two
    /// writes are independent: once the first succeeds the application counts
    /// as submitted even if the notification is lost.
    pub async fn submit(
        &self,
        student: &StudentProfile,
        payload: SubmitApplicationPayload,
        now: DateTime<Utc>,
    ) -> Result<Application> {
        payload.validate()?;

        let job = self
            .store
            .get_job(payload.job_id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".into()))?;
        if !job.is_open_at(now) {
            return Err(Error::BadRequest(
                "The application deadline for this job has passed".into(),
            ));
        }
        if self
            .store
            .find_application(job.id, student.id)
            .await?
            .is_some()
        {
            return Err(Error::AlreadyApplied);
        }

        let application = self
            .store
            .insert_application(NewApplication {
                job_id: job.id,
                student_id: student.id,
                resume_url: payload.resume_url.trim().to_string(),
                cover_letter: payload.cover_letter,
            })
            .await?;
        tracing::info!(
            application_id = %application.id,
            job_id = %job.id,
            student_id = %student.id,
            "application submitted"
        );

        if let Err(e) = self
            .notifications
            .notify(student.id, submission_notice(&job.title))
            .await
        {
            tracing::warn!(
                application_id = %application.id,
                student_id = %student.id,
                error = %e,
                "confirmation notification not written"
            );
        }

        Ok(application)
    }

    pub async fn list_for_student(&self, student: &StudentProfile) -> Result<Vec<StudentApplication>> {
        self.store.list_student_applications(student.id).await
    }

    /// Applications to jobs the admin posted.
    pub async fn list_for_admin(
        &self,
        admin: &AdminProfile,
        query: &AdminApplicationQuery,
    ) -> Result<Vec<JobApplication>> {
        let job_ids: Vec<_> = self
            .store
            .list_jobs(JobFilter {
                created_by: Some(admin.id),
                open_at: None,
            })
            .await?
            .into_iter()
            .map(|j| j.id)
            .filter(|id| query.job_id.map_or(true, |wanted| *id == wanted))
            .collect();

        let rows = self.store.list_job_applications(&job_ids).await?;
        Ok(rows
            .into_iter()
            .filter(|row| query.status.map_or(true, |s| row.application.status == s))
            .collect())
    }
}
