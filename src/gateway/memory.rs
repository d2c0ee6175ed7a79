use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::RecordStore;
use crate::error::{Error, Result};
use crate::models::application::{
    Application, ApplicationStatus, JobApplication, NewApplication, StudentApplication,
};
use crate::models::interview::{Interview, InterviewDetails, InterviewStatus, NewInterview};
use crate::models::job::{Job, JobFilter, NewJob};
use crate::models::notification::{NewNotification, Notification};
use crate::models::profile::{NewProfile, Profile};

/// Write operations whose next call can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    UpsertProfile,
    InsertJob,
    InsertApplication,
    UpdateApplicationStatus,
    InsertInterview,
    UpdateInterviewStatus,
    InsertNotification,
}

#[derive(Default)]
struct Tables {
    profiles: Vec<Profile>,
    jobs: Vec<Job>,
    applications: Vec<Application>,
    interviews: Vec<Interview>,
    notifications: Vec<Notification>,
}

/// In-process record store with the same uniqueness and join semantics as the
/// Postgres schema.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    failures: RwLock<HashSet<StoreOp>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next call of `op` returns an error instead of writing.
    pub async fn fail_next(&self, op: StoreOp) {
        self.failures.write().await.insert(op);
    }

    async fn check(&self, op: StoreOp) -> Result<()> {
        if self.failures.write().await.remove(&op) {
            return Err(Error::Internal(format!("injected failure: {:?}", op)));
        }
        Ok(())
    }

    pub async fn interviews_for_application(&self, application_id: Uuid) -> Vec<Interview> {
        self.tables
            .read()
            .await
            .interviews
            .iter()
            .filter(|i| i.application_id == application_id)
            .cloned()
            .collect()
    }
}

fn interview_details(tables: &Tables, interview: &Interview) -> Option<InterviewDetails> {
    let application = tables
        .applications
        .iter()
        .find(|a| a.id == interview.application_id)?;
    let job = tables.jobs.iter().find(|j| j.id == application.job_id)?;
    let student = tables
        .profiles
        .iter()
        .find(|p| p.id == application.student_id)?;
    Some(InterviewDetails {
        interview: interview.clone(),
        job_id: job.id,
        job_title: job.title.clone(),
        student_id: student.id,
        student_name: student.full_name.clone(),
    })
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>> {
        let tables = self.tables.read().await;
        Ok(tables.profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn upsert_profile(&self, profile: NewProfile) -> Result<Profile> {
        self.check(StoreOp::UpsertProfile).await?;
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables.profiles.iter().find(|p| p.id == profile.id) {
            return Ok(existing.clone());
        }
        let row = Profile {
            id: profile.id,
            email: profile.email,
            role: profile.role,
            full_name: profile.full_name,
            created_at: Utc::now(),
        };
        tables.profiles.push(row.clone());
        Ok(row)
    }

    async fn insert_job(&self, job: NewJob) -> Result<Job> {
        self.check(StoreOp::InsertJob).await?;
        let row = Job {
            id: Uuid::new_v4(),
            title: job.title,
            description: job.description,
            skills_required: job.skills_required,
            application_deadline: job.application_deadline,
            openings_count: job.openings_count,
            created_by: job.created_by,
            created_at: Utc::now(),
        };
        self.tables.write().await.jobs.push(row.clone());
        Ok(row)
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<Job>> {
        let tables = self.tables.read().await;
        Ok(tables.jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn list_jobs(&self, filter: JobFilter) -> Result<Vec<Job>> {
        let tables = self.tables.read().await;
        let mut jobs: Vec<Job> = tables
            .jobs
            .iter()
            .filter(|j| filter.created_by.map_or(true, |owner| j.created_by == owner))
            .filter(|j| filter.open_at.map_or(true, |now| j.is_open_at(now)))
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }

    async fn delete_job(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.jobs.len();
        tables.jobs.retain(|j| j.id != id);
        if tables.jobs.len() == before {
            return Ok(false);
        }
        let removed: HashSet<Uuid> = tables
            .applications
            .iter()
            .filter(|a| a.job_id == id)
            .map(|a| a.id)
            .collect();
        tables.applications.retain(|a| a.job_id != id);
        tables
            .interviews
            .retain(|i| !removed.contains(&i.application_id));
        Ok(true)
    }

    async fn insert_application(&self, application: NewApplication) -> Result<Application> {
        self.check(StoreOp::InsertApplication).await?;
        let mut tables = self.tables.write().await;
        if tables
            .applications
            .iter()
            .any(|a| a.job_id == application.job_id && a.student_id == application.student_id)
        {
            return Err(Error::AlreadyApplied);
        }
        let row = Application {
            id: Uuid::new_v4(),
            job_id: application.job_id,
            student_id: application.student_id,
            resume_url: application.resume_url,
            cover_letter: application.cover_letter,
            status: ApplicationStatus::Pending,
            created_at: Utc::now(),
        };
        tables.applications.push(row.clone());
        Ok(row)
    }

    async fn get_application(&self, id: Uuid) -> Result<Option<Application>> {
        let tables = self.tables.read().await;
        Ok(tables.applications.iter().find(|a| a.id == id).cloned())
    }

    async fn find_application(
        &self,
        job_id: Uuid,
        student_id: Uuid,
    ) -> Result<Option<Application>> {
        let tables = self.tables.read().await;
        Ok(tables
            .applications
            .iter()
            .find(|a| a.job_id == job_id && a.student_id == student_id)
            .cloned())
    }

    async fn list_student_applications(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<StudentApplication>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<StudentApplication> = tables
            .applications
            .iter()
            .filter(|a| a.student_id == student_id)
            .filter_map(|a| {
                let job = tables.jobs.iter().find(|j| j.id == a.job_id)?;
                Some(StudentApplication {
                    application: a.clone(),
                    job_title: job.title.clone(),
                    job_description: job.description.clone(),
                    job_deadline: job.application_deadline,
                })
            })
            .collect();
        rows.sort_by(|a, b| b.application.created_at.cmp(&a.application.created_at));
        Ok(rows)
    }

    async fn list_job_applications(&self, job_ids: &[Uuid]) -> Result<Vec<JobApplication>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<JobApplication> = tables
            .applications
            .iter()
            .filter(|a| job_ids.contains(&a.job_id))
            .filter_map(|a| {
                let job = tables.jobs.iter().find(|j| j.id == a.job_id)?;
                let student = tables.profiles.iter().find(|p| p.id == a.student_id)?;
                Some(JobApplication {
                    application: a.clone(),
                    job_title: job.title.clone(),
                    student_name: student.full_name.clone(),
                    student_email: student.email.clone(),
                })
            })
            .collect();
        rows.sort_by(|a, b| b.application.created_at.cmp(&a.application.created_at));
        Ok(rows)
    }

    async fn update_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Application> {
        self.check(StoreOp::UpdateApplicationStatus).await?;
        let mut tables = self.tables.write().await;
        let row = tables
            .applications
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| Error::NotFound("Application not found".into()))?;
        row.status = status;
        Ok(row.clone())
    }

    async fn insert_interview(&self, interview: NewInterview) -> Result<Interview> {
        self.check(StoreOp::InsertInterview).await?;
        let row = Interview {
            id: Uuid::new_v4(),
            application_id: interview.application_id,
            scheduled_date: interview.scheduled_date,
            passcode: interview.passcode,
            meeting_url: interview.meeting_url,
            status: InterviewStatus::Scheduled,
            created_at: Utc::now(),
        };
        self.tables.write().await.interviews.push(row.clone());
        Ok(row)
    }

    async fn get_interview(&self, id: Uuid) -> Result<Option<InterviewDetails>> {
        let tables = self.tables.read().await;
        Ok(tables
            .interviews
            .iter()
            .find(|i| i.id == id)
            .and_then(|i| interview_details(&tables, i)))
    }

    async fn list_interviews(&self, application_ids: &[Uuid]) -> Result<Vec<InterviewDetails>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<InterviewDetails> = tables
            .interviews
            .iter()
            .filter(|i| application_ids.contains(&i.application_id))
            .filter_map(|i| interview_details(&tables, i))
            .collect();
        rows.sort_by(|a, b| a.interview.scheduled_date.cmp(&b.interview.scheduled_date));
        Ok(rows)
    }

    async fn update_interview_status(
        &self,
        id: Uuid,
        status: InterviewStatus,
    ) -> Result<Interview> {
        self.check(StoreOp::UpdateInterviewStatus).await?;
        let mut tables = self.tables.write().await;
        let row = tables
            .interviews
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| Error::NotFound("Interview not found".into()))?;
        row.status = status;
        Ok(row.clone())
    }

    async fn insert_notification(&self, notification: NewNotification) -> Result<Notification> {
        self.check(StoreOp::InsertNotification).await?;
        let row = Notification {
            id: Uuid::new_v4(),
            user_id: notification.user_id,
            title: notification.title,
            message: notification.message,
            kind: notification.kind,
            read: false,
            created_at: Utc::now(),
        };
        self.tables.write().await.notifications.push(row.clone());
        Ok(row)
    }

    async fn list_notifications(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Notification> = tables
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn mark_notification_read(&self, id: Uuid, user_id: Uuid) -> Result<Notification> {
        let mut tables = self.tables.write().await;
        let row = tables
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id)
            .ok_or_else(|| Error::NotFound("Notification not found".into()))?;
        row.read = true;
        Ok(row.clone())
    }

    async fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<u64> {
        let mut tables = self.tables.write().await;
        let mut updated = 0;
        for n in tables
            .notifications
            .iter_mut()
            .filter(|n| n.user_id == user_id && !n.read)
        {
            n.read = true;
            updated += 1;
        }
        Ok(updated)
    }

    async fn delete_notification(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.notifications.len();
        tables
            .notifications
            .retain(|n| !(n.id == id && n.user_id == user_id));
        Ok(tables.notifications.len() < before)
    }
}
