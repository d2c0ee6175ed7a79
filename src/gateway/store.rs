use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::application::{
    Application, ApplicationStatus, JobApplication, NewApplication, StudentApplication,
};
use crate::models::interview::{Interview, InterviewDetails, InterviewStatus, NewInterview};
use crate::models::job::{Job, JobFilter, NewJob};
use crate::models::notification::{NewNotification, Notification};
use crate::models::profile::{NewProfile, Profile};

/// Row-level operations against the record storage.
///
/// Authorization lives in the storage backend; callers only scope their reads.
/// Every method is a single independent write or read: nothing here spans
/// records in a transaction.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>>;

    /// Inserts the profile unless a row with the same id exists, then returns
    /// whatever row is stored. A concurrent duplicate attempt is not an error.
    async fn upsert_profile(&self, profile: NewProfile) -> Result<Profile>;

    async fn insert_job(&self, job: NewJob) -> Result<Job>;

    async fn get_job(&self, id: Uuid) -> Result<Option<Job>>;

    async fn list_jobs(&self, filter: JobFilter) -> Result<Vec<Job>>;

    async fn delete_job(&self, id: Uuid) -> Result<bool>;

    /// Fails with `Error::AlreadyApplied` when the (job, student) pair exists.
    async fn insert_application(&self, application: NewApplication) -> Result<Application>;

    async fn get_application(&self, id: Uuid) -> Result<Option<Application>>;

    async fn find_application(&self, job_id: Uuid, student_id: Uuid)
        -> Result<Option<Application>>;

    async fn list_student_applications(&self, student_id: Uuid)
        -> Result<Vec<StudentApplication>>;

    async fn list_job_applications(&self, job_ids: &[Uuid]) -> Result<Vec<JobApplication>>;

    async fn update_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Application>;

    async fn insert_interview(&self, interview: NewInterview) -> Result<Interview>;

    async fn get_interview(&self, id: Uuid) -> Result<Option<InterviewDetails>>;

    async fn list_interviews(&self, application_ids: &[Uuid]) -> Result<Vec<InterviewDetails>>;

    async fn update_interview_status(&self, id: Uuid, status: InterviewStatus)
        -> Result<Interview>;

    async fn insert_notification(&self, notification: NewNotification) -> Result<Notification>;

    async fn list_notifications(&self, user_id: Uuid) -> Result<Vec<Notification>>;

    async fn mark_notification_read(&self, id: Uuid, user_id: Uuid) -> Result<Notification>;

    async fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<u64>;

    async fn delete_notification(&self, id: Uuid, user_id: Uuid) -> Result<bool>;
}
