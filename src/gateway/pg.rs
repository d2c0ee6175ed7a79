use async_trait::async_trait;
use sqlx::PgPool;
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

const PROFILE_COLUMNS: &str = "id, email, role, full_name, created_at";
const JOB_COLUMNS: &str = "id, title, description, skills_required, application_deadline, openings_count, created_by, created_at";
const APPLICATION_COLUMNS: &str =
    "id, job_id, student_id, resume_url, cover_letter, status, created_at";
const INTERVIEW_COLUMNS: &str =
    "id, application_id, scheduled_date, passcode, meeting_url, status, created_at";
const NOTIFICATION_COLUMNS: &str = "id, user_id, title, message, kind, read, created_at";

/// Record store backed by the backend's Postgres database.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            "SELECT {} FROM profiles WHERE id = $1",
            PROFILE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    async fn upsert_profile(&self, profile: NewProfile) -> Result<Profile> {
        sqlx::query(
            r#"
            INSERT INTO profiles (id, email, role, full_name)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(profile.id)
        .bind(&profile.email)
        .bind(profile.role)
        .bind(&profile.full_name)
        .execute(&self.pool)
        .await?;

        let stored = sqlx::query_as::<_, Profile>(&format!(
            "SELECT {} FROM profiles WHERE id = $1",
            PROFILE_COLUMNS
        ))
        .bind(profile.id)
        .fetch_one(&self.pool)
        .await?;
        Ok(stored)
    }

    async fn insert_job(&self, job: NewJob) -> Result<Job> {
        let job = sqlx::query_as::<_, Job>(&format!(
            r#"
            INSERT INTO jobs (title, description, skills_required, application_deadline, openings_count, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            JOB_COLUMNS
        ))
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.skills_required)
        .bind(job.application_deadline)
        .bind(job.openings_count)
        .bind(job.created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(job)
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<Job>> {
        let job = sqlx::query_as::<_, Job>(&format!(
            "SELECT {} FROM jobs WHERE id = $1",
            JOB_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(job)
    }

    async fn list_jobs(&self, filter: JobFilter) -> Result<Vec<Job>> {
        let jobs = sqlx::query_as::<_, Job>(&format!(
            r#"
            SELECT {}
            FROM jobs
            WHERE ($1::uuid IS NULL OR created_by = $1)
              AND ($2::timestamptz IS NULL OR application_deadline >= $2)
            ORDER BY created_at DESC
            "#,
            JOB_COLUMNS
        ))
        .bind(filter.created_by)
        .bind(filter.open_at)
        .fetch_all(&self.pool)
        .await?;
        Ok(jobs)
    }

    async fn delete_job(&self, id: Uuid) -> Result<bool> {
        let res = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn insert_application(&self, application: NewApplication) -> Result<Application> {
        let row = sqlx::query_as::<_, Application>(&format!(
            r#"
            INSERT INTO applications (job_id, student_id, resume_url, cover_letter, status)
            VALUES ($1, $2, $3, $4, 'pending')
            RETURNING {}
            "#,
            APPLICATION_COLUMNS
        ))
        .bind(application.job_id)
        .bind(application.student_id)
        .bind(&application.resume_url)
        .bind(&application.cover_letter)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_application(&self, id: Uuid) -> Result<Option<Application>> {
        let row = sqlx::query_as::<_, Application>(&format!(
            "SELECT {} FROM applications WHERE id = $1",
            APPLICATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_application(
        &self,
        job_id: Uuid,
        student_id: Uuid,
    ) -> Result<Option<Application>> {
        let row = sqlx::query_as::<_, Application>(&format!(
            "SELECT {} FROM applications WHERE job_id = $1 AND student_id = $2",
            APPLICATION_COLUMNS
        ))
        .bind(job_id)
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_student_applications(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<StudentApplication>> {
        let rows = sqlx::query_as::<_, StudentApplication>(
            r#"
            SELECT a.id, a.job_id, a.student_id, a.resume_url, a.cover_letter, a.status, a.created_at,
                   j.title AS job_title, j.description AS job_description,
                   j.application_deadline AS job_deadline
            FROM applications a
            JOIN jobs j ON j.id = a.job_id
            WHERE a.student_id = $1
            ORDER BY a.created_at DESC
            "#,
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_job_applications(&self, job_ids: &[Uuid]) -> Result<Vec<JobApplication>> {
        if job_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, JobApplication>(
            r#"
            SELECT a.id, a.job_id, a.student_id, a.resume_url, a.cover_letter, a.status, a.created_at,
                   j.title AS job_title, p.full_name AS student_name, p.email AS student_email
            FROM applications a
            JOIN jobs j ON j.id = a.job_id
            JOIN profiles p ON p.id = a.student_id
            WHERE a.job_id = ANY($1)
            ORDER BY a.created_at DESC
            "#,
        )
        .bind(job_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn update_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Application> {
        let row = sqlx::query_as::<_, Application>(&format!(
            "UPDATE applications SET status = $1 WHERE id = $2 RETURNING {}",
            APPLICATION_COLUMNS
        ))
        .bind(status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| Error::NotFound("Application not found".into()))
    }

    async fn insert_interview(&self, interview: NewInterview) -> Result<Interview> {
        let row = sqlx::query_as::<_, Interview>(&format!(
            r#"
            INSERT INTO interviews (application_id, scheduled_date, passcode, meeting_url, status)
            VALUES ($1, $2, $3, $4, 'scheduled')
            RETURNING {}
            "#,
            INTERVIEW_COLUMNS
        ))
        .bind(interview.application_id)
        .bind(interview.scheduled_date)
        .bind(&interview.passcode)
        .bind(&interview.meeting_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_interview(&self, id: Uuid) -> Result<Option<InterviewDetails>> {
        let row = sqlx::query_as::<_, InterviewDetails>(
            r#"
            SELECT i.id, i.application_id, i.scheduled_date, i.passcode, i.meeting_url, i.status, i.created_at,
                   j.id AS job_id, j.title AS job_title, a.student_id, p.full_name AS student_name
            FROM interviews i
            JOIN applications a ON a.id = i.application_id
            JOIN jobs j ON j.id = a.job_id
            JOIN profiles p ON p.id = a.student_id
            WHERE i.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_interviews(&self, application_ids: &[Uuid]) -> Result<Vec<InterviewDetails>> {
        if application_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, InterviewDetails>(
            r#"
            SELECT i.id, i.application_id, i.scheduled_date, i.passcode, i.meeting_url, i.status, i.created_at,
                   j.id AS job_id, j.title AS job_title, a.student_id, p.full_name AS student_name
            FROM interviews i
            JOIN applications a ON a.id = i.application_id
            JOIN jobs j ON j.id = a.job_id
            JOIN profiles p ON p.id = a.student_id
            WHERE i.application_id = ANY($1)
            ORDER BY i.scheduled_date ASC
            "#,
        )
        .bind(application_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn update_interview_status(
        &self,
        id: Uuid,
        status: InterviewStatus,
    ) -> Result<Interview> {
        let row = sqlx::query_as::<_, Interview>(&format!(
            "UPDATE interviews SET status = $1 WHERE id = $2 RETURNING {}",
            INTERVIEW_COLUMNS
        ))
        .bind(status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| Error::NotFound("Interview not found".into()))
    }

    async fn insert_notification(&self, notification: NewNotification) -> Result<Notification> {
        let row = sqlx::query_as::<_, Notification>(&format!(
            r#"
            INSERT INTO notifications (user_id, title, message, kind)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            NOTIFICATION_COLUMNS
        ))
        .bind(notification.user_id)
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.kind)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_notifications(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        let rows = sqlx::query_as::<_, Notification>(&format!(
            "SELECT {} FROM notifications WHERE user_id = $1 ORDER BY created_at DESC",
            NOTIFICATION_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn mark_notification_read(&self, id: Uuid, user_id: Uuid) -> Result<Notification> {
        let row = sqlx::query_as::<_, Notification>(&format!(
            "UPDATE notifications SET read = TRUE WHERE id = $1 AND user_id = $2 RETURNING {}",
            NOTIFICATION_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| Error::NotFound("Notification not found".into()))
    }

    async fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<u64> {
        let res = sqlx::query("UPDATE notifications SET read = TRUE WHERE user_id = $1 AND read = FALSE")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }

    async fn delete_notification(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        let res = sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
