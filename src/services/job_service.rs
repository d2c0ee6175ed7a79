use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::domain::skills::normalize_skills;
use crate::dto::job_dto::{CreateJobPayload, JobQuery};
use crate::error::{Error, Result};
use crate::gateway::RecordStore;
use crate::models::job::{Job, JobFilter, NewJob};
use crate::session::viewer::AdminProfile;

#[derive(Clone)]
pub struct JobService {
    store: Arc<dyn RecordStore>,
}

impl JobService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        admin: &AdminProfile,
        payload: CreateJobPayload,
        now: DateTime<Utc>,
    ) -> Result<Job> {
        payload.validate()?;
        if payload.application_deadline <= now {
            return Err(Error::BadRequest(
                "Application deadline must be in the future".into(),
            ));
        }

        let job = self
            .store
            .insert_job(NewJob {
                title: payload.title.trim().to_string(),
                description: payload.description.trim().to_string(),
                skills_required: normalize_skills(&payload.skills_required),
                application_deadline: payload.application_deadline,
                openings_count: payload.openings_count,
                created_by: admin.id,
            })
            .await?;
        tracing::info!(job_id = %job.id, admin_id = %admin.id, "job posted");
        Ok(job)
    }

    /// Jobs still accepting applications at `now`. The deadline filter is
    /// applied once per query.
    pub async fn list_open(&self, now: DateTime<Utc>, query: &JobQuery) -> Result<Vec<Job>> {
        let jobs = self
            .store
            .list_jobs(JobFilter {
                created_by: None,
                open_at: Some(now),
            })
            .await?;
        Ok(jobs.into_iter().filter(|j| matches_query(j, query)).collect())
    }

    /// Everything the admin posted, expired or not.
    pub async fn list_for_admin(&self, admin: &AdminProfile) -> Result<Vec<Job>> {
        self.store
            .list_jobs(JobFilter {
                created_by: Some(admin.id),
                open_at: None,
            })
            .await
    }

    pub async fn get(&self, id: Uuid) -> Result<Job> {
        self.store
            .get_job(id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".into()))
    }

    pub async fn delete(&self, admin: &AdminProfile, id: Uuid) -> Result<()> {
        let job = self.get(id).await?;
        if job.created_by != admin.id {
            return Err(Error::Forbidden("You can only delete your own job postings".into()));
        }
        self.store.delete_job(id).await?;
        tracing::info!(job_id = %id, admin_id = %admin.id, "job deleted");
        Ok(())
    }
}

fn matches_query(job: &Job, query: &JobQuery) -> bool {
    if let Some(skill) = query.skill.as_deref().filter(|s| !s.trim().is_empty()) {
        if !job.requires_skill(skill) {
            return false;
        }
    }
    if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let needle = search.to_lowercase();
        if !job.title.to_lowercase().contains(&needle)
            && !job.description.to_lowercase().contains(&needle)
        {
            return false;
        }
    }
    true
}
