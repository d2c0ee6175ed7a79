use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Display order is insertion order; matching ignores order and case.
    pub skills_required: Vec<String>,
    pub application_deadline: DateTime<Utc>,
    pub openings_count: i32,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Job {
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        self.application_deadline >= now
    }

    pub fn requires_skill(&self, skill: &str) -> bool {
        crate::domain::skills::contains_skill(&self.skills_required, skill)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub skills_required: Vec<String>,
    pub application_deadline: DateTime<Utc>,
    pub openings_count: i32,
    pub created_by: Uuid,
}

/// Equality/comparison filters understood by the record store.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub created_by: Option<Uuid>,
    /// Keep only jobs whose deadline is at or after this instant.
    pub open_at: Option<DateTime<Utc>>,
}
