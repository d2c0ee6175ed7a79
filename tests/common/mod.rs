#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use job_portal::dto::job_dto::CreateJobPayload;
use job_portal::gateway::{MemoryStore, RecordStore};
use job_portal::identity::MemoryIdentity;
use job_portal::models::job::Job;
use job_portal::models::profile::{NewProfile, Profile, Role};
use job_portal::services::job_service::JobService;
use job_portal::session::viewer::{AdminProfile, StudentProfile, Viewer};
use job_portal::{AppState, StateSettings};
use uuid::Uuid;

pub const JWT_SECRET: &str = "test_secret_key";
pub const MEETING_BASE_URL: &str = "https://meet.example.test";

pub fn store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

pub fn dyn_store(store: &Arc<MemoryStore>) -> Arc<dyn RecordStore> {
    store.clone()
}

pub fn app_state(store: &Arc<MemoryStore>, identity: Arc<MemoryIdentity>) -> AppState {
    AppState::new(
        dyn_store(store),
        identity,
        StateSettings {
            jwt_secret: JWT_SECRET.to_string(),
            meeting_base_url: MEETING_BASE_URL.to_string(),
        },
    )
}

pub async fn profile(store: &MemoryStore, role: Role, name: &str) -> Profile {
    store
        .upsert_profile(NewProfile {
            id: Uuid::new_v4(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            role,
            full_name: name.to_string(),
        })
        .await
        .expect("seed profile")
}

pub async fn admin(store: &MemoryStore, name: &str) -> AdminProfile {
    Viewer::from(profile(store, Role::Admin, name).await)
        .as_admin()
        .cloned()
        .expect("admin viewer")
}

pub async fn student(store: &MemoryStore, name: &str) -> StudentProfile {
    Viewer::from(profile(store, Role::Student, name).await)
        .as_student()
        .cloned()
        .expect("student viewer")
}

pub fn job_payload(title: &str, deadline: DateTime<Utc>) -> CreateJobPayload {
    CreateJobPayload {
        title: title.to_string(),
        description: format!("{} description", title),
        skills_required: vec!["Rust".into(), "SQL".into()],
        application_deadline: deadline,
        openings_count: 2,
    }
}

pub async fn post_job(store: &Arc<MemoryStore>, admin: &AdminProfile, title: &str) -> Job {
    let now = Utc::now();
    JobService::new(dyn_store(store))
        .create(admin, job_payload(title, now + Duration::days(7)), now)
        .await
        .expect("post job")
}
