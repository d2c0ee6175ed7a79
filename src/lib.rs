pub mod config;
pub mod database;
pub mod domain;
pub mod dto;
pub mod error;
pub mod gateway;
pub mod identity;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::gateway::RecordStore;
use crate::identity::IdentityProvider;
use crate::services::{
    application_service::ApplicationService, auth_service::AuthService,
    interview_service::InterviewService, job_service::JobService,
    lifecycle_service::LifecycleService, meeting_service::MeetingService,
    notification_service::NotificationService,
};

/// Settings the request path needs beyond the two backends.
#[derive(Debug, Clone)]
pub struct StateSettings {
    pub jwt_secret: String,
    pub meeting_base_url: String,
}

impl From<&Config> for StateSettings {
    fn from(config: &Config) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            meeting_base_url: config.meeting_base_url.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub jwt_secret: Arc<str>,
    pub auth_service: AuthService,
    pub job_service: JobService,
    pub application_service: ApplicationService,
    pub lifecycle_service: LifecycleService,
    pub interview_service: InterviewService,
    pub notification_service: NotificationService,
}

impl AppState {
    pub fn new(
        store: Arc<dyn RecordStore>,
        identity: Arc<dyn IdentityProvider>,
        settings: StateSettings,
    ) -> Self {
        let notification_service = NotificationService::new(store.clone());
        let meeting_service = MeetingService::new(settings.meeting_base_url);

        let auth_service = AuthService::new(identity, store.clone());
        let job_service = JobService::new(store.clone());
        let application_service =
            ApplicationService::new(store.clone(), notification_service.clone());
        let lifecycle_service = LifecycleService::new(
            store.clone(),
            notification_service.clone(),
            meeting_service,
        );
        let interview_service = InterviewService::new(store.clone());

        Self {
            store,
            jwt_secret: Arc::from(settings.jwt_secret),
            auth_service,
            job_service,
            application_service,
            lifecycle_service,
            interview_service,
            notification_service,
        }
    }
}
