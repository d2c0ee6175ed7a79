pub mod application_service;
pub mod auth_service;
pub mod interview_service;
pub mod job_service;
pub mod lifecycle_service;
pub mod meeting_service;
pub mod notification_service;
