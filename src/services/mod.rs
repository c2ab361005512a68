pub mod activity_service;
pub mod auth_service;
pub mod catalog_service;
pub mod contact_service;
pub mod email_service;
pub mod export_service;
pub mod file_service;
pub mod job_application_service;
pub mod media_service;
pub mod notification_service;
pub mod quotation_service;
pub mod stats_service;
