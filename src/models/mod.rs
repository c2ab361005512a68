pub mod activity_log;
pub mod catalog;
pub mod contact_request;
pub mod file_record;
pub mod job_application;
pub mod quotation;
pub mod status;
pub mod user;
