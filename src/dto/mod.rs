pub mod auth_dto;
pub mod catalog_dto;
pub mod contact_dto;
pub mod dashboard_dto;
pub mod envelope;
pub mod file_dto;
pub mod job_application_dto;
pub mod quotation_dto;
