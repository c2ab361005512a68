use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct DashboardStats {
    pub contact_requests: StatusCounts,
    pub job_applications: StatusCounts,
    pub quotations: StatusCounts,
    /// Active records per catalog collection.
    pub catalog: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct StatusCounts {
    pub total: i64,
    pub by_status: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IntegrationStatus {
    pub app_env: String,
    pub database: bool,
    pub auth: bool,
    pub email: bool,
    pub media: bool,
    pub email_sender: Option<String>,
    pub media_cloud_name: Option<String>,
    pub public_rps: u32,
    pub max_upload_bytes: usize,
}
