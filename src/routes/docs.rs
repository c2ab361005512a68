use axum::Json;
use utoipa::OpenApi;

use crate::dto::{
    auth_dto::{LoginPayload, LoginResponse, UserResponse},
    contact_dto::{ContactPayload, ContactReceipt},
    dashboard_dto::{DashboardStats, IntegrationStatus, StatusCounts},
    job_application_dto::{JobApplicationPayload, JobApplicationReceipt},
};
use crate::models::{
    contact_request::{BudgetBracket, RequestType},
    job_application::EducationLevel,
    status::{ApplicationStatus, ContactStatus, QuotationStatus},
    user::Role,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health,
        crate::routes::contact::submit_contact,
        crate::routes::job_applications::submit_application,
        crate::routes::auth::login,
    ),
    components(schemas(
        ContactPayload,
        ContactReceipt,
        BudgetBracket,
        RequestType,
        JobApplicationPayload,
        JobApplicationReceipt,
        EducationLevel,
        LoginPayload,
        LoginResponse,
        UserResponse,
        Role,
        ContactStatus,
        ApplicationStatus,
        QuotationStatus,
        DashboardStats,
        StatusCounts,
        IntegrationStatus,
    )),
    tags((name = "ferreteria", description = "Public forms and staff dashboard API"))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
