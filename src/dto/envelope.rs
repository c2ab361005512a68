use axum::{http::StatusCode, Json};
use serde::Serialize;

/// Success half of the `{success, data|error}` envelope; errors come from `Error`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub type Envelope<T> = (StatusCode, Json<ApiResponse<T>>);

pub fn ok<T: Serialize>(data: T) -> Envelope<T> {
    (
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            data,
            message: None,
        }),
    )
}

pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Envelope<T> {
    (
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            data,
            message: Some(message.into()),
        }),
    )
}

pub fn created<T: Serialize>(data: T) -> Envelope<T> {
    (
        StatusCode::CREATED,
        Json(ApiResponse {
            success: true,
            data,
            message: None,
        }),
    )
}
