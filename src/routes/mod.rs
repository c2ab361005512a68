pub mod auth;
pub mod catalog;
pub mod contact;
pub mod dashboard;
pub mod docs;
pub mod export;
pub mod files;
pub mod health;
pub mod job_applications;
pub mod quotations;
pub mod requests;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::middleware::{
    auth::{require_roles, RoleGuard},
    cors::permissive_cors,
    rate_limit::{rps_middleware, RateLimiter},
};
use crate::models::catalog::{Branch, Brand, JobPosting, News, Promotion};
use crate::models::user::Role;
use crate::utils::request_meta::{client_info_middleware, TrustedProxies};
use crate::AppState;

const REQUEST_HANDLERS: &[Role] = &[Role::Vendor, Role::Manager, Role::Admin];
const REQUEST_EXPORTERS: &[Role] = &[Role::Manager, Role::Admin];
const RECRUITERS: &[Role] = &[Role::Hr, Role::Admin];
const QUOTERS: &[Role] = &[Role::Vendor, Role::Manager, Role::Admin];
const FILE_MANAGERS: &[Role] = &[Role::Admin, Role::It, Role::Manager];
const ADMINS: &[Role] = &[Role::Admin];
const OPERATORS: &[Role] = &[Role::Admin, Role::It];
const ANY_STAFF: &[Role] = &[];

/// Applies a role guard to every route already added to `router`.
fn guarded(router: Router<AppState>, state: &AppState, roles: &'static [Role]) -> Router<AppState> {
    router.route_layer(from_fn_with_state(
        RoleGuard::new(&state.config, roles),
        require_roles,
    ))
}

pub fn router(state: AppState) -> Router {
    let limiter = RateLimiter::new(state.config.public_rps);

    let base_routes = Router::new()
        .route("/health", get(health::health))
        .route("/api/docs/openapi.json", get(docs::openapi_json));

    let public_forms = Router::new()
        .route("/api/contact", post(contact::submit_contact))
        .route("/api/job-applications", post(job_applications::submit_application))
        .route("/api/auth/login", post(auth::login))
        .route_layer(from_fn_with_state(limiter, rps_middleware));

    let catalog_api = Router::new()
        .merge(catalog::routes::<Branch>(&state))
        .merge(catalog::routes::<Brand>(&state))
        .merge(catalog::routes::<News>(&state))
        .merge(catalog::routes::<Promotion>(&state))
        .merge(catalog::routes::<JobPosting>(&state));

    let requests_api = guarded(
        Router::new()
            .route("/api/requests", get(requests::list_requests))
            .route("/api/requests/stream", get(requests::stream_requests))
            .route(
                "/api/requests/:id",
                get(requests::get_request).patch(requests::update_request),
            ),
        &state,
        REQUEST_HANDLERS,
    );

    let exports_api = guarded(
        Router::new().route("/api/requests/export", get(export::export_requests)),
        &state,
        REQUEST_EXPORTERS,
    );

    let applications_api = guarded(
        Router::new()
            .route("/api/job-applications", get(job_applications::list_applications))
            .route("/api/job-applications/export", get(export::export_applications))
            .route(
                "/api/job-applications/:id",
                get(job_applications::get_application).patch(job_applications::update_application),
            ),
        &state,
        RECRUITERS,
    );

    let quotations_api = guarded(
        Router::new()
            .route(
                "/api/quotations",
                get(quotations::list_quotations).post(quotations::create_quotation),
            )
            .route(
                "/api/quotations/:id",
                get(quotations::get_quotation).patch(quotations::update_quotation),
            ),
        &state,
        QUOTERS,
    );

    let files_api = guarded(
        Router::new()
            .route("/api/files", get(files::list_files).post(files::upload_file))
            .route("/api/files/:id", delete(files::delete_file)),
        &state,
        FILE_MANAGERS,
    );

    let users_api = guarded(
        Router::new().route("/api/users", get(auth::list_users).post(auth::create_user)),
        &state,
        ADMINS,
    );

    let operations_api = guarded(
        Router::new().route("/api/debug/env", get(dashboard::debug_env)),
        &state,
        OPERATORS,
    );

    let staff_api = guarded(
        Router::new()
            .route("/api/auth/me", get(auth::me))
            .route("/api/dashboard/stats", get(dashboard::stats)),
        &state,
        ANY_STAFF,
    );

    let body_limit = state.config.max_upload_bytes + 1024 * 1024;
    let trusted = TrustedProxies::new(state.config.trusted_proxies.clone());

    base_routes
        .merge(public_forms)
        .merge(catalog_api)
        .merge(requests_api)
        .merge(exports_api)
        .merge(applications_api)
        .merge(quotations_api)
        .merge(files_api)
        .merge(users_api)
        .merge(operations_api)
        .merge(staff_api)
        .with_state(state)
        .layer(from_fn_with_state(trusted, client_info_middleware))
        .layer(permissive_cors())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(body_limit))
}
