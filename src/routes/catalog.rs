use axum::{
    extract::{Path, State},
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post},
    Router,
};

use crate::database::collection::Record;
use crate::dto::catalog_dto::CatalogListQuery;
use crate::dto::envelope::{created, ok, ok_with_message};
use crate::error::Result;
use crate::middleware::auth::{require_roles, Claims, RoleGuard};
use crate::models::catalog::CatalogEntity;
use crate::services::catalog_service::CatalogService;
use crate::utils::extract::{ApiJson, ApiQuery};
use crate::utils::request_meta::ClientInfo;
use crate::AppState;

/// Public reads plus editor-only writes for one catalog entity.
pub fn routes<T>(state: &AppState) -> Router<AppState>
where
    T: CatalogEntity + Clone,
{
    let collection_path = format!("/api/{}", T::COLLECTION);
    let item_path = format!("/api/{}/:id", T::COLLECTION);

    let public = Router::new()
        .route(&collection_path, get(list::<T>))
        .route(&item_path, get(get_one::<T>));

    let editors = Router::new()
        .route(&collection_path, post(create::<T>))
        .route(&item_path, axum::routing::put(update::<T>).delete(deactivate::<T>))
        .route_layer(from_fn_with_state(
            RoleGuard::new(&state.config, T::EDITORS),
            require_roles,
        ));

    public.merge(editors)
}

async fn list<T: CatalogEntity + Clone>(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CatalogListQuery>,
) -> Result<impl IntoResponse> {
    let records: Vec<Record<T>> = CatalogService::<T>::new(state.store.clone())
        .list(&query)
        .await?;
    Ok(ok(records))
}

async fn get_one<T: CatalogEntity + Clone>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let record = CatalogService::<T>::new(state.store.clone()).get(&id).await?;
    Ok(ok(record))
}

async fn create<T: CatalogEntity + Clone>(
    State(state): State<AppState>,
    claims: Claims,
    client: ClientInfo,
    ApiJson(payload): ApiJson<T::Payload>,
) -> Result<impl IntoResponse> {
    let record = CatalogService::<T>::new(state.store.clone())
        .create(payload, &claims.email, &client)
        .await?;
    Ok(created(record))
}

async fn update<T: CatalogEntity + Clone>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    claims: Claims,
    client: ClientInfo,
    ApiJson(payload): ApiJson<T::Payload>,
) -> Result<impl IntoResponse> {
    let record = CatalogService::<T>::new(state.store.clone())
        .update(&id, payload, &claims.email, &client)
        .await?;
    Ok(ok(record))
}

async fn deactivate<T: CatalogEntity + Clone>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    claims: Claims,
    client: ClientInfo,
) -> Result<impl IntoResponse> {
    let record = CatalogService::<T>::new(state.store.clone())
        .deactivate(&id, &claims.email, &client)
        .await?;
    Ok(ok_with_message(record, "Registro desactivado"))
}
