use ferreteria_backend::{
    config::Config, database::pool::connect_store, routes, services::auth_service::AuthService,
    AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing();
    info!(env = %config.app_env, "starting ferreteria backend");

    let store = connect_store(&config).await?;
    let app_state = AppState::new(config, store)?;

    if let Ok(store) = app_state.store() {
        match AuthService::new(store, app_state.config.clone()).bootstrap_admin().await {
            Ok(true) => info!("Bootstrap admin account created"),
            Ok(false) => {}
            Err(e) => tracing::warn!(error = %e, "Could not create bootstrap admin"),
        }
    }

    let addr: SocketAddr = app_state.config.server_address.parse()?;
    let app = routes::router(app_state);

    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
