use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use job_portal::{
    config::init_config,
    database::pool::create_pool,
    gateway::PgStore,
    identity::RemoteIdentity,
    middleware::{cors::cors_layer, rate_limit::RateLimiter},
    routes, AppState, StateSettings,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "job_portal=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = init_config()?;
    init_tracing(config.json_logs);

    let pool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("migrations applied");

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;
    let identity = RemoteIdentity::new(&config.backend_url, config.backend_anon_key.clone(), http_client)?;

    let app_state = AppState::new(
        Arc::new(PgStore::new(pool)),
        Arc::new(identity),
        StateSettings::from(config),
    );

    let limiter = RateLimiter::new(config.auth_rps).trust_forwarded(config.trust_proxy);
    let app = routes::router(app_state, limiter)
        .layer(cors_layer(config.allowed_origin.as_deref()))
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(&config.server_address).await?;
    info!(address = %config.server_address, "job portal listening");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
