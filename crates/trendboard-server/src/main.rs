mod api;
mod hooks;
mod middleware;
mod nav;
mod pages;
mod source;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use trendboard_stats::StatsClient;

use crate::{
    api::{build_app, AppState},
    hooks::{HookSettings, Hooks},
    source::{LiveSource, TrendSource},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(trendboard_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = trendboard_db::PoolConfig::from_app_config(&config);
    let pool = trendboard_db::connect_pool(&config.database_url, pool_config).await?;
    trendboard_db::run_migrations(&pool).await?;

    let stats = StatsClient::with_base_url(
        &config.api_base_url,
        config.http_timeout_secs,
        &config.user_agent,
    )?;
    tracing::info!(base_url = %stats.base_url(), "aggregation service configured");

    let source: Arc<dyn TrendSource> = Arc::new(LiveSource::new(pool, stats));
    let hooks = Hooks::new(Arc::clone(&source), HookSettings::from_app_config(&config));
    let app = build_app(AppState {
        hooks,
        source,
        config: Arc::clone(&config),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "dashboard listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
