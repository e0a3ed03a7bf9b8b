use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::http::HeaderValue;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

use mrp_addons as app;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = app::config::load_config()?;
    app::config::init_tracing(cfg.log_level(), cfg.log_json);

    // Init DB
    let db_pool = app::db::establish_connection_from_app_config(&cfg)
        .await
        .context("connecting to the database")?;
    if cfg.auto_migrate {
        app::db::run_migrations(&db_pool).await.map_err(|e| {
            error!("Failed running migrations: {}", e);
            e
        })?;
    }

    let db_arc = Arc::new(db_pool);
    let state = app::AppState::new(db_arc, cfg.clone());

    if cfg.run_install_hooks {
        let report = state
            .services
            .quality
            .post_init_hook()
            .await
            .context("quality trigger installation failed")?;
        info!(
            created = report.created,
            existing = report.existing,
            "Install hooks completed"
        );
    }

    let origins: Vec<HeaderValue> = cfg
        .cors_origins()
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    let cors_layer = if !origins.is_empty() {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    } else if cfg.should_allow_permissive_cors() {
        info!("Using permissive CORS because explicit origins were not configured");
        CorsLayer::permissive()
    } else {
        warn!("No CORS origins configured; cross-origin requests will be rejected");
        CorsLayer::new()
    };

    let router = app::build_router(state).layer(cors_layer);

    // Bind and serve
    let addr: SocketAddr = format!("{}:{}", cfg.host, cfg.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", cfg.host, cfg.port))?;
    info!("mrp-addons listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
