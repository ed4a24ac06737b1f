use std::net::SocketAddr;
use std::sync::Arc;

use sitebook_db::repositories::SessionRepo;
use sitebook_db::DbPool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sitebook_api::bootstrap::ensure_initial_admin;
use sitebook_api::config::ServerConfig;
use sitebook_api::router::build_app_router;
use sitebook_api::state::AppState;
use sitebook_api::storage::DocumentStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = config.port, "Loaded server configuration");

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = prepare_database(&database_url, &config).await;

    let documents = DocumentStore::new(config.upload.dir.clone());
    documents
        .ensure_root()
        .await
        .expect("Failed to create upload directory");
    tracing::info!(dir = %documents.root().display(), "Document storage ready");

    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        documents,
    };
    let app = build_app_router(state, &config);

    let ip = config.host.parse().expect("HOST must be an IP address");
    let addr = SocketAddr::new(ip, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    pool.close().await;
    tracing::info!("Shutdown complete");
}

/// `RUST_LOG` filters; `LOG_FORMAT=json` emits JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sitebook_api=debug,tower_http=debug".into());
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let registry = tracing_subscriber::registry().with(filter);
    if json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Connect, migrate, create the first admin if configured and drop refresh
/// sessions that can no longer be used.
async fn prepare_database(database_url: &str, config: &ServerConfig) -> DbPool {
    let pool = sitebook_db::create_pool(database_url)
        .await
        .expect("Failed to connect to database");
    sitebook_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    sitebook_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready, migrations applied");

    if let Some(admin) = &config.initial_admin {
        ensure_initial_admin(&pool, admin)
            .await
            .expect("Failed to create initial administrator");
    }

    match SessionRepo::purge_dead(&pool).await {
        Ok(removed) => tracing::info!(removed, "Purged dead refresh sessions"),
        Err(e) => tracing::warn!(error = %e, "Failed to purge refresh sessions"),
    }
    pool
}

/// Resolves on SIGINT, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("SIGINT received, shutting down"),
        () = terminate => tracing::info!("SIGTERM received, shutting down"),
    }
}
