use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vendorhub_api::config::ServerConfig;
use vendorhub_api::notifications::log_contract_events;
use vendorhub_api::router::build_app_router;
use vendorhub_api::state::AppState;
use vendorhub_core::storage::{ContractStore, LocalDocumentStore};
use vendorhub_core::vendor::VendorDirectory;
use vendorhub_db::{PgContractStore, PgVendorDirectory};
use vendorhub_engine::memory::{MemoryContractStore, StaticVendorDirectory};
use vendorhub_engine::{spawn_reload_on_change, ContractEngine};
use vendorhub_events::BroadcastNotifier;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "vendorhub_api=debug,vendorhub_engine=debug,vendorhub_db=info,tower_http=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Storage ---
    let mut listener_handle = None;
    let (pool, store, vendors): (_, Arc<dyn ContractStore>, Arc<dyn VendorDirectory>) =
        match &config.database_url {
            Some(database_url) => {
                let pool = vendorhub_db::create_pool(database_url)
                    .await
                    .expect("Failed to connect to database");
                tracing::info!("Database connection pool created");

                vendorhub_db::health_check(&pool)
                    .await
                    .expect("Database health check failed");
                tracing::info!("Database health check passed");

                vendorhub_db::run_migrations(&pool)
                    .await
                    .expect("Failed to run database migrations");
                tracing::info!("Database migrations applied");

                let store = PgContractStore::new(pool.clone());
                listener_handle = Some(
                    store
                        .listen()
                        .await
                        .expect("Failed to subscribe to contract changes"),
                );

                (
                    Some(pool.clone()),
                    Arc::new(store),
                    Arc::new(PgVendorDirectory::new(pool)),
                )
            }
            None => {
                tracing::warn!("DATABASE_URL not set, contracts are kept in memory only");
                (
                    None,
                    Arc::new(MemoryContractStore::new()),
                    Arc::new(StaticVendorDirectory::new(&config.seed_vendor_names)),
                )
            }
        };

    // --- Documents ---
    tokio::fs::create_dir_all(&config.document_dir)
        .await
        .expect("Failed to create document directory");
    let documents = Arc::new(LocalDocumentStore::new(
        &config.document_dir,
        &config.document_base_url,
    ));
    tracing::info!(dir = %documents.root().display(), "Document store ready");

    // --- Notifications ---
    let notifier = Arc::new(BroadcastNotifier::default());
    let event_log_handle = tokio::spawn(log_contract_events(notifier.subscribe()));

    // --- Engine ---
    let changes = store.subscribe_changes();
    let mut engine = ContractEngine::new(Arc::clone(&store), documents).with_notifier(notifier);
    if let Err(e) = engine.reload().await {
        tracing::error!(error = %e, "Initial contract load failed, starting empty");
    }
    tracing::info!(count = engine.contracts().len(), "Contracts loaded");

    let engine = Arc::new(Mutex::new(engine));
    let watcher_handle = spawn_reload_on_change(Arc::clone(&engine), changes);

    // --- App state ---
    let state = AppState {
        engine,
        vendors,
        pool,
        config: Arc::new(config.clone()),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    if let Some(handle) = listener_handle {
        handle.abort();
    }
    watcher_handle.abort();
    tracing::info!("Change watcher stopped");

    event_log_handle.abort();
    tracing::info!("Contract event log stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
