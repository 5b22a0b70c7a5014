use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shipready_core::{
    load_config, validate_config, Config, HttpStatusChecker, JiraClient, PrepCatalog,
    PrepItemStore, PrepNotification, ResolverEngine, SqlitePrepRepository, SystemClock,
};
use shipready_server::{api::create_router, metrics, state::AppState};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("SHIPREADY_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!(version = VERSION, "Configuration loaded successfully");
    info!("Database path: {:?}", config.database.path);

    let resolver = build_resolver(&config);

    let catalog = match &config.catalog {
        Some(definitions) => {
            info!(items = definitions.len(), "Using configured prep catalog");
            PrepCatalog::new(definitions.clone())
        }
        None => PrepCatalog::builtin(),
    };

    // Create SQLite prep record repository
    let repository = Arc::new(
        SqlitePrepRepository::new(&config.database.path, config.readiness.record_key.clone())
            .context("Failed to create prep repository")?,
    );
    info!("Prep repository initialized");

    let store = Arc::new(
        PrepItemStore::open(catalog, repository, resolver, Arc::new(SystemClock)).await,
    );

    // Log store notifications
    let notifications = tokio::spawn(log_notifications(Arc::clone(&store)));

    // Force registration so /metrics is complete from the first scrape
    once_cell::sync::Lazy::force(&metrics::REGISTRY);

    let state = Arc::new(AppState::new(config.clone(), store));

    // Create router
    let app = create_router(Arc::clone(&state));

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down...");
    state.close_all_views().await;
    notifications.abort();
    info!("Release views closed");

    Ok(())
}

/// Wire up the optional ticket and status collaborators.
fn build_resolver(config: &Config) -> ResolverEngine {
    let mut resolver = ResolverEngine::new();

    match &config.jira {
        Some(jira_config) => match JiraClient::new(jira_config.clone()) {
            Ok(client) => {
                info!("Initializing Jira client at {}", jira_config.url);
                resolver = resolver.with_ticket_query(Arc::new(client));
            }
            Err(e) => error!("Failed to create Jira client: {}", e),
        },
        None => info!("No Jira configured, ticket checks will need confirmation"),
    }

    match &config.status_check {
        Some(status_config) => match HttpStatusChecker::new(status_config.clone()) {
            Ok(checker) => {
                info!("Initializing status checker");
                resolver = resolver.with_status_check(Arc::new(checker));
            }
            Err(e) => error!("Failed to create status checker: {}", e),
        },
        None => info!("No status checker configured, API checks will need confirmation"),
    }

    resolver
}

/// Surface store notifications in the log.
async fn log_notifications(store: Arc<PrepItemStore>) {
    let mut rx = store.subscribe();
    loop {
        match rx.recv().await {
            Ok(PrepNotification::PersistFailed { reason }) => {
                warn!(reason = %reason, "Prep changes were not saved")
            }
            Ok(notification) => info!(?notification, "Prep notification"),
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "Notification log fell behind"),
            Err(RecvError::Closed) => break,
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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
}
