use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::broadcast::{error::RecvError, Receiver};
use tracing::{error, info, warn};

use sbt_api::{build_router, AppState};
use sbt_core::domain::ControlPlaneEvent;
use sbt_core::repositories::{EventPublisher, RecordStore};
use sbt_core::services::BillingService;
use sbt_infrastructure::{create_pool, run_migrations, EventBus, MemoryRecordStore, PgRecordStore};
use sbt_security::JwtService;
use sbt_shared::config::{AppConfig, DatabaseSettings, StorageBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize telemetry
    let _log_guard = sbt_shared::telemetry::init_telemetry(&config.log)?;
    info!("Control plane starting ({})...", config.app.env);

    let store = open_store(&config.database).await?;

    // Event bus and the billing consumer
    let bus = Arc::new(EventBus::from_settings(&config.events));
    let billing = Arc::new(BillingService::new(store.clone()));
    tokio::spawn(run_billing_consumer(billing, bus.subscribe()));
    info!("Billing subscribed to event bus {}", bus.bus_name());

    let jwt = JwtService::new(
        config.auth.jwt_secret.clone(),
        config.auth.audience.clone(),
        config.auth.token_expiry_secs,
    );
    let publisher: Arc<dyn EventPublisher> = bus;
    let state = AppState::new(store, publisher, jwt, config.auth.sys_admin_role.clone());
    let app = build_router(state);

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Control plane stopped");
    Ok(())
}

async fn open_store(settings: &DatabaseSettings) -> anyhow::Result<Arc<dyn RecordStore>> {
    match settings.backend {
        StorageBackend::Postgres => {
            info!("Connecting to database...");
            let pool = create_pool(&settings.url, settings.max_connections, settings.acquire_timeout_secs)
                .await
                .context("Failed to connect to database")?;
            run_migrations(&pool).await.context("Failed to run migrations")?;
            info!("Database connection established.");
            Ok(Arc::new(PgRecordStore::new(pool)))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory record store; data is lost on restart");
            Ok(Arc::new(MemoryRecordStore::new()))
        }
    }
}

async fn run_billing_consumer(billing: Arc<BillingService>, mut events: Receiver<ControlPlaneEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => billing.handle_event(&event).await,
            Err(RecvError::Lagged(skipped)) => {
                error!("Billing consumer lagged, {} events dropped", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Event bus closed, billing consumer stopping");
                break;
            }
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
