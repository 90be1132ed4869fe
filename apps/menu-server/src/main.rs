use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::{error, info};

use menu_api::{router, AppState};
use menu_core::services::MenuMigrateService;
use menu_infrastructure::{create_pool, run_migrations, PgMenuRepository};
use menu_shared::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Load configuration
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize telemetry
    let _log_guard = menu_shared::telemetry::init_telemetry(&config.telemetry)?;

    info!("Menu server starting ({})...", config.app.env);

    // Connect to Database
    let pool = match create_pool(&config.database).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };
    run_migrations(&pool).await?;
    info!("Database connection established.");

    // Create App State
    let repository = Arc::new(PgMenuRepository::new(pool));
    let service = Arc::new(MenuMigrateService::new(repository, config.migrate.producer.clone()));
    let state = AppState::new(service, config.migrate.max_upload_bytes);

    // Build router
    let app = router(state).layer(TraceLayer::new_for_http());

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
