use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use memoriam::{
    api::{self, state::AppState},
    config::Settings,
    repository, service, storage,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memoriam=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let settings = Settings::new()
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // A missing admin credential is a deployment fault; fail loudly now
    // rather than answering every /admin call with a generic 401.
    settings.validate()?;

    tracing::info!(
        "Starting Memoriam server on {}:{}",
        settings.server.host,
        settings.server.port
    );

    // Initialize database
    let db_pool = SqlitePoolOptions::new()
        .max_connections(settings.database.max_connections)
        .connect(&settings.database.url)
        .await?;

    // Run migrations
    sqlx::migrate!("./migrations").run(&db_pool).await?;

    // One-shot storage probe; degraded mode is logged, never fatal.
    let storage_status = storage::init(&settings.storage).await;

    // Initialize repositories
    let funeral_repo = Arc::new(repository::SqliteFuneralRepository::new(db_pool.clone()));
    let condolence_repo = Arc::new(repository::SqliteCondolenceRepository::new(db_pool.clone()));
    let donation_repo = Arc::new(repository::SqliteDonationRepository::new(db_pool.clone()));

    // Create service context
    let service_context = Arc::new(service::ServiceContext::new(
        funeral_repo,
        condolence_repo,
        donation_repo,
        db_pool.clone(),
    ));

    let app_state = AppState::new(
        service_context,
        Arc::new(settings.clone()),
        Arc::new(storage_status),
    );

    let app = api::create_app(app_state);

    let listener = tokio::net::TcpListener::bind(format!(
        "{}:{}",
        settings.server.host, settings.server.port
    ))
    .await?;

    tracing::info!(
        "Server listening on http://{}:{}",
        settings.server.host,
        settings.server.port
    );

    axum::serve(listener, app).await?;

    Ok(())
}
