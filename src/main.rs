mod db;
mod error;
mod routes;
mod state;
mod task;

use anyhow::Context;
use db::{create_pool, run_migrations};
use routes::create_router;
use state::{AppState, Config};
use std::sync::Arc;
use task::{TaskRepository, TaskService};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,taskboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env()?);

    tracing::info!("Connecting to database...");
    let db = create_pool(&config.database_url, config.database_max_connections)
        .await
        .with_context(|| format!("failed to open database {}", config.database_url))?;

    tracing::info!("Running migrations...");
    run_migrations(&db).await.context("failed to create schema")?;

    let task_service = TaskService::new(TaskRepository::new(db.clone()));

    let state = AppState {
        config: config.clone(),
        task_service,
    };

    let app = create_router(state);

    let addr = config.bind_addr();
    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
