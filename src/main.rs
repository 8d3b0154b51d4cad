use sqlx::SqlitePool;

mod app;
mod config;
mod db;
mod error;
mod handlers;
mod models;
mod web;

use config::Config;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "meal_planner=debug,tower_http=debug".into());
    let pretty_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "pretty")
        .unwrap_or(false);

    if pretty_logs {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .json()
            .init();
    }

    let config = Config::from_env()?;

    // Database
    let db = db::create_pool(&config.database_url).await?;
    db::initialize(&db).await?;

    let app = app::build_app(AppState { db });

    let addr = config.listen_addr();
    tracing::info!("Meal planner running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
