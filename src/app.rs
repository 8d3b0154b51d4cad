use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::handlers;
use crate::AppState;

pub fn build_app(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            "/api/meals",
            get(handlers::meals::list_meals).post(handlers::meals::create_meal),
        )
        .route("/api/meals/:id", patch(handlers::meals::rename_meal))
        .route(
            "/api/meals/:id/cooked-today",
            post(handlers::meals::mark_cooked_today),
        );

    let page_routes = Router::new()
        .route("/", get(handlers::ui::index))
        .route("/ui/meals", get(handlers::ui::meals_table))
        .route("/app.js", get(handlers::ui::app_js))
        .route("/style.css", get(handlers::ui::style_css));

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .merge(api_routes)
        .merge(page_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Router state over a fresh, migrated and seeded in-memory database.
#[cfg(test)]
pub async fn test_state() -> AppState {
    let db = crate::db::create_memory_pool().await;
    crate::db::initialize(&db)
        .await
        .expect("initialize test database");
    AppState { db }
}
