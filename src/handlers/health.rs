use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Checks {
    pub database: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Readiness {
    pub status: &'static str,
    pub checks: Checks,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meals: Option<i64>,
}

pub async fn health_check() -> Json<Health> {
    Json(Health {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Ready once the meals table can be read, which also proves the migration ran.
pub async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<Readiness>) {
    match sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM meals")
        .fetch_one(&state.db)
        .await
    {
        Ok(count) => (
            StatusCode::OK,
            Json(Readiness {
                status: "ready",
                checks: Checks { database: "ok" },
                meals: Some(count),
            }),
        ),
        Err(err) => {
            tracing::warn!(error = %err, "meals table unreadable, not ready");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(Readiness {
                    status: "not_ready",
                    checks: Checks { database: "failed" },
                    meals: None,
                }),
            )
        }
    }
}
