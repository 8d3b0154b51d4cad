use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse},
    Json,
};
use serde::Serialize;

use crate::error::AppResult;
use crate::models::meal::Meal;
use crate::web::{render, UiState};
use crate::AppState;

const APP_JS: &str = include_str!("../../assets/app.js");
const STYLE_CSS: &str = include_str!("../../assets/style.css");

#[derive(Debug, Serialize)]
pub struct TableView {
    pub table: String,
    pub status: String,
    pub count: usize,
}

/// GET /
pub async fn index(State(state): State<AppState>) -> AppResult<Html<String>> {
    let ui = UiState::default();
    let meals = Meal::list(&state.db, ui.sort_by, ui.sort_order).await?;
    Ok(Html(render::render_page(&meals, &ui)))
}

/// GET /ui/meals?sortBy=&sortOrder=&loadingMealId=&editingMealId=&editNameDraft=
///
/// The page's refetch: lists meals with the state's sort and renders them.
pub async fn meals_table(
    State(state): State<AppState>,
    query: Option<Query<Vec<(String, String)>>>,
) -> AppResult<Json<TableView>> {
    let pairs = query.map(|Query(pairs)| pairs).unwrap_or_default();
    let ui = UiState::from_query_pairs(&pairs);
    let meals = Meal::list(&state.db, ui.sort_by, ui.sort_order).await?;

    Ok(Json(TableView {
        table: render::render_table(&meals, &ui),
        status: render::status_summary(meals.len(), &ui),
        count: meals.len(),
    }))
}

pub async fn app_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        APP_JS,
    )
}

pub async fn style_css() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLE_CSS)
}
