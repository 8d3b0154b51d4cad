use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::error::{AppError, AppResult};
use crate::models::meal::{
    parse_meal_id, CreateMealRequest, ListMealsQuery, Meal, RenameMealRequest,
};
use crate::AppState;

/// GET /api/meals?sortBy=&order=
///
/// Bad or duplicated parameters degrade to their defaults instead of failing.
pub async fn list_meals(
    State(state): State<AppState>,
    query: Option<Query<Vec<(String, String)>>>,
) -> AppResult<Json<Vec<Meal>>> {
    let pairs = query.map(|Query(pairs)| pairs).unwrap_or_default();
    let query = ListMealsQuery::from_pairs(&pairs);
    let meals = Meal::list(&state.db, query.sort_by, query.order).await?;
    Ok(Json(meals))
}

/// A request without a JSON content type reads as an empty object, so the
/// field rules report what is missing.
fn body_or_empty<T: Default>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        Err(rejection) => Err(rejection.into()),
    }
}

pub async fn create_meal(
    State(state): State<AppState>,
    payload: Result<Json<CreateMealRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Meal>)> {
    let body = body_or_empty(payload)?;
    let new_meal = body.validate().map_err(AppError::Validation)?;

    let meal = Meal::create(&state.db, &new_meal).await?;
    tracing::info!(meal_id = meal.id, "Meal created");

    Ok((StatusCode::CREATED, Json(meal)))
}

pub async fn mark_cooked_today(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<Meal>> {
    let meal_id = parse_meal_id(&raw_id).map_err(AppError::Validation)?;
    let today = Utc::now().date_naive();

    let meal = Meal::mark_cooked(&state.db, meal_id, today)
        .await?
        .ok_or(AppError::NotFound("Meal not found.".into()))?;

    Ok(Json(meal))
}

pub async fn rename_meal(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<RenameMealRequest>, JsonRejection>,
) -> AppResult<Json<Meal>> {
    let meal_id = parse_meal_id(&raw_id).map_err(AppError::Validation)?;
    let body = body_or_empty(payload)?;
    let name = body.validate().map_err(AppError::Validation)?;

    let meal = Meal::rename(&state.db, meal_id, &name)
        .await?
        .ok_or(AppError::NotFound("Meal not found.".into()))?;

    Ok(Json(meal))
}
