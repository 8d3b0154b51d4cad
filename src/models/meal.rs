use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{FromRow, SqlitePool};

lazy_static! {
    // Shape only. Calendar validity is deliberately not checked, so
    // "2024-13-40" is accepted.
    static ref ISO_DATE: Regex = Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap();
}

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 80;

const MEAL_COLUMNS: &str = "id, name, category, last_cooked, times_cooked";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub last_cooked: String,
    pub times_cooked: i64,
}

/// Categories accepted on write. The table's CHECK constraint mirrors this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Meat,
    Vegetarian,
    Fish,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Meat, Category::Vegetarian, Category::Fish];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Meat => "meat",
            Category::Vegetarian => "vegetarian",
            Category::Fish => "fish",
        }
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or(())
    }
}

/// Externally visible sort keys. Anything unrecognised sorts by `lastCooked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    Name,
    Category,
    #[default]
    LastCooked,
    TimesCooked,
}

impl SortField {
    pub const ALL: [SortField; 4] = [
        SortField::Name,
        SortField::Category,
        SortField::LastCooked,
        SortField::TimesCooked,
    ];

    pub fn from_param(param: &str) -> Self {
        match param {
            "name" => SortField::Name,
            "category" => SortField::Category,
            "timesCooked" => SortField::TimesCooked,
            _ => SortField::LastCooked,
        }
    }

    pub fn as_param(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Category => "category",
            SortField::LastCooked => "lastCooked",
            SortField::TimesCooked => "timesCooked",
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Category => "category",
            SortField::LastCooked => "last_cooked",
            SortField::TimesCooked => "times_cooked",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

/// Ascending unless the parameter is literally `desc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn from_param(param: &str) -> Self {
        if param == "desc" {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn flipped(&self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    fn sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

/// The value of `key` when it occurs exactly once in a query string.
/// A repeated key counts as unset.
pub fn single_param<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    let mut values = pairs
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.as_str());
    match (values.next(), values.next()) {
        (Some(value), None) => Some(value),
        _ => None,
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ListMealsQuery {
    pub sort_by: SortField,
    pub order: SortOrder,
}

impl ListMealsQuery {
    /// Each key is read on its own, so a bad `sortBy` keeps a good `order`
    /// and the other way round.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            sort_by: single_param(pairs, "sortBy")
                .map(SortField::from_param)
                .unwrap_or_default(),
            order: single_param(pairs, "order")
                .map(SortOrder::from_param)
                .unwrap_or_default(),
        }
    }
}

/// POST /api/meals. Fields stay loosely typed so that wrong JSON types are
/// reported with the same messages as out-of-range values.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMealRequest {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub category: Option<Value>,
    #[serde(default)]
    pub last_cooked: Option<Value>,
    #[serde(default)]
    pub times_cooked: Option<Value>,
}

/// PATCH /api/meals/:id
#[derive(Debug, Default, Deserialize)]
pub struct RenameMealRequest {
    #[serde(default)]
    pub name: Option<Value>,
}

/// A create request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMeal {
    pub name: String,
    pub category: Category,
    pub last_cooked: String,
    pub times_cooked: i64,
}

impl CreateMealRequest {
    pub fn validate(&self) -> Result<NewMeal, String> {
        let name = validate_name(self.name.as_ref())?;

        let category = self
            .category
            .as_ref()
            .and_then(Value::as_str)
            .and_then(|c| c.parse::<Category>().ok())
            .ok_or_else(|| "Category must be meat, vegetarian, or fish.".to_string())?;

        let last_cooked = self
            .last_cooked
            .as_ref()
            .and_then(Value::as_str)
            .filter(|d| ISO_DATE.is_match(d))
            .ok_or_else(|| "lastCooked must be in YYYY-MM-DD format.".to_string())?;

        let times_cooked = parse_times_cooked(self.times_cooked.as_ref())
            .ok_or_else(|| "timesCooked must be a non-negative integer.".to_string())?;

        Ok(NewMeal {
            name,
            category,
            last_cooked: last_cooked.to_string(),
            times_cooked,
        })
    }
}

impl RenameMealRequest {
    pub fn validate(&self) -> Result<String, String> {
        validate_name(self.name.as_ref())
    }
}

/// Returns the trimmed name.
fn validate_name(value: Option<&Value>) -> Result<String, String> {
    let trimmed = value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|n| n.chars().count() >= NAME_MIN_CHARS)
        .ok_or_else(|| format!("Name must be at least {NAME_MIN_CHARS} characters."))?;

    if trimmed.chars().count() > NAME_MAX_CHARS {
        return Err(format!("Name must be at most {NAME_MAX_CHARS} characters."));
    }

    Ok(trimmed.to_string())
}

/// Integers, integral floats (`3.0`) and numeric strings (`"3"`) are accepted.
fn parse_times_cooked(value: Option<&Value>) -> Option<i64> {
    let parsed = match value? {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.filter(|n| *n >= 0)
}

/// Path ids must be positive integers.
pub fn parse_meal_id(raw: &str) -> Result<i64, String> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id >= 1)
        .ok_or_else(|| "Invalid meal id.".to_string())
}

impl Meal {
    pub async fn list(
        db: &SqlitePool,
        sort_by: SortField,
        order: SortOrder,
    ) -> Result<Vec<Meal>, sqlx::Error> {
        // Both fragments come from fixed allow-lists, never from the request.
        let sql = format!(
            "SELECT {MEAL_COLUMNS} FROM meals ORDER BY {} {}, id ASC",
            sort_by.column(),
            order.sql(),
        );
        sqlx::query_as::<_, Meal>(&sql).fetch_all(db).await
    }

    pub async fn create(db: &SqlitePool, meal: &NewMeal) -> Result<Meal, sqlx::Error> {
        sqlx::query_as::<_, Meal>(&format!(
            r#"
            INSERT INTO meals (name, category, last_cooked, times_cooked)
            VALUES ($1, $2, $3, $4)
            RETURNING {MEAL_COLUMNS}
            "#
        ))
        .bind(&meal.name)
        .bind(meal.category.as_str())
        .bind(&meal.last_cooked)
        .bind(meal.times_cooked)
        .fetch_one(db)
        .await
    }

    /// Sets `last_cooked` to `today` and bumps the counter in one statement.
    /// `None` when no row has this id.
    pub async fn mark_cooked(
        db: &SqlitePool,
        id: i64,
        today: NaiveDate,
    ) -> Result<Option<Meal>, sqlx::Error> {
        sqlx::query_as::<_, Meal>(&format!(
            r#"
            UPDATE meals
            SET last_cooked = $1, times_cooked = times_cooked + 1
            WHERE id = $2
            RETURNING {MEAL_COLUMNS}
            "#
        ))
        .bind(today.format("%Y-%m-%d").to_string())
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn rename(
        db: &SqlitePool,
        id: i64,
        name: &str,
    ) -> Result<Option<Meal>, sqlx::Error> {
        sqlx::query_as::<_, Meal>(&format!(
            r#"
            UPDATE meals
            SET name = $1
            WHERE id = $2
            RETURNING {MEAL_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(id)
        .fetch_optional(db)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_request(body: Value) -> CreateMealRequest {
        serde_json::from_value(body).unwrap()
    }

    fn valid_body() -> Value {
        json!({
            "name": "Pasta carbonara",
            "category": "meat",
            "lastCooked": "2026-03-01",
            "timesCooked": 2
        })
    }

    #[test]
    fn unknown_sort_params_fall_back_to_defaults() {
        assert_eq!(SortField::from_param("calories"), SortField::LastCooked);
        assert_eq!(SortField::from_param(""), SortField::LastCooked);
        assert_eq!(SortField::from_param("last_cooked"), SortField::LastCooked);
        assert_eq!(SortOrder::from_param("DESC"), SortOrder::Asc);
        assert_eq!(SortOrder::from_param("descending"), SortOrder::Asc);
        assert_eq!(SortOrder::from_param("desc"), SortOrder::Desc);
    }

    fn pairs(query: &[(&str, &str)]) -> Vec<(String, String)> {
        query
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn list_query_reads_each_key_independently() {
        let query = ListMealsQuery::from_pairs(&pairs(&[
            ("sortBy", "name"),
            ("sortBy", "x"),
            ("order", "desc"),
        ]));
        assert_eq!(query.sort_by, SortField::LastCooked);
        assert_eq!(query.order, SortOrder::Desc);

        let query = ListMealsQuery::from_pairs(&pairs(&[
            ("sortBy", "name"),
            ("order", "desc"),
            ("order", "asc"),
        ]));
        assert_eq!(query.sort_by, SortField::Name);
        assert_eq!(query.order, SortOrder::Asc);

        assert_eq!(ListMealsQuery::from_pairs(&[]), ListMealsQuery::default());
    }

    #[test]
    fn sort_params_round_trip_through_their_names() {
        for field in SortField::ALL {
            assert_eq!(SortField::from_param(field.as_param()), field);
        }
    }

    #[test]
    fn valid_create_trims_the_name() {
        let mut body = valid_body();
        body["name"] = json!("  AB ");
        let meal = create_request(body).validate().unwrap();
        assert_eq!(meal.name, "AB");
        assert_eq!(meal.category, Category::Meat);
        assert_eq!(meal.times_cooked, 2);
    }

    #[test]
    fn create_rejects_short_or_missing_names() {
        for name in [json!("A"), json!("   "), json!(42), Value::Null] {
            let mut body = valid_body();
            body["name"] = name;
            assert_eq!(
                create_request(body).validate().unwrap_err(),
                "Name must be at least 2 characters."
            );
        }
        let mut body = valid_body();
        body.as_object_mut().unwrap().remove("name");
        assert!(create_request(body).validate().is_err());
    }

    #[test]
    fn create_rejects_names_over_the_limit() {
        let mut body = valid_body();
        body["name"] = json!("x".repeat(NAME_MAX_CHARS + 1));
        assert_eq!(
            create_request(body).validate().unwrap_err(),
            "Name must be at most 80 characters."
        );
    }

    #[test]
    fn create_only_accepts_enforced_categories() {
        for category in [json!("dessert"), json!("chicken"), json!("Meat"), json!(1)] {
            let mut body = valid_body();
            body["category"] = category;
            assert_eq!(
                create_request(body).validate().unwrap_err(),
                "Category must be meat, vegetarian, or fish."
            );
        }
    }

    #[test]
    fn last_cooked_is_checked_for_shape_only() {
        let mut body = valid_body();
        body["lastCooked"] = json!("2024-1-5");
        assert_eq!(
            create_request(body).validate().unwrap_err(),
            "lastCooked must be in YYYY-MM-DD format."
        );

        // Out-of-range month and day pass: there is no calendar check.
        let mut body = valid_body();
        body["lastCooked"] = json!("2024-13-40");
        assert_eq!(create_request(body).validate().unwrap().last_cooked, "2024-13-40");
    }

    #[test]
    fn last_cooked_rejects_trailing_text_and_non_ascii_digits() {
        for date in ["2024-01-05\n", "2024-01-05T00:00", "٢٠٢٤-01-05"] {
            let mut body = valid_body();
            body["lastCooked"] = json!(date);
            assert!(create_request(body).validate().is_err(), "{date:?}");
        }
    }

    #[test]
    fn times_cooked_accepts_integral_numbers_and_numeric_strings() {
        assert_eq!(parse_times_cooked(Some(&json!(0))), Some(0));
        assert_eq!(parse_times_cooked(Some(&json!(3.0))), Some(3));
        assert_eq!(parse_times_cooked(Some(&json!("7"))), Some(7));
        assert_eq!(parse_times_cooked(Some(&json!(-1))), None);
        assert_eq!(parse_times_cooked(Some(&json!(1.5))), None);
        assert_eq!(parse_times_cooked(Some(&json!("many"))), None);
        assert_eq!(parse_times_cooked(Some(&json!(true))), None);
        assert_eq!(parse_times_cooked(Some(&Value::Null)), None);
        assert_eq!(parse_times_cooked(None), None);
    }

    #[test]
    fn rename_validates_like_create() {
        let request = RenameMealRequest { name: Some(json!("  Soup  ")) };
        assert_eq!(request.validate().unwrap(), "Soup");

        let request = RenameMealRequest { name: Some(json!(" ")) };
        assert!(request.validate().is_err());
    }

    #[test]
    fn meal_ids_must_be_positive_integers() {
        assert_eq!(parse_meal_id("12"), Ok(12));
        for raw in ["0", "-3", "abc", "1.5", ""] {
            assert_eq!(parse_meal_id(raw), Err("Invalid meal id.".to_string()));
        }
    }

    #[test]
    fn meal_serializes_with_camel_case_keys() {
        let meal = Meal {
            id: 1,
            name: "Fiskgratang".into(),
            category: "fish".into(),
            last_cooked: "2026-02-03".into(),
            times_cooked: 5,
        };
        assert_eq!(
            serde_json::to_value(&meal).unwrap(),
            json!({
                "id": 1,
                "name": "Fiskgratang",
                "category": "fish",
                "lastCooked": "2026-02-03",
                "timesCooked": 5
            })
        );
    }
}
