use std::borrow::Cow;
use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::meal::{Category, Meal, SortField, SortOrder};
use crate::web::UiState;

struct CategoryMeta {
    key: &'static str,
    label: &'static str,
    badge_class: &'static str,
}

// Wider than the enforced set on purpose: chicken and soup are display-only
// and never accepted on write.
const CATEGORY_META: [CategoryMeta; 5] = [
    CategoryMeta { key: "meat", label: "Meat", badge_class: "category-meat" },
    CategoryMeta { key: "vegetarian", label: "Vegetarian", badge_class: "category-vegetarian" },
    CategoryMeta { key: "fish", label: "Fish", badge_class: "category-fish" },
    CategoryMeta { key: "chicken", label: "Chicken", badge_class: "category-chicken" },
    CategoryMeta { key: "soup", label: "Soup", badge_class: "category-soup" },
];

const FALLBACK_BADGE_CLASS: &str = "category-other";

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

pub fn category_label(category: &str) -> Cow<'static, str> {
    if let Some(meta) = CATEGORY_META.iter().find(|m| m.key == category) {
        return Cow::Borrowed(meta.label);
    }
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => Cow::Owned(first.to_uppercase().chain(chars).collect()),
        None => Cow::Borrowed(""),
    }
}

pub fn category_badge_class(category: &str) -> &'static str {
    CATEGORY_META
        .iter()
        .find(|m| m.key == category)
        .map(|m| m.badge_class)
        .unwrap_or(FALLBACK_BADGE_CLASS)
}

/// Real calendar dates are normalised; anything else is shown verbatim.
pub fn format_date(value: &str) -> String {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| value.to_string())
}

fn column_label(field: SortField) -> &'static str {
    match field {
        SortField::Name => "Name",
        SortField::Category => "Category",
        SortField::LastCooked => "Last cooked",
        SortField::TimesCooked => "Times cooked",
    }
}

fn sort_arrow(state: &UiState, field: SortField) -> &'static str {
    if field != state.sort_by {
        return "";
    }
    match state.sort_order {
        SortOrder::Asc => " \u{2191}",
        SortOrder::Desc => " \u{2193}",
    }
}

pub fn status_summary(count: usize, state: &UiState) -> String {
    format!(
        "{count} meals shown. Sorted by {} ({}).",
        state.sort_by, state.sort_order
    )
}

/// `<thead>` and `<tbody>` for the meal table.
pub fn render_table(meals: &[Meal], state: &UiState) -> String {
    let mut html = String::from("<thead><tr>");
    for field in SortField::ALL {
        let (next_by, next_order) = state.next_sort(field);
        let active = if field == state.sort_by { " active" } else { "" };
        let _ = write!(
            html,
            r#"<th><button type="button" class="sort-button{active}" data-sort-by="{next_by}" data-sort-order="{next_order}">{}{}</button></th>"#,
            column_label(field),
            sort_arrow(state, field),
        );
    }
    html.push_str("<th>Actions</th></tr></thead><tbody id=\"meal-rows\">");
    html.push_str(&render_rows(meals, state));
    html.push_str("</tbody>");
    html
}

pub fn render_rows(meals: &[Meal], state: &UiState) -> String {
    if meals.is_empty() {
        return r#"<tr><td colspan="5">No meals yet. Add one above.</td></tr>"#.to_string();
    }
    meals.iter().map(|meal| render_row(meal, state)).collect()
}

fn render_row(meal: &Meal, state: &UiState) -> String {
    let id = meal.id;
    let disabled_any = if state.any_loading() { " disabled" } else { "" };

    let (name_cell, action_cell) = if state.is_editing(id) {
        (
            format!(
                r#"<input class="name-edit-input" data-action="edit-name-input" data-id="{id}" value="{}" maxlength="80" />"#,
                escape_html(&state.edit_name_draft),
            ),
            format!(
                r#"<div class="action-buttons"><button type="button" data-action="save-name" data-id="{id}"{disabled_any}>Save</button><button type="button" class="secondary" data-action="cancel-name" data-id="{id}"{disabled_any}>Cancel</button></div>"#,
            ),
        )
    } else {
        let (disabled_row, cooked_label) = if state.is_loading(id) {
            (" disabled", "Saving...")
        } else {
            ("", "Cooked today")
        };
        (
            escape_html(&meal.name),
            format!(
                r#"<div class="action-buttons"><button type="button" class="secondary" data-action="edit-name" data-id="{id}" data-name="{}"{disabled_any}>Edit name</button><button type="button" data-action="cooked-today" data-id="{id}"{disabled_row}>{cooked_label}</button></div>"#,
                escape_html(&meal.name),
            ),
        )
    };

    format!(
        r#"<tr data-id="{id}"><td>{name_cell}</td><td><span class="category-badge {}">{}</span></td><td>{}</td><td>{}</td><td>{action_cell}</td></tr>"#,
        category_badge_class(&meal.category),
        escape_html(&category_label(&meal.category)),
        escape_html(&format_date(&meal.last_cooked)),
        meal.times_cooked,
    )
}

/// The whole document. The table starts out rendered for `state`; the page
/// script replaces it on every refetch.
pub fn render_page(meals: &[Meal], state: &UiState) -> String {
    let category_options: String = Category::ALL
        .iter()
        .map(|c| {
            format!(
                r#"<option value="{}">{}</option>"#,
                c.as_str(),
                category_label(c.as_str())
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8" />
<meta name="viewport" content="width=device-width, initial-scale=1" />
<title>Meal planner</title>
<link rel="stylesheet" href="/style.css" />
</head>
<body>
<main>
<h1>Meal planner</h1>
<form id="add-meal-form">
<label>Name <input name="name" required minlength="2" maxlength="80" /></label>
<label>Category <select name="category">{category_options}</select></label>
<label>Last cooked <input name="lastCooked" type="date" required /></label>
<label>Times cooked <input id="timesCooked" name="timesCooked" type="number" min="0" step="1" value="0" /></label>
<button type="submit">Add meal</button>
</form>
<p id="status" class="status">{}</p>
<table id="meal-table">{}</table>
</main>
<script src="/app.js"></script>
</body>
</html>
"#,
        escape_html(&status_summary(meals.len(), state)),
        render_table(meals, state),
    )
}
