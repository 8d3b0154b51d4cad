use crate::models::meal::{single_param, SortField, SortOrder};

/// Transient client state. The page script owns it and sends it along with
/// every refetch; rendering is a function of this plus the meal list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    /// Row awaiting a server response.
    pub loading_meal_id: Option<i64>,
    /// Row in inline-rename mode.
    pub editing_meal_id: Option<i64>,
    pub edit_name_draft: String,
}

impl UiState {
    /// Reads `sortBy`, `sortOrder`, `loadingMealId`, `editingMealId` and
    /// `editNameDraft`. A missing, repeated or unparseable key falls back to
    /// its own default without touching the others.
    pub fn from_query_pairs(pairs: &[(String, String)]) -> Self {
        let meal_id = |key: &str| single_param(pairs, key).and_then(|v| v.trim().parse::<i64>().ok());

        Self {
            sort_by: single_param(pairs, "sortBy")
                .map(SortField::from_param)
                .unwrap_or_default(),
            sort_order: single_param(pairs, "sortOrder")
                .map(SortOrder::from_param)
                .unwrap_or_default(),
            loading_meal_id: meal_id("loadingMealId"),
            editing_meal_id: meal_id("editingMealId"),
            edit_name_draft: single_param(pairs, "editNameDraft")
                .unwrap_or_default()
                .to_string(),
        }
    }

    /// Sort after clicking `column`: the active column flips its order, any
    /// other column becomes active in ascending order.
    pub fn next_sort(&self, column: SortField) -> (SortField, SortOrder) {
        if column == self.sort_by {
            (column, self.sort_order.flipped())
        } else {
            (column, SortOrder::Asc)
        }
    }

    pub fn is_loading(&self, meal_id: i64) -> bool {
        self.loading_meal_id == Some(meal_id)
    }

    pub fn any_loading(&self) -> bool {
        self.loading_meal_id.is_some()
    }

    pub fn is_editing(&self, meal_id: i64) -> bool {
        self.editing_meal_id == Some(meal_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_sort_by_last_cooked_ascending() {
        let state = UiState::default();
        assert_eq!(state.sort_by, SortField::LastCooked);
        assert_eq!(state.sort_order, SortOrder::Asc);
        assert!(!state.any_loading());
        assert_eq!(state.editing_meal_id, None);
    }

    #[test]
    fn clicking_the_active_column_flips_order() {
        let state = UiState::default();
        assert_eq!(
            state.next_sort(SortField::LastCooked),
            (SortField::LastCooked, SortOrder::Desc)
        );

        let state = UiState {
            sort_order: SortOrder::Desc,
            ..UiState::default()
        };
        assert_eq!(
            state.next_sort(SortField::LastCooked),
            (SortField::LastCooked, SortOrder::Asc)
        );
    }

    #[test]
    fn clicking_another_column_resets_to_ascending() {
        let state = UiState {
            sort_by: SortField::Name,
            sort_order: SortOrder::Desc,
            ..UiState::default()
        };
        assert_eq!(
            state.next_sort(SortField::TimesCooked),
            (SortField::TimesCooked, SortOrder::Asc)
        );
    }

    fn pairs(query: &[(&str, &str)]) -> Vec<(String, String)> {
        query
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn reads_camel_case_query_keys() {
        let state = UiState::from_query_pairs(&pairs(&[
            ("sortBy", "name"),
            ("sortOrder", "desc"),
            ("loadingMealId", "4"),
            ("editingMealId", "2"),
            ("editNameDraft", "Soup"),
        ]));

        assert_eq!(state.sort_by, SortField::Name);
        assert_eq!(state.sort_order, SortOrder::Desc);
        assert!(state.is_loading(4));
        assert!(!state.is_loading(2));
        assert!(state.is_editing(2));
        assert_eq!(state.edit_name_draft, "Soup");
    }

    #[test]
    fn a_bad_key_only_resets_itself() {
        let state = UiState::from_query_pairs(&pairs(&[
            ("sortBy", "timesCooked"),
            ("sortOrder", "desc"),
            ("loadingMealId", "soon"),
            ("editingMealId", "3"),
            ("editingMealId", "4"),
        ]));

        assert_eq!(state.sort_by, SortField::TimesCooked);
        assert_eq!(state.sort_order, SortOrder::Desc);
        assert!(!state.any_loading());
        assert_eq!(state.editing_meal_id, None);
    }
}
