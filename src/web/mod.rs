//! Browser-facing half of the app: the UI state the page carries between
//! requests, and the pure functions that turn a meal list plus that state
//! into markup.

pub mod render;
pub mod state;

pub use state::UiState;
