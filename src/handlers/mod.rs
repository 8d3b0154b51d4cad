pub mod health;
pub mod meals;
pub mod ui;
