//! Nutrition intelligence for a personal food diary.
//!
//! Turns a user's meal log and body-metric history into ranked nutrient
//! gaps, food suggestions from a static catalog, and short-horizon trend
//! forecasts. All analysis is synchronous and side-effect free; loading the
//! inputs is the caller's job (see [`db`] for the Postgres-backed store).

pub mod catalog;
pub mod compatibility;
pub mod config;
pub mod db;
pub mod deficiency;
pub mod engine;
pub mod goals;
pub mod guidance;
pub mod intake;
pub mod models;
pub mod recommend;
pub mod report;
pub mod targets;
pub mod trends;

pub use catalog::{CatalogError, FoodCatalog, FoodFilter};
pub use compatibility::compatibility_score;
pub use deficiency::analyze_deficiencies;
pub use engine::NutritionEngine;
pub use recommend::recommend_meals;
pub use trends::predict_health_trends;
