//! Static reference text attached to analysis results.
//!
//! Content is keyed by (nutrient, severity) or (trend metric, direction) so
//! that scoring code never carries prose.

use crate::models::{Nutrient, Severity, TrendDirection, TrendMetric};

pub const BALANCED_REASON: &str = "Balanced everyday dish";
pub const BALANCED_BENEFIT: &str = "Provides well-rounded nutrition for the whole body";
pub const POPULAR_REASON: &str = "Popular dish";
pub const EASY_REASON: &str = "Easy to prepare";

pub fn health_impact(nutrient: Nutrient, severity: Severity) -> &'static str {
    match (nutrient, severity) {
        (Nutrient::Protein, Severity::Mild) => "May slow muscle recovery",
        (Nutrient::Protein, Severity::Moderate) => "Reduced ability to build and maintain muscle",
        (Nutrient::Protein, Severity::Severe) => "Risk of protein malnutrition and muscle loss",
        (Nutrient::Fiber, Severity::Mild) => "May cause mild indigestion",
        (Nutrient::Fiber, Severity::Moderate) => "Risk of constipation and digestive upset",
        (Nutrient::Fiber, Severity::Severe) => {
            "Raised risk of cardiovascular disease and diabetes"
        }
        (Nutrient::Iron, Severity::Mild) => "May cause mild fatigue",
        (Nutrient::Iron, Severity::Moderate) => "Risk of mild anaemia",
        (Nutrient::Iron, Severity::Severe) => "Iron-deficiency anaemia and impaired cognition",
        (Nutrient::Calcium, Severity::Mild) => "May affect long-term bone density",
        (Nutrient::Calcium, Severity::Moderate) => "Increased risk of weakened bones and cramps",
        (Nutrient::Calcium, Severity::Severe) => "Risk of osteopenia and osteoporosis",
        (Nutrient::VitaminC, Severity::Mild) => "May lower immune resilience",
        (Nutrient::VitaminC, Severity::Moderate) => "Slower wound healing and frequent colds",
        (Nutrient::VitaminC, Severity::Severe) => "Risk of scurvy symptoms and poor iron uptake",
    }
}

pub fn nutrient_suggestions(nutrient: Nutrient) -> &'static [&'static str] {
    match nutrient {
        Nutrient::Protein => &[
            "Add lean meat, fish and eggs",
            "Include more tofu and beans in meals",
            "Add milk and dairy products",
        ],
        Nutrient::Fiber => &[
            "Eat plenty of leafy greens and fruit",
            "Choose whole grains",
            "Add legumes to your portions",
        ],
        Nutrient::Iron => &[
            "Eat red meat, liver and shellfish",
            "Pair with vitamin C to improve absorption",
            "Avoid tea or coffee with meals",
        ],
        Nutrient::Calcium => &[
            "Add milk, yoghurt or fortified soy milk",
            "Eat small fish with edible bones",
            "Include dark leafy greens",
        ],
        Nutrient::VitaminC => &[
            "Eat citrus fruit, guava or papaya",
            "Add raw or lightly cooked vegetables",
        ],
    }
}

pub fn trend_suggestions(metric: TrendMetric, direction: TrendDirection) -> [&'static str; 2] {
    match (metric, direction) {
        (TrendMetric::Weight, TrendDirection::Improving) => [
            "Keep the current diet",
            "Add exercise to keep weight gain in check",
        ],
        (TrendMetric::Weight, TrendDirection::Declining) => [
            "Increase calorie intake",
            "Focus on protein and complex carbohydrates",
        ],
        (TrendMetric::Weight, TrendDirection::Stable) => {
            ["Keep a balanced diet", "Keep monitoring regularly"]
        }
        (TrendMetric::NutritionBalance, TrendDirection::Improving) => [
            "Reduce portion sizes",
            "Eat more greens and fewer carbohydrates",
        ],
        (TrendMetric::NutritionBalance, TrendDirection::Declining) => [
            "Increase nutritious portions",
            "Add protein and healthy fats",
        ],
        (TrendMetric::NutritionBalance, TrendDirection::Stable) => [
            "Keep the current diet",
            "Food groups are well balanced",
        ],
        (TrendMetric::Energy, TrendDirection::Improving) => [
            "Keep an eye on portion sizes",
            "Prefer nutrient-dense, lower-calorie foods",
        ],
        (TrendMetric::Energy, TrendDirection::Declining) => [
            "Increase daily calorie intake",
            "Eat several small meals through the day",
        ],
        (TrendMetric::Energy, TrendDirection::Stable) => [
            "Keep the current calorie level",
            "Spread meals evenly across the day",
        ],
    }
}
