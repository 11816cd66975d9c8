use std::fmt;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

/// Ordered activity tiers, least to most active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    #[default]
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "sedentary" => Some(ActivityLevel::Sedentary),
            "light" => Some(ActivityLevel::Light),
            "moderate" => Some(ActivityLevel::Moderate),
            "active" => Some(ActivityLevel::Active),
            "very_active" => Some(ActivityLevel::VeryActive),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }
}

/// Health condition tag. Unknown tags are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HealthCondition {
    Diabetes,
    Hypertension,
    Other(String),
}

impl From<String> for HealthCondition {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "diabetes" => HealthCondition::Diabetes,
            "hypertension" => HealthCondition::Hypertension,
            _ => HealthCondition::Other(value),
        }
    }
}

impl From<HealthCondition> for String {
    fn from(value: HealthCondition) -> Self {
        match value {
            HealthCondition::Diabetes => "diabetes".to_string(),
            HealthCondition::Hypertension => "hypertension".to_string(),
            HealthCondition::Other(tag) => tag,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DietaryPreference {
    Vegetarian,
    Other(String),
}

impl From<String> for DietaryPreference {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "vegetarian" => DietaryPreference::Vegetarian,
            _ => DietaryPreference::Other(value),
        }
    }
}

impl From<DietaryPreference> for String {
    fn from(value: DietaryPreference) -> Self {
        match value {
            DietaryPreference::Vegetarian => "vegetarian".to_string(),
            DietaryPreference::Other(tag) => tag,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub age: u32,
    pub sex: Sex,
    pub weight_kg: f64,
    pub height_cm: f64,
    #[serde(default)]
    pub activity_level: ActivityLevel,
    #[serde(default)]
    pub health_conditions: Vec<HealthCondition>,
    #[serde(default)]
    pub preferences: Vec<DietaryPreference>,
    #[serde(default)]
    pub allergies: Vec<String>,
}

impl UserProfile {
    pub fn has_condition(&self, condition: &HealthCondition) -> bool {
        self.health_conditions.contains(condition)
    }

    pub fn prefers(&self, preference: &DietaryPreference) -> bool {
        self.preferences.contains(preference)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealRecord {
    pub id: String,
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub date: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl MealRecord {
    /// Calendar day the meal was logged on, if the date string is readable.
    pub fn day(&self) -> Option<NaiveDate> {
        parse_day(&self.date)
    }
}

/// Accepts `2026-10-16`, RFC 3339 timestamps, and `Fri Oct 16 2026`.
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(day) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(day);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.date_naive());
    }
    NaiveDate::parse_from_str(value, "%a %b %d %Y").ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BloodPressure {
    pub systolic: f64,
    pub diastolic: f64,
}

/// One day's measurements. `None` means not measured, never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSample {
    pub date: NaiveDate,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub blood_pressure: Option<BloodPressure>,
    #[serde(default)]
    pub blood_glucose: Option<f64>,
    #[serde(default)]
    pub exercise_minutes: Option<f64>,
    #[serde(default)]
    pub sleep_hours: Option<f64>,
    #[serde(default)]
    pub stress_level: Option<u8>,
    #[serde(default)]
    pub mood: Option<u8>,
}

impl HealthSample {
    pub fn on(date: NaiveDate) -> Self {
        Self {
            date,
            weight_kg: None,
            blood_pressure: None,
            blood_glucose: None,
            exercise_minutes: None,
            sleep_hours: None,
            stress_level: None,
            mood: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FoodCategory {
    Rice,
    Noodles,
    Meat,
    Vegetables,
    Fruit,
    Bakery,
    Drinks,
    Snacks,
    Other(String),
}

impl From<String> for FoodCategory {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "rice" => FoodCategory::Rice,
            "noodles" => FoodCategory::Noodles,
            "meat" => FoodCategory::Meat,
            "vegetables" => FoodCategory::Vegetables,
            "fruit" => FoodCategory::Fruit,
            "bakery" => FoodCategory::Bakery,
            "drinks" => FoodCategory::Drinks,
            "snacks" => FoodCategory::Snacks,
            _ => FoodCategory::Other(value),
        }
    }
}

impl From<FoodCategory> for String {
    fn from(value: FoodCategory) -> Self {
        value.to_string()
    }
}

impl fmt::Display for FoodCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FoodCategory::Rice => "rice",
            FoodCategory::Noodles => "noodles",
            FoodCategory::Meat => "meat",
            FoodCategory::Vegetables => "vegetables",
            FoodCategory::Fruit => "fruit",
            FoodCategory::Bakery => "bakery",
            FoodCategory::Drinks => "drinks",
            FoodCategory::Snacks => "snacks",
            FoodCategory::Other(tag) => tag,
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodCatalogItem {
    pub id: String,
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    #[serde(default)]
    pub fiber: Option<f64>,
    #[serde(default)]
    pub sugar: Option<f64>,
    #[serde(default)]
    pub sodium: Option<f64>,
    #[serde(default)]
    pub calcium: Option<f64>,
    #[serde(default)]
    pub iron: Option<f64>,
    #[serde(default)]
    pub vitamin_c: Option<f64>,
    pub category: FoodCategory,
    #[serde(default)]
    pub portion: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub is_popular: bool,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub prep_time_minutes: Option<u32>,
}

impl FoodCatalogItem {
    /// Amount of a tracked nutrient per portion; absent values count as zero.
    pub fn amount_of(&self, nutrient: Nutrient) -> f64 {
        let value = match nutrient {
            Nutrient::Protein => Some(self.protein),
            Nutrient::Fiber => self.fiber,
            Nutrient::Iron => self.iron,
            Nutrient::Calcium => self.calcium,
            Nutrient::VitaminC => self.vitamin_c,
        };
        crate::intake::safe_amount(value.unwrap_or(0.0))
    }

    pub fn is_easy(&self) -> bool {
        self.difficulty == Some(Difficulty::Easy)
    }
}

/// Nutrients checked for deficiency, in tracking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nutrient {
    Protein,
    Fiber,
    Iron,
    Calcium,
    VitaminC,
}

impl Nutrient {
    pub const TRACKED: [Nutrient; 5] = [
        Nutrient::Protein,
        Nutrient::Fiber,
        Nutrient::Iron,
        Nutrient::Calcium,
        Nutrient::VitaminC,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Nutrient::Protein => "Protein",
            Nutrient::Fiber => "Fiber",
            Nutrient::Iron => "Iron",
            Nutrient::Calcium => "Calcium",
            Nutrient::VitaminC => "Vitamin C",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Nutrient::Protein | Nutrient::Fiber => "g",
            Nutrient::Iron | Nutrient::Calcium | Nutrient::VitaminC => "mg",
        }
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    pub fn rank(self) -> u8 {
        match self {
            Severity::Severe => 3,
            Severity::Moderate => 2,
            Severity::Mild => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Mild => "mild",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientDeficiency {
    pub nutrient: Nutrient,
    pub current_intake: f64,
    pub recommended_intake: f64,
    pub severity: Severity,
    pub health_impact: &'static str,
    pub recommendations: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealRecommendation<'a> {
    pub food: &'a FoodCatalogItem,
    pub priority: i64,
    pub reason: String,
    pub nutritional_benefit: String,
    pub compatibility_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Improving,
    Stable,
    Declining,
}

impl TrendDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            TrendDirection::Improving => "improving",
            TrendDirection::Stable => "stable",
            TrendDirection::Declining => "declining",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendMetric {
    Weight,
    NutritionBalance,
    Energy,
}

impl TrendMetric {
    pub fn display_name(self) -> &'static str {
        match self {
            TrendMetric::Weight => "Weight",
            TrendMetric::NutritionBalance => "Nutrition balance",
            TrendMetric::Energy => "Energy level",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthPrediction {
    pub metric: TrendMetric,
    pub trend: TrendDirection,
    pub predicted_value: f64,
    pub timeframe: &'static str,
    pub confidence: f64,
    pub recommendations: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterEntry {
    pub date: NaiveDate,
    pub amount_ml: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_date_forms() {
        let expected = NaiveDate::from_ymd_opt(2026, 10, 16);
        assert_eq!(parse_day("2026-10-16"), expected);
        assert_eq!(parse_day("2026-10-16T08:30:00+07:00"), expected);
        assert_eq!(parse_day("Fri Oct 16 2026"), expected);
        assert_eq!(parse_day("yesterday"), None);
    }

    #[test]
    fn tags_map_to_known_variants_case_insensitively() {
        assert_eq!(
            HealthCondition::from("Diabetes".to_string()),
            HealthCondition::Diabetes
        );
        assert_eq!(
            HealthCondition::from("asthma".to_string()),
            HealthCondition::Other("asthma".to_string())
        );
        assert_eq!(
            DietaryPreference::from(" VEGETARIAN ".to_string()),
            DietaryPreference::Vegetarian
        );
        assert_eq!(FoodCategory::from("meat".to_string()), FoodCategory::Meat);
    }

    #[test]
    fn profile_deserializes_with_defaults() {
        let profile: UserProfile = serde_json::from_str(
            r#"{"age": 30, "sex": "male", "weight_kg": 70, "height_cm": 175,
                "health_conditions": ["hypertension"]}"#,
        )
        .unwrap();
        assert_eq!(profile.activity_level, ActivityLevel::Moderate);
        assert!(profile.has_condition(&HealthCondition::Hypertension));
        assert!(profile.preferences.is_empty());
    }

    #[test]
    fn activity_levels_are_ordered() {
        assert!(ActivityLevel::Sedentary < ActivityLevel::VeryActive);
        assert_eq!(ActivityLevel::parse("very-active"), Some(ActivityLevel::VeryActive));
        assert_eq!(ActivityLevel::Light.multiplier(), 1.375);
    }
}
