use chrono::NaiveDate;

use crate::deficiency;
use crate::models::{
    FoodCatalogItem, HealthPrediction, HealthSample, MealRecommendation, MealRecord,
    NutrientDeficiency, UserProfile,
};
use crate::recommend;
use crate::trends;

pub const DEFAULT_DEFICIENCY_LOOKBACK_DAYS: u32 = 7;
pub const DEFAULT_TREND_LOOKBACK_DAYS: u32 = 30;

/// Borrowed snapshot of one user's data.
///
/// Holds no state of its own; every call is a pure function of the snapshot
/// and the `today` passed in, so the same inputs always give the same output.
#[derive(Debug, Clone, Copy)]
pub struct NutritionEngine<'a> {
    profile: Option<&'a UserProfile>,
    meals: &'a [MealRecord],
    health: &'a [HealthSample],
    catalog: &'a [FoodCatalogItem],
}

impl<'a> NutritionEngine<'a> {
    pub fn new(
        profile: Option<&'a UserProfile>,
        meals: &'a [MealRecord],
        health: &'a [HealthSample],
        catalog: &'a [FoodCatalogItem],
    ) -> Self {
        Self {
            profile,
            meals,
            health,
            catalog,
        }
    }

    pub fn analyze_deficiencies(&self, lookback_days: u32, today: NaiveDate) -> Vec<NutrientDeficiency> {
        deficiency::analyze_deficiencies(self.meals, self.profile, lookback_days, today)
    }

    pub fn recommend_meals(&self, deficiencies: &[NutrientDeficiency]) -> Vec<MealRecommendation<'a>> {
        recommend::recommend_meals(deficiencies, self.catalog, self.profile)
    }

    pub fn predict_health_trends(&self, lookback_days: u32, today: NaiveDate) -> Vec<HealthPrediction> {
        trends::predict_health_trends(self.health, self.meals, self.profile, lookback_days, today)
    }
}
