use crate::intake::safe_amount;
use crate::models::{DietaryPreference, FoodCatalogItem, FoodCategory, HealthCondition, UserProfile};

pub const MIN_COMPATIBILITY: f64 = 0.1;
pub const MAX_COMPATIBILITY: f64 = 2.0;

/// How well a food fits the user's conditions and preferences, clamped to
/// `[MIN_COMPATIBILITY, MAX_COMPATIBILITY]`. Without a profile every food scores 1.0.
pub fn compatibility_score(food: &FoodCatalogItem, profile: Option<&UserProfile>) -> f64 {
    let Some(profile) = profile else {
        return 1.0;
    };

    let mut score = 1.0;

    if profile.has_condition(&HealthCondition::Diabetes) {
        let carbs = safe_amount(food.carbs);
        if carbs < 20.0 {
            score *= 1.3;
        }
        if carbs > 50.0 {
            score *= 0.7;
        }
    }

    if profile.has_condition(&HealthCondition::Hypertension)
        && food.sodium.map(safe_amount).unwrap_or(0.0) > 500.0
    {
        score *= 0.6;
    }

    if profile.prefers(&DietaryPreference::Vegetarian) {
        match food.category {
            FoodCategory::Meat => score *= 0.1,
            FoodCategory::Vegetables => score *= 1.5,
            _ => {}
        }
    }

    f64::clamp(score, MIN_COMPATIBILITY, MAX_COMPATIBILITY)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{Difficulty, Sex};
    use crate::targets::tests::profile;

    pub(crate) fn food(id: &str, category: FoodCategory) -> FoodCatalogItem {
        FoodCatalogItem {
            id: id.to_string(),
            name: id.to_string(),
            calories: 300.0,
            protein: 10.0,
            carbs: 30.0,
            fat: 8.0,
            fiber: None,
            sugar: None,
            sodium: None,
            calcium: None,
            iron: None,
            vitamin_c: None,
            category,
            portion: "1 bowl".to_string(),
            description: None,
            tags: Vec::new(),
            region: None,
            ingredients: Vec::new(),
            is_popular: false,
            difficulty: Some(Difficulty::Medium),
            prep_time_minutes: None,
        }
    }

    #[test]
    fn no_profile_is_neutral() {
        assert_eq!(compatibility_score(&food("x", FoodCategory::Meat), None), 1.0);
    }

    #[test]
    fn diabetes_rewards_low_carb_and_penalizes_high_carb() {
        let mut user = profile(Sex::Female, 45, 62.0, 160.0);
        user.health_conditions.push(HealthCondition::Diabetes);

        let mut low = food("low", FoodCategory::Vegetables);
        low.carbs = 12.0;
        let mut high = food("high", FoodCategory::Rice);
        high.carbs = 58.0;

        assert!((compatibility_score(&low, Some(&user)) - 1.3).abs() < 1e-9);
        assert!((compatibility_score(&high, Some(&user)) - 0.7).abs() < 1e-9);
        assert_eq!(compatibility_score(&food("mid", FoodCategory::Rice), Some(&user)), 1.0);
    }

    #[test]
    fn hypertension_penalizes_salty_food() {
        let mut user = profile(Sex::Male, 60, 80.0, 170.0);
        user.health_conditions.push(HealthCondition::Hypertension);
        let mut salty = food("pho", FoodCategory::Noodles);
        salty.sodium = Some(1200.0);
        assert!((compatibility_score(&salty, Some(&user)) - 0.6).abs() < 1e-9);
    }

    #[test]
    fn vegetarian_adjusts_by_category() {
        let mut user = profile(Sex::Female, 28, 55.0, 158.0);
        user.preferences.push(DietaryPreference::Vegetarian);
        assert!((compatibility_score(&food("m", FoodCategory::Meat), Some(&user)) - 0.1).abs() < 1e-9);
        assert!(
            (compatibility_score(&food("v", FoodCategory::Vegetables), Some(&user)) - 1.5).abs()
                < 1e-9
        );
    }

    #[test]
    fn score_is_clamped() {
        let mut user = profile(Sex::Female, 50, 70.0, 160.0);
        user.health_conditions = vec![HealthCondition::Diabetes, HealthCondition::Hypertension];
        user.preferences.push(DietaryPreference::Vegetarian);

        let mut greens = food("greens", FoodCategory::Vegetables);
        greens.carbs = 5.0;
        assert!((compatibility_score(&greens, Some(&user)) - 1.95).abs() < 1e-9);

        let mut meat = food("meat", FoodCategory::Meat);
        meat.carbs = 60.0;
        meat.sodium = Some(900.0);
        assert_eq!(compatibility_score(&meat, Some(&user)), MIN_COMPATIBILITY);
    }
}
