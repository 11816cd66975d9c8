use serde::Serialize;

use crate::models::{Nutrient, Sex, UserProfile};

/// Reference daily energy need used when no profile is available.
pub const DEFAULT_DAILY_CALORIES: f64 = 2000.0;

/// Recommended daily intake for each tracked nutrient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NutrientTargets {
    pub protein: f64,
    pub fiber: f64,
    pub iron: f64,
    pub calcium: f64,
    pub vitamin_c: f64,
}

impl NutrientTargets {
    pub fn amount(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Protein => self.protein,
            Nutrient::Fiber => self.fiber,
            Nutrient::Iron => self.iron,
            Nutrient::Calcium => self.calcium,
            Nutrient::VitaminC => self.vitamin_c,
        }
    }
}

impl Default for NutrientTargets {
    fn default() -> Self {
        Self {
            protein: 150.0,
            fiber: 25.0,
            iron: 18.0,
            calcium: 1000.0,
            vitamin_c: 90.0,
        }
    }
}

/// Revised Harris-Benedict basal metabolic rate, kcal/day.
pub fn harris_benedict_bmr(profile: &UserProfile) -> f64 {
    let age = f64::from(profile.age);
    match profile.sex {
        Sex::Male => 88.362 + 13.397 * profile.weight_kg + 4.799 * profile.height_cm - 5.677 * age,
        Sex::Female => {
            447.593 + 9.247 * profile.weight_kg + 3.098 * profile.height_cm - 4.330 * age
        }
    }
}

/// BMR scaled by the profile's own activity tier.
pub fn tdee(profile: &UserProfile) -> f64 {
    harris_benedict_bmr(profile) * profile.activity_level.multiplier()
}

pub fn recommended_intake(profile: Option<&UserProfile>) -> NutrientTargets {
    let Some(profile) = profile else {
        return NutrientTargets::default();
    };

    NutrientTargets {
        protein: profile.weight_kg.max(0.0) * 1.6,
        fiber: 25.0,
        iron: match profile.sex {
            Sex::Female => 18.0,
            Sex::Male => 8.0,
        },
        calcium: if profile.age > 50 { 1200.0 } else { 1000.0 },
        vitamin_c: match profile.sex {
            Sex::Male => 90.0,
            Sex::Female => 75.0,
        },
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::ActivityLevel;

    pub(crate) fn profile(sex: Sex, age: u32, weight_kg: f64, height_cm: f64) -> UserProfile {
        UserProfile {
            age,
            sex,
            weight_kg,
            height_cm,
            activity_level: ActivityLevel::Moderate,
            health_conditions: Vec::new(),
            preferences: Vec::new(),
            allergies: Vec::new(),
        }
    }

    #[test]
    fn male_bmr_matches_formula() {
        let bmr = harris_benedict_bmr(&profile(Sex::Male, 30, 70.0, 175.0));
        assert!((bmr - 1695.667).abs() < 1e-6);
    }

    #[test]
    fn female_bmr_matches_formula() {
        let bmr = harris_benedict_bmr(&profile(Sex::Female, 40, 60.0, 165.0));
        let expected = 447.593 + 9.247 * 60.0 + 3.098 * 165.0 - 4.330 * 40.0;
        assert!((bmr - expected).abs() < 1e-9);
    }

    #[test]
    fn targets_follow_sex_and_age() {
        let male = recommended_intake(Some(&profile(Sex::Male, 30, 70.0, 175.0)));
        assert!((male.protein - 112.0).abs() < 1e-9);
        assert_eq!(male.iron, 8.0);
        assert_eq!(male.vitamin_c, 90.0);
        assert_eq!(male.calcium, 1000.0);

        let female = recommended_intake(Some(&profile(Sex::Female, 55, 60.0, 165.0)));
        assert_eq!(female.iron, 18.0);
        assert_eq!(female.vitamin_c, 75.0);
        assert_eq!(female.calcium, 1200.0);
        assert_eq!(female.fiber, 25.0);
    }

    #[test]
    fn missing_profile_uses_defaults() {
        assert_eq!(recommended_intake(None), NutrientTargets::default());
        assert_eq!(NutrientTargets::default().amount(Nutrient::Protein), 150.0);
    }

    #[test]
    fn tdee_uses_activity_multiplier() {
        let mut user = profile(Sex::Male, 30, 70.0, 175.0);
        user.activity_level = ActivityLevel::Sedentary;
        assert!((tdee(&user) - harris_benedict_bmr(&user) * 1.2).abs() < 1e-9);
    }
}
