use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::models::{MealRecord, Nutrient};

/// Assumed number of logged meals per day when estimating day count.
pub const MEALS_PER_DAY: usize = 3;

/// Per-day averages over a lookback window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct IntakeSummary {
    pub meal_count: usize,
    pub estimated_days: usize,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl IntakeSummary {
    /// True when no meal fell inside the window.
    pub fn is_empty(&self) -> bool {
        self.meal_count == 0
    }

    /// Average daily amount of a tracked nutrient. Meal records only carry
    /// macros, so micronutrients always read as zero.
    pub fn amount(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Protein => self.protein,
            Nutrient::Fiber | Nutrient::Iron | Nutrient::Calcium | Nutrient::VitaminC => 0.0,
        }
    }
}

/// Floors non-finite and negative values at zero.
pub fn safe_amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

pub fn window_start(today: NaiveDate, lookback_days: u32) -> NaiveDate {
    today - Duration::days(i64::from(lookback_days))
}

/// Meals dated within `[today - lookback_days, today]`, inclusive.
pub fn meals_in_window(
    meals: &[MealRecord],
    lookback_days: u32,
    today: NaiveDate,
) -> Vec<&MealRecord> {
    let start = window_start(today, lookback_days);
    meals
        .iter()
        .filter(|meal| match meal.day() {
            Some(day) => day >= start && day <= today,
            None => {
                tracing::warn!(meal_id = %meal.id, date = %meal.date, "skipping meal with unreadable date");
                false
            }
        })
        .collect()
}

pub fn estimated_days(meal_count: usize) -> usize {
    meal_count.div_ceil(MEALS_PER_DAY).max(1)
}

pub fn average_intake(meals: &[MealRecord], lookback_days: u32, today: NaiveDate) -> IntakeSummary {
    let recent = meals_in_window(meals, lookback_days, today);
    if recent.is_empty() {
        tracing::debug!(lookback_days, %today, "no meals in window");
        return IntakeSummary::default();
    }

    let days = estimated_days(recent.len());
    let divisor = days as f64;
    let (calories, protein, carbs, fat) = recent.iter().fold(
        (0.0, 0.0, 0.0, 0.0),
        |(calories, protein, carbs, fat), meal| {
            (
                calories + safe_amount(meal.calories),
                protein + safe_amount(meal.protein),
                carbs + safe_amount(meal.carbs),
                fat + safe_amount(meal.fat),
            )
        },
    );

    tracing::debug!(meal_count = recent.len(), days, "aggregated intake");

    IntakeSummary {
        meal_count: recent.len(),
        estimated_days: days,
        calories: calories / divisor,
        protein: protein / divisor,
        carbs: carbs / divisor,
        fat: fat / divisor,
    }
}
