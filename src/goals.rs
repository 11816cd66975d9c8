use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::intake::safe_amount;
use crate::models::{MealRecord, Sex, UserProfile, WaterEntry};

const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
const KCAL_PER_GRAM_CARBS: f64 = 4.0;
const KCAL_PER_GRAM_FAT: f64 = 9.0;
const FAT_SHARE_OF_CALORIES: f64 = 0.25;
const AUTO_WATER_GOAL_ML: f64 = 2500.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyGoals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub water_ml: f64,
}

impl Default for DailyGoals {
    fn default() -> Self {
        Self {
            calories: 2000.0,
            protein: 150.0,
            carbs: 250.0,
            fat: 65.0,
            water_ml: 2000.0,
        }
    }
}

pub fn mifflin_st_jeor_bmr(profile: &UserProfile) -> f64 {
    let base = 10.0 * profile.weight_kg + 6.25 * profile.height_cm - 5.0 * f64::from(profile.age);
    match profile.sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

/// Goals derived from the profile: TDEE calories, 1.6 g/kg protein, a quarter
/// of calories from fat and the remainder from carbohydrates.
pub fn auto_goals(profile: &UserProfile) -> Option<DailyGoals> {
    if profile.weight_kg <= 0.0 || profile.height_cm <= 0.0 || profile.age == 0 {
        return None;
    }

    let calories = (mifflin_st_jeor_bmr(profile) * profile.activity_level.multiplier()).round();
    let protein = (profile.weight_kg * 1.6).round();
    let fat = (calories * FAT_SHARE_OF_CALORIES / KCAL_PER_GRAM_FAT).round();
    let carbs = ((calories - protein * KCAL_PER_GRAM_PROTEIN - fat * KCAL_PER_GRAM_FAT)
        / KCAL_PER_GRAM_CARBS)
        .round()
        .max(0.0);

    Some(DailyGoals {
        calories,
        protein,
        carbs,
        fat,
        water_ml: AUTO_WATER_GOAL_ML,
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DayTotals {
    pub date: Option<NaiveDate>,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl DayTotals {
    fn add(&mut self, meal: &MealRecord) {
        self.calories += safe_amount(meal.calories);
        self.protein += safe_amount(meal.protein);
        self.carbs += safe_amount(meal.carbs);
        self.fat += safe_amount(meal.fat);
    }
}

pub fn day_totals(meals: &[MealRecord], day: NaiveDate) -> DayTotals {
    let mut totals = DayTotals {
        date: Some(day),
        ..DayTotals::default()
    };
    for meal in meals.iter().filter(|meal| meal.day() == Some(day)) {
        totals.add(meal);
    }
    totals
}

/// Progress fractions are capped at 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyProgress {
    pub totals: DayTotals,
    pub water_ml: f64,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub water: f64,
    pub calories_remaining: f64,
}

fn fraction(amount: f64, goal: f64) -> f64 {
    (amount / goal.max(1.0)).min(1.0)
}

pub fn daily_progress(
    meals: &[MealRecord],
    water: &[WaterEntry],
    goals: &DailyGoals,
    day: NaiveDate,
) -> DailyProgress {
    let totals = day_totals(meals, day);
    let water_ml: f64 = water
        .iter()
        .filter(|entry| entry.date == day)
        .map(|entry| safe_amount(entry.amount_ml))
        .sum();

    DailyProgress {
        totals,
        water_ml,
        calories: fraction(totals.calories, goals.calories),
        protein: fraction(totals.protein, goals.protein),
        carbs: fraction(totals.carbs, goals.carbs),
        fat: fraction(totals.fat, goals.fat),
        water: fraction(water_ml, goals.water_ml),
        calories_remaining: (goals.calories - totals.calories).max(0.0),
    }
}

/// Whole-percent share of calories from each macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MacroDistribution {
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
}

pub fn macro_distribution(meals: &[MealRecord], day: NaiveDate) -> MacroDistribution {
    let totals = day_totals(meals, day);
    let protein = totals.protein * KCAL_PER_GRAM_PROTEIN;
    let carbs = totals.carbs * KCAL_PER_GRAM_CARBS;
    let fat = totals.fat * KCAL_PER_GRAM_FAT;
    let total = protein + carbs + fat;

    if total <= 0.0 {
        return MacroDistribution {
            protein: 33,
            carbs: 34,
            fat: 33,
        };
    }

    let percent = |kcal: f64| (kcal / total * 100.0).round() as u32;
    MacroDistribution {
        protein: percent(protein),
        carbs: percent(carbs),
        fat: percent(fat),
    }
}

/// One row per day for the last `days` days, oldest first.
pub fn daily_series(meals: &[MealRecord], days: u32, today: NaiveDate) -> Vec<DayTotals> {
    (0..i64::from(days))
        .rev()
        .map(|offset| day_totals(meals, today - Duration::days(offset)))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeeklySummary {
    pub total_calories: f64,
    pub average_calories: f64,
    pub total_protein: f64,
    pub meal_count: usize,
}

pub fn weekly_summary(meals: &[MealRecord], today: NaiveDate) -> WeeklySummary {
    let series = daily_series(meals, 7, today);
    let total_calories: f64 = series.iter().map(|day| day.calories).sum();
    let total_protein: f64 = series.iter().map(|day| day.protein).sum();
    let start = today - Duration::days(6);
    let meal_count = meals
        .iter()
        .filter_map(MealRecord::day)
        .filter(|day| *day >= start && *day <= today)
        .count();

    WeeklySummary {
        total_calories,
        average_calories: (total_calories / 7.0).round(),
        total_protein,
        meal_count,
    }
}
