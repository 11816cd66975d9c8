use chrono::NaiveDate;

use crate::guidance;
use crate::intake::{self, safe_amount};
use crate::models::{
    HealthPrediction, HealthSample, MealRecord, TrendDirection, TrendMetric, UserProfile,
};
use crate::targets::{self, DEFAULT_DAILY_CALORIES};

pub const WEIGHT_MIN_SAMPLES: usize = 5;
pub const WEIGHT_MAX_SAMPLES: usize = 30;
pub const WEIGHT_HORIZON_DAYS: f64 = 30.0;
const WEIGHT_SLOPE_THRESHOLD: f64 = 0.1;
const WEIGHT_MAX_CONFIDENCE: f64 = 0.9;

pub const NUTRITION_WINDOW_DAYS: u32 = 14;
pub const NUTRITION_MIN_MEALS: usize = 10;
/// Fixed moderate-activity factor; the profile's own tier is not consulted.
const NUTRITION_ACTIVITY_FACTOR: f64 = 1.55;
const BALANCE_THRESHOLD: f64 = 200.0;

pub const ENERGY_WINDOW_DAYS: u32 = 7;
const ENERGY_HIGH_CALORIES: f64 = 2000.0;
const ENERGY_LOW_CALORIES: f64 = 1500.0;

/// Ordinary least squares slope of `values` against their 0-based index.
pub fn ols_slope(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let n = values.len() as f64;
    let sum_x: f64 = (0..values.len()).map(|i| i as f64).sum();
    let sum_y: f64 = values.iter().sum();
    let sum_xy: f64 = values.iter().enumerate().map(|(i, y)| i as f64 * y).sum();
    let sum_xx: f64 = (0..values.len()).map(|i| (i * i) as f64).sum();

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator.abs() < f64::EPSILON {
        return 0.0;
    }
    (n * sum_xy - sum_x * sum_y) / denominator
}

fn classify(value: f64, upper: f64, lower: f64) -> TrendDirection {
    if value > upper {
        TrendDirection::Improving
    } else if value < lower {
        TrendDirection::Declining
    } else {
        TrendDirection::Stable
    }
}

fn prediction(
    metric: TrendMetric,
    trend: TrendDirection,
    predicted_value: f64,
    timeframe: &'static str,
    confidence: f64,
) -> HealthPrediction {
    HealthPrediction {
        metric,
        trend,
        predicted_value,
        timeframe,
        confidence,
        recommendations: guidance::trend_suggestions(metric, trend).to_vec(),
    }
}

pub fn weight_trend(
    history: &[HealthSample],
    lookback_days: u32,
    today: NaiveDate,
) -> Option<HealthPrediction> {
    let start = intake::window_start(today, lookback_days);
    let mut weighted: Vec<(NaiveDate, f64)> = history
        .iter()
        .filter(|sample| sample.date >= start && sample.date <= today)
        .filter_map(|sample| {
            sample
                .weight_kg
                .map(safe_amount)
                .filter(|weight| *weight > 0.0)
                .map(|weight| (sample.date, weight))
        })
        .collect();
    weighted.sort_by_key(|(date, _)| *date);

    let recent = &weighted[weighted.len().saturating_sub(WEIGHT_MAX_SAMPLES)..];
    if recent.len() < WEIGHT_MIN_SAMPLES {
        tracing::debug!(samples = recent.len(), "not enough weight samples for a trend");
        return None;
    }

    let weights: Vec<f64> = recent.iter().map(|(_, weight)| *weight).collect();
    let slope = ols_slope(&weights);
    let last = weights[weights.len() - 1];
    let predicted = ((last + slope * WEIGHT_HORIZON_DAYS) * 10.0).round() / 10.0;
    let confidence = (recent.len() as f64 / WEIGHT_MAX_SAMPLES as f64).min(WEIGHT_MAX_CONFIDENCE);

    Some(prediction(
        TrendMetric::Weight,
        classify(slope, WEIGHT_SLOPE_THRESHOLD, -WEIGHT_SLOPE_THRESHOLD),
        predicted,
        "30 days",
        confidence,
    ))
}

/// Average daily calories over two weeks against `BMR x 1.55`.
pub fn nutrition_balance_trend(
    meals: &[MealRecord],
    profile: Option<&UserProfile>,
    today: NaiveDate,
) -> Option<HealthPrediction> {
    let recent = intake::meals_in_window(meals, NUTRITION_WINDOW_DAYS, today);
    if recent.len() < NUTRITION_MIN_MEALS {
        tracing::debug!(meals = recent.len(), "not enough meals for a balance trend");
        return None;
    }

    // Fractional day count (ten meals are 3.33 days, not 4); the gate keeps it above one.
    let total: f64 = recent.iter().map(|meal| safe_amount(meal.calories)).sum();
    let daily = total * intake::MEALS_PER_DAY as f64 / recent.len() as f64;
    let required = profile
        .map(|profile| targets::harris_benedict_bmr(profile) * NUTRITION_ACTIVITY_FACTOR)
        .unwrap_or(DEFAULT_DAILY_CALORIES);
    let balance = daily - required;

    Some(prediction(
        TrendMetric::NutritionBalance,
        classify(balance, BALANCE_THRESHOLD, -BALANCE_THRESHOLD),
        balance.round(),
        "14 days",
        0.8,
    ))
}

/// Always produced, even from an empty week.
pub fn energy_trend(meals: &[MealRecord], today: NaiveDate) -> HealthPrediction {
    let intake = intake::average_intake(meals, ENERGY_WINDOW_DAYS, today);
    prediction(
        TrendMetric::Energy,
        classify(intake.calories, ENERGY_HIGH_CALORIES, ENERGY_LOW_CALORIES),
        intake.calories.round(),
        "7 days",
        0.7,
    )
}

pub fn predict_health_trends(
    health: &[HealthSample],
    meals: &[MealRecord],
    profile: Option<&UserProfile>,
    lookback_days: u32,
    today: NaiveDate,
) -> Vec<HealthPrediction> {
    let mut predictions = Vec::with_capacity(3);
    predictions.extend(weight_trend(health, lookback_days, today));
    predictions.extend(nutrition_balance_trend(meals, profile, today));
    predictions.push(energy_trend(meals, today));
    tracing::debug!(count = predictions.len(), "trend prediction complete");
    predictions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::tests::{day, meal, today};
    use crate::models::Sex;
    use crate::targets::tests::profile;

    fn weighings(start: f64, step: f64, count: usize) -> Vec<HealthSample> {
        (0..count)
            .map(|i| {
                let mut sample = HealthSample::on(day((count - 1 - i) as i64));
                sample.weight_kg = Some(start + step * i as f64);
                sample
            })
            .collect()
    }

    #[test]
    fn slope_of_linear_series() {
        assert!((ols_slope(&[1.0, 3.0, 5.0, 7.0]) - 2.0).abs() < 1e-9);
        assert_eq!(ols_slope(&[4.0]), 0.0);
        assert!(ols_slope(&[5.0, 5.0, 5.0]).abs() < 1e-12);
    }

    #[test]
    fn rising_weight_projects_thirty_days_out() {
        let prediction = weight_trend(&weighings(70.0, 0.2, 6), 30, today()).unwrap();
        assert_eq!(prediction.trend, TrendDirection::Improving);
        assert!((prediction.predicted_value - 77.0).abs() < 1e-9);
        assert!((prediction.confidence - 0.2).abs() < 1e-9);
        assert_eq!(prediction.timeframe, "30 days");
        assert_eq!(prediction.recommendations.len(), 2);
    }

    #[test]
    fn weight_samples_are_ordered_by_date() {
        let mut samples = weighings(80.0, -0.5, 8);
        samples.reverse();
        let prediction = weight_trend(&samples, 30, today()).unwrap();
        assert_eq!(prediction.trend, TrendDirection::Declining);
        assert!((prediction.predicted_value - 61.5).abs() < 1e-9);
    }

    #[test]
    fn weight_needs_five_samples_in_window() {
        assert!(weight_trend(&weighings(70.0, 0.2, 4), 30, today()).is_none());

        let mut samples = weighings(70.0, 0.2, 5);
        samples[0].date = day(45);
        assert!(weight_trend(&samples, 30, today()).is_none());

        let mut unweighed = weighings(70.0, 0.2, 5);
        unweighed[2].weight_kg = None;
        assert!(weight_trend(&unweighed, 30, today()).is_none());
    }

    #[test]
    fn confidence_is_capped() {
        let prediction = weight_trend(&weighings(70.0, 0.0, 30), 60, today()).unwrap();
        assert_eq!(prediction.trend, TrendDirection::Stable);
        assert!((prediction.confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn balance_requires_ten_meals() {
        let meals: Vec<MealRecord> = (0..9).map(|i| meal(i, 700.0, 30.0)).collect();
        assert!(nutrition_balance_trend(&meals, None, today()).is_none());
    }

    #[test]
    fn balance_compares_against_moderate_tdee() {
        let user = profile(Sex::Male, 30, 70.0, 175.0);
        let meals: Vec<MealRecord> = (0..12).map(|i| meal(i / 3, 1000.0, 30.0)).collect();
        let prediction = nutrition_balance_trend(&meals, Some(&user), today()).unwrap();
        let expected = 3000.0 - targets::harris_benedict_bmr(&user) * 1.55;
        assert_eq!(prediction.predicted_value, expected.round());
        assert_eq!(prediction.trend, TrendDirection::Improving);
        assert_eq!(prediction.confidence, 0.8);
    }

    #[test]
    fn balance_uses_fractional_day_count() {
        let meals: Vec<MealRecord> = (0..10).map(|i| meal(i / 3, 600.0, 30.0)).collect();
        let prediction = nutrition_balance_trend(&meals, None, today()).unwrap();
        assert_eq!(prediction.predicted_value, -200.0);
        assert_eq!(prediction.trend, TrendDirection::Stable);
    }

    #[test]
    fn gates_open_at_their_minimums() {
        let weight = weight_trend(&weighings(70.0, 0.2, WEIGHT_MIN_SAMPLES), 30, today()).unwrap();
        assert_eq!(weight.metric, TrendMetric::Weight);
        assert!((weight.confidence - 5.0 / 30.0).abs() < 1e-9);

        let meals: Vec<MealRecord> = (0..NUTRITION_MIN_MEALS as i64)
            .map(|i| meal(i / 3, 700.0, 30.0))
            .collect();
        let balance = nutrition_balance_trend(&meals, None, today()).unwrap();
        assert_eq!(balance.metric, TrendMetric::NutritionBalance);
    }

    #[test]
    fn energy_is_reported_without_meals() {
        let prediction = energy_trend(&[], today());
        assert_eq!(prediction.trend, TrendDirection::Declining);
        assert_eq!(prediction.predicted_value, 0.0);
        assert_eq!(prediction.confidence, 0.7);
    }

    #[test]
    fn energy_bands() {
        let meals: Vec<MealRecord> = (0..3).map(|_| meal(0, 600.0, 30.0)).collect();
        assert_eq!(energy_trend(&meals, today()).trend, TrendDirection::Stable);
        let meals: Vec<MealRecord> = (0..3).map(|_| meal(0, 800.0, 30.0)).collect();
        assert_eq!(energy_trend(&meals, today()).trend, TrendDirection::Improving);
    }

    #[test]
    fn gates_control_which_predictions_appear() {
        let only_energy = predict_health_trends(&[], &[], None, 30, today());
        assert_eq!(only_energy.len(), 1);
        assert_eq!(only_energy[0].metric, TrendMetric::Energy);

        let meals: Vec<MealRecord> = (0..12).map(|i| meal(i / 3, 600.0, 30.0)).collect();
        let all = predict_health_trends(&weighings(70.0, 0.1, 6), &meals, None, 30, today());
        let metrics: Vec<TrendMetric> = all.iter().map(|p| p.metric).collect();
        assert_eq!(
            metrics,
            vec![TrendMetric::Weight, TrendMetric::NutritionBalance, TrendMetric::Energy]
        );
    }
}
