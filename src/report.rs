use std::fmt::Write;

use chrono::NaiveDate;

use crate::goals::{DailyProgress, MacroDistribution, WeeklySummary};
use crate::models::{HealthPrediction, MealRecommendation, NutrientDeficiency};

pub struct ReportInput<'a> {
    pub subject: &'a str,
    pub today: NaiveDate,
    pub lookback_days: u32,
    pub has_meals: bool,
    pub deficiencies: &'a [NutrientDeficiency],
    pub recommendations: &'a [MealRecommendation<'a>],
    pub predictions: &'a [HealthPrediction],
    pub progress: &'a DailyProgress,
    pub macros: &'a MacroDistribution,
    pub weekly: &'a WeeklySummary,
}

fn percent(fraction: f64) -> f64 {
    (fraction * 100.0).round()
}

pub fn build_report(input: &ReportInput<'_>) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Nutrition Report");
    let _ = writeln!(
        output,
        "Generated for {} on {} (last {} days)",
        input.subject, input.today, input.lookback_days
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Today");
    let progress = input.progress;
    let _ = writeln!(
        output,
        "- Calories: {:.0} kcal ({}% of goal, {:.0} remaining)",
        progress.totals.calories,
        percent(progress.calories),
        progress.calories_remaining
    );
    let _ = writeln!(
        output,
        "- Protein {}%, carbs {}%, fat {}%, water {}% of goal",
        percent(progress.protein),
        percent(progress.carbs),
        percent(progress.fat),
        percent(progress.water)
    );
    let _ = writeln!(
        output,
        "- Calorie split: protein {}%, carbs {}%, fat {}%",
        input.macros.protein, input.macros.carbs, input.macros.fat
    );
    let _ = writeln!(
        output,
        "- This week: {} meals, {:.0} kcal total, {:.0} kcal/day average",
        input.weekly.meal_count, input.weekly.total_calories, input.weekly.average_calories
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Nutrient Gaps");

    if !input.has_meals {
        let _ = writeln!(
            output,
            "_No meals logged in this window; gaps below assume zero intake._"
        );
    }

    if input.deficiencies.is_empty() {
        let _ = writeln!(output, "No nutrient gaps detected.");
    } else {
        for deficiency in input.deficiencies {
            let _ = writeln!(
                output,
                "- {} ({}): {:.1} of {:.1} {} per day. {}",
                deficiency.nutrient,
                deficiency.severity.as_str(),
                deficiency.current_intake,
                deficiency.recommended_intake,
                deficiency.nutrient.unit(),
                deficiency.health_impact
            );
            for suggestion in &deficiency.recommendations {
                let _ = writeln!(output, "  - {suggestion}");
            }
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Suggested Foods");

    if input.recommendations.is_empty() {
        let _ = writeln!(output, "No catalog foods address the current gaps.");
    } else {
        for recommendation in input.recommendations {
            let _ = writeln!(
                output,
                "- {} (priority {}, fit {:.2}): {}",
                recommendation.food.name,
                recommendation.priority,
                recommendation.compatibility_score,
                recommendation.reason
            );
            if !recommendation.nutritional_benefit.is_empty() {
                let _ = writeln!(output, "  - {}", recommendation.nutritional_benefit);
            }
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Outlook");

    if input.predictions.is_empty() {
        let _ = writeln!(output, "Not enough history for a forecast.");
    } else {
        for prediction in input.predictions {
            let _ = writeln!(
                output,
                "- {}: {} over {}, projected {} (confidence {:.0}%)",
                prediction.metric.display_name(),
                prediction.trend.as_str(),
                prediction.timeframe,
                prediction.predicted_value,
                prediction.confidence * 100.0
            );
            for suggestion in &prediction.recommendations {
                let _ = writeln!(output, "  - {suggestion}");
            }
        }
    }

    output
}
