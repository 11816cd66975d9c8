use chrono::NaiveDate;

use crate::guidance;
use crate::intake::{self, safe_amount, IntakeSummary};
use crate::models::{MealRecord, Nutrient, NutrientDeficiency, Severity, UserProfile};
use crate::targets::{self, NutrientTargets};

/// Intake at or above this share of the target is not a deficiency.
pub const ADEQUATE_RATIO: f64 = 0.8;

pub fn classify_severity(current: f64, recommended: f64) -> Option<Severity> {
    let current = safe_amount(current);
    let recommended = safe_amount(recommended).max(1.0);
    let ratio = current / recommended;
    if ratio >= ADEQUATE_RATIO {
        return None;
    }

    Some(if ratio < 0.5 {
        Severity::Severe
    } else if ratio < 0.7 {
        Severity::Moderate
    } else {
        Severity::Mild
    })
}

/// Deficiencies ordered most severe first; equal severities keep tracking order.
pub fn find_deficiencies(
    intake: &IntakeSummary,
    targets: &NutrientTargets,
) -> Vec<NutrientDeficiency> {
    let mut deficiencies: Vec<NutrientDeficiency> = Nutrient::TRACKED
        .iter()
        .filter_map(|&nutrient| {
            let current = intake.amount(nutrient);
            let recommended = targets.amount(nutrient);
            classify_severity(current, recommended).map(|severity| NutrientDeficiency {
                nutrient,
                current_intake: current,
                recommended_intake: recommended,
                severity,
                health_impact: guidance::health_impact(nutrient, severity),
                recommendations: guidance::nutrient_suggestions(nutrient).to_vec(),
            })
        })
        .collect();

    deficiencies.sort_by(|a, b| b.severity.rank().cmp(&a.severity.rank()));
    deficiencies
}

/// An empty window reads as zero intake and therefore flags every tracked
/// nutrient as severe. Callers can tell this apart via `IntakeSummary::is_empty`.
pub fn analyze_deficiencies(
    meals: &[MealRecord],
    profile: Option<&UserProfile>,
    lookback_days: u32,
    today: NaiveDate,
) -> Vec<NutrientDeficiency> {
    let intake = intake::average_intake(meals, lookback_days, today);
    if intake.is_empty() {
        tracing::warn!(lookback_days, %today, "no meals logged in window, intake treated as zero");
    }

    let targets = targets::recommended_intake(profile);
    let deficiencies = find_deficiencies(&intake, &targets);
    tracing::debug!(count = deficiencies.len(), "deficiency analysis complete");
    deficiencies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::tests::{meal, today};

    #[test]
    fn severity_tiers_follow_ratio_bounds() {
        assert_eq!(classify_severity(49.0, 100.0), Some(Severity::Severe));
        assert_eq!(classify_severity(50.0, 100.0), Some(Severity::Moderate));
        assert_eq!(classify_severity(69.9, 100.0), Some(Severity::Moderate));
        assert_eq!(classify_severity(70.0, 100.0), Some(Severity::Mild));
        assert_eq!(classify_severity(79.9, 100.0), Some(Severity::Mild));
        assert_eq!(classify_severity(80.0, 100.0), None);
        assert_eq!(classify_severity(f64::NAN, 100.0), Some(Severity::Severe));
    }

    #[test]
    fn sub_unit_targets_are_floored_for_both_checks() {
        assert_eq!(classify_severity(0.75, 0.5), Some(Severity::Mild));
        assert_eq!(classify_severity(0.8, 0.5), None);
        assert_eq!(classify_severity(0.3, 0.0), Some(Severity::Severe));
    }

    #[test]
    fn list_is_sorted_by_severity() {
        let intake = IntakeSummary {
            meal_count: 3,
            estimated_days: 1,
            protein: 80.0,
            ..IntakeSummary::default()
        };
        let deficiencies = find_deficiencies(&intake, &NutrientTargets::default());
        let ranks: Vec<u8> = deficiencies.iter().map(|d| d.severity.rank()).collect();
        assert!(ranks.windows(2).all(|pair| pair[0] >= pair[1]));
        assert_eq!(deficiencies.last().map(|d| d.nutrient), Some(Nutrient::Protein));
        assert_eq!(deficiencies.last().map(|d| d.severity), Some(Severity::Moderate));
    }

    #[test]
    fn equal_severities_keep_tracking_order() {
        let deficiencies = find_deficiencies(&IntakeSummary::default(), &NutrientTargets::default());
        let order: Vec<Nutrient> = deficiencies.iter().map(|d| d.nutrient).collect();
        assert_eq!(order, Nutrient::TRACKED.to_vec());
    }

    #[test]
    fn adequate_protein_is_not_reported() {
        let meals = vec![meal(0, 600.0, 60.0), meal(0, 600.0, 60.0), meal(0, 600.0, 60.0)];
        let deficiencies = analyze_deficiencies(&meals, None, 7, today());
        assert!(deficiencies.iter().all(|d| d.nutrient != Nutrient::Protein));
        assert!(deficiencies
            .iter()
            .all(|d| d.current_intake < d.recommended_intake * ADEQUATE_RATIO));
    }

    #[test]
    fn deficiencies_carry_reference_text() {
        let deficiencies = analyze_deficiencies(&[], None, 7, today());
        let protein = &deficiencies[0];
        assert_eq!(protein.nutrient, Nutrient::Protein);
        assert_eq!(
            protein.health_impact,
            guidance::health_impact(Nutrient::Protein, Severity::Severe)
        );
        assert_eq!(protein.recommendations.len(), 3);
    }
}
