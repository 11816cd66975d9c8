use crate::compatibility::compatibility_score;
use crate::guidance;
use crate::models::{FoodCatalogItem, MealRecommendation, NutrientDeficiency, Severity, UserProfile};

pub const MAX_RECOMMENDATIONS: usize = 10;
pub const FALLBACK_COUNT: usize = 5;
pub const FALLBACK_PRIORITY: i64 = 75;

/// A food must cover more than this share of a daily target to count.
const MIN_CONTRIBUTION_PERCENT: f64 = 10.0;
const POPULAR_BOOST: f64 = 1.2;
const EASY_BOOST: f64 = 1.1;

pub fn severity_multiplier(severity: Severity) -> f64 {
    match severity {
        Severity::Severe => 3.0,
        Severity::Moderate => 2.0,
        Severity::Mild => 1.0,
    }
}

/// Ranks catalog foods by how well they cover the given deficiencies.
///
/// With no deficiencies the result is a fixed list of popular, easy dishes.
/// Otherwise at most [`MAX_RECOMMENDATIONS`] foods with a positive score are
/// returned, highest priority first; equal priorities keep catalog order.
pub fn recommend_meals<'a>(
    deficiencies: &[NutrientDeficiency],
    catalog: &'a [FoodCatalogItem],
    profile: Option<&UserProfile>,
) -> Vec<MealRecommendation<'a>> {
    if deficiencies.is_empty() {
        return balanced_fallback(catalog);
    }

    let mut recommendations: Vec<MealRecommendation<'a>> = catalog
        .iter()
        .filter_map(|food| score_food(food, deficiencies, profile))
        .collect();

    recommendations.sort_by(|a, b| b.priority.cmp(&a.priority));
    recommendations.truncate(MAX_RECOMMENDATIONS);

    tracing::debug!(
        catalog_size = catalog.len(),
        returned = recommendations.len(),
        "scored catalog against deficiencies"
    );
    recommendations
}

fn score_food<'a>(
    food: &'a FoodCatalogItem,
    deficiencies: &[NutrientDeficiency],
    profile: Option<&UserProfile>,
) -> Option<MealRecommendation<'a>> {
    let mut score = 0.0;
    let mut reasons: Vec<String> = Vec::new();
    let mut benefits: Vec<String> = Vec::new();

    for deficiency in deficiencies {
        let amount = food.amount_of(deficiency.nutrient);
        if amount <= 0.0 {
            continue;
        }

        let contribution = amount / deficiency.recommended_intake.max(1.0) * 100.0;
        if contribution > MIN_CONTRIBUTION_PERCENT {
            let name = deficiency.nutrient.display_name().to_lowercase();
            score += contribution * severity_multiplier(deficiency.severity);
            reasons.push(format!("Rich in {name}"));
            benefits.push(format!(
                "Provides {}% of daily {name} needs",
                contribution.round()
            ));
        }
    }

    if food.is_popular {
        score *= POPULAR_BOOST;
        reasons.push(guidance::POPULAR_REASON.to_string());
    }

    if food.is_easy() {
        score *= EASY_BOOST;
        reasons.push(guidance::EASY_REASON.to_string());
    }

    let compatibility = compatibility_score(food, profile);
    score *= compatibility;

    if score <= 0.0 {
        return None;
    }

    Some(MealRecommendation {
        food,
        priority: score.round() as i64,
        reason: reasons.join(", "),
        nutritional_benefit: benefits.join(". "),
        compatibility_score: compatibility,
    })
}

fn balanced_fallback(catalog: &[FoodCatalogItem]) -> Vec<MealRecommendation<'_>> {
    catalog
        .iter()
        .filter(|food| food.is_popular && food.is_easy())
        .take(FALLBACK_COUNT)
        .map(|food| MealRecommendation {
            food,
            priority: FALLBACK_PRIORITY,
            reason: guidance::BALANCED_REASON.to_string(),
            nutritional_benefit: guidance::BALANCED_BENEFIT.to_string(),
            compatibility_score: 1.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compatibility::tests::food;
    use crate::models::{DietaryPreference, Difficulty, FoodCategory, Nutrient, Sex};
    use crate::targets::tests::profile;

    fn deficiency(nutrient: Nutrient, recommended: f64, severity: Severity) -> NutrientDeficiency {
        NutrientDeficiency {
            nutrient,
            current_intake: 0.0,
            recommended_intake: recommended,
            severity,
            health_impact: guidance::health_impact(nutrient, severity),
            recommendations: Vec::new(),
        }
    }

    fn protein_food(id: &str, protein: f64) -> FoodCatalogItem {
        let mut item = food(id, FoodCategory::Meat);
        item.protein = protein;
        item
    }

    #[test]
    fn scores_contribution_by_severity() {
        let deficiencies = vec![deficiency(Nutrient::Protein, 150.0, Severity::Severe)];
        let catalog = vec![protein_food("chicken", 30.0)];
        let recommendations = recommend_meals(&deficiencies, &catalog, None);

        assert_eq!(recommendations.len(), 1);
        assert_eq!(recommendations[0].priority, 60);
        assert_eq!(recommendations[0].compatibility_score, 1.0);
        assert_eq!(recommendations[0].reason, "Rich in protein");
        assert_eq!(
            recommendations[0].nutritional_benefit,
            "Provides 20% of daily protein needs"
        );
    }

    #[test]
    fn small_contributions_are_ignored() {
        let deficiencies = vec![deficiency(Nutrient::Protein, 150.0, Severity::Severe)];
        let mut popular = protein_food("broth", 10.0);
        popular.is_popular = true;
        let recommendations = recommend_meals(&deficiencies, std::slice::from_ref(&popular), None);
        assert!(recommendations.is_empty());
    }

    #[test]
    fn popularity_and_ease_boost_score() {
        let deficiencies = vec![deficiency(Nutrient::Protein, 100.0, Severity::Mild)];
        let mut item = protein_food("eggs", 20.0);
        item.is_popular = true;
        item.difficulty = Some(Difficulty::Easy);
        let recommendations = recommend_meals(&deficiencies, std::slice::from_ref(&item), None);
        assert_eq!(recommendations[0].priority, (20.0_f64 * 1.2 * 1.1).round() as i64);
        assert_eq!(
            recommendations[0].reason,
            "Rich in protein, Popular dish, Easy to prepare"
        );
    }

    #[test]
    fn compatibility_scales_priority() {
        let deficiencies = vec![deficiency(Nutrient::Protein, 100.0, Severity::Severe)];
        let mut user = profile(Sex::Male, 30, 70.0, 175.0);
        user.preferences.push(DietaryPreference::Vegetarian);
        let catalog = vec![protein_food("beef", 40.0)];
        let recommendations = recommend_meals(&deficiencies, &catalog, Some(&user));
        assert_eq!(recommendations[0].priority, 12);
        assert!((recommendations[0].compatibility_score - 0.1).abs() < 1e-9);
    }

    #[test]
    fn returns_at_most_ten_ranked_with_stable_ties() {
        let deficiencies = vec![deficiency(Nutrient::Protein, 100.0, Severity::Moderate)];
        let catalog: Vec<FoodCatalogItem> = (0..14)
            .map(|i| protein_food(&format!("food-{i}"), if i % 2 == 0 { 30.0 } else { 20.0 }))
            .collect();
        let recommendations = recommend_meals(&deficiencies, &catalog, None);

        assert_eq!(recommendations.len(), MAX_RECOMMENDATIONS);
        let ids: Vec<&str> = recommendations.iter().map(|r| r.food.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "food-0", "food-2", "food-4", "food-6", "food-8", "food-10", "food-12", "food-1",
                "food-3", "food-5"
            ]
        );
        assert!(recommendations.iter().all(|r| r.priority > 0));
    }

    #[test]
    fn multiple_deficiencies_accumulate() {
        let deficiencies = vec![
            deficiency(Nutrient::Iron, 18.0, Severity::Severe),
            deficiency(Nutrient::Protein, 100.0, Severity::Mild),
        ];
        let mut liver = protein_food("liver", 20.0);
        liver.iron = Some(9.0);
        let recommendations = recommend_meals(&deficiencies, std::slice::from_ref(&liver), None);
        assert_eq!(recommendations[0].priority, 170);
        assert_eq!(recommendations[0].reason, "Rich in iron, Rich in protein");
    }

    #[test]
    fn empty_deficiencies_fall_back_to_popular_easy_dishes() {
        let catalog: Vec<FoodCatalogItem> = (0..8)
            .map(|i| {
                let mut item = food(&format!("dish-{i}"), FoodCategory::Rice);
                item.is_popular = i != 1;
                item.difficulty = Some(Difficulty::Easy);
                item
            })
            .collect();
        let recommendations = recommend_meals(&[], &catalog, None);

        assert_eq!(recommendations.len(), FALLBACK_COUNT);
        assert!(recommendations.iter().all(|r| r.priority == FALLBACK_PRIORITY));
        assert!(recommendations.iter().all(|r| r.food.id != "dish-1"));
        assert_eq!(recommendations[0].reason, guidance::BALANCED_REASON);
    }
}
