use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;

use crate::models::{Difficulty, FoodCatalogItem, FoodCategory};

const BUILTIN_CATALOG: &str = include_str!("../data/food_catalog.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate food id `{0}`")]
    DuplicateId(String),
    #[error("food `{id}` has an invalid {field} value")]
    InvalidValue { id: String, field: &'static str },
}

/// Criteria for [`FoodCatalog::filter`]; unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct FoodFilter {
    pub category: Option<FoodCategory>,
    pub max_calories: Option<f64>,
    pub min_protein: Option<f64>,
    pub region: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub popular: Option<bool>,
}

/// Read-only reference list of foods the recommender draws from.
#[derive(Debug, Clone)]
pub struct FoodCatalog {
    items: Vec<FoodCatalogItem>,
}

impl FoodCatalog {
    /// The catalog shipped with the application.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let items: Vec<FoodCatalogItem> = serde_json::from_str(raw)?;
        Self::new(items)
    }

    pub fn new(items: Vec<FoodCatalogItem>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for item in &items {
            if !seen.insert(item.id.as_str()) {
                return Err(CatalogError::DuplicateId(item.id.clone()));
            }
            validate(item)?;
        }
        tracing::debug!(items = items.len(), "food catalog loaded");
        Ok(Self { items })
    }

    pub fn items(&self) -> &[FoodCatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&FoodCatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn by_category(&self, category: &FoodCategory) -> Vec<&FoodCatalogItem> {
        self.items
            .iter()
            .filter(|item| &item.category == category)
            .collect()
    }

    pub fn popular(&self) -> Vec<&FoodCatalogItem> {
        self.items.iter().filter(|item| item.is_popular).collect()
    }

    /// Case-insensitive match on name, tags, description or ingredients.
    pub fn search(&self, query: &str) -> Vec<&FoodCatalogItem> {
        let needle = query.trim().to_lowercase();
        self.items
            .iter()
            .filter(|item| {
                item.name.to_lowercase().contains(&needle)
                    || item.tags.iter().any(|tag| tag.to_lowercase().contains(&needle))
                    || item
                        .description
                        .as_deref()
                        .is_some_and(|text| text.to_lowercase().contains(&needle))
                    || item
                        .ingredients
                        .iter()
                        .any(|ingredient| ingredient.to_lowercase().contains(&needle))
            })
            .collect()
    }

    pub fn filter(&self, criteria: &FoodFilter) -> Vec<&FoodCatalogItem> {
        self.items
            .iter()
            .filter(|item| {
                criteria.category.as_ref().map_or(true, |c| &item.category == c)
                    && criteria.max_calories.map_or(true, |max| item.calories <= max)
                    && criteria.min_protein.map_or(true, |min| item.protein >= min)
                    && criteria
                        .region
                        .as_deref()
                        .map_or(true, |region| item.region.as_deref() == Some(region))
                    && criteria
                        .difficulty
                        .map_or(true, |difficulty| item.difficulty == Some(difficulty))
                    && criteria.popular.map_or(true, |popular| item.is_popular == popular)
            })
            .collect()
    }
}

fn validate(item: &FoodCatalogItem) -> Result<(), CatalogError> {
    let fields = [
        ("calories", Some(item.calories)),
        ("protein", Some(item.protein)),
        ("carbs", Some(item.carbs)),
        ("fat", Some(item.fat)),
        ("fiber", item.fiber),
        ("sugar", item.sugar),
        ("sodium", item.sodium),
        ("calcium", item.calcium),
        ("iron", item.iron),
        ("vitamin_c", item.vitamin_c),
    ];
    for (field, value) in fields {
        if let Some(value) = value {
            if !value.is_finite() || value < 0.0 {
                return Err(CatalogError::InvalidValue {
                    id: item.id.clone(),
                    field,
                });
            }
        }
    }
    Ok(())
}
