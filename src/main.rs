use std::path::PathBuf;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use nutrition_insights::catalog::{FoodCatalog, FoodFilter};
use nutrition_insights::config::Settings;
use nutrition_insights::engine::{DEFAULT_DEFICIENCY_LOOKBACK_DAYS, DEFAULT_TREND_LOOKBACK_DAYS};
use nutrition_insights::goals::{self, DailyGoals};
use nutrition_insights::models::{
    FoodCategory, HealthSample, MealRecord, UserProfile, WaterEntry,
};
use nutrition_insights::report::{self, ReportInput};
use nutrition_insights::trends::NUTRITION_WINDOW_DAYS;
use nutrition_insights::{db, intake, NutritionEngine};

#[derive(Parser)]
#[command(name = "nutrition-insights")]
#[command(about = "Nutrient gap analysis, food suggestions and trend forecasts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Scope {
    /// Profile email
    #[arg(long)]
    email: String,
    /// Reference date (YYYY-MM-DD); defaults to the current UTC date
    #[arg(long)]
    today: Option<NaiveDate>,
    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

impl Scope {
    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Utc::now().date_naive())
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load demo profiles, meals and weigh-ins
    Seed,
    /// Create or update a profile from a JSON file
    SetProfile {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        profile: PathBuf,
    },
    /// Import meals from a CSV file
    ImportMeals {
        #[arg(long)]
        email: String,
        #[arg(long)]
        csv: PathBuf,
    },
    /// Import health samples from a CSV file
    ImportHealth {
        #[arg(long)]
        email: String,
        #[arg(long)]
        csv: PathBuf,
    },
    /// Import water intake entries from a CSV file
    ImportWater {
        #[arg(long)]
        email: String,
        #[arg(long)]
        csv: PathBuf,
    },
    /// List nutrient deficiencies
    Deficiencies {
        #[command(flatten)]
        scope: Scope,
        #[arg(long, default_value_t = DEFAULT_DEFICIENCY_LOOKBACK_DAYS)]
        lookback_days: u32,
    },
    /// Recommend catalog foods for current deficiencies
    Recommend {
        #[command(flatten)]
        scope: Scope,
        #[arg(long, default_value_t = DEFAULT_DEFICIENCY_LOOKBACK_DAYS)]
        lookback_days: u32,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Forecast weight, calorie balance and energy trends
    Trends {
        #[command(flatten)]
        scope: Scope,
        #[arg(long, default_value_t = DEFAULT_TREND_LOOKBACK_DAYS)]
        lookback_days: u32,
    },
    /// Show progress against daily goals
    Progress {
        #[command(flatten)]
        scope: Scope,
    },
    /// Browse the food catalog
    Foods {
        #[arg(long)]
        query: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        max_calories: Option<f64>,
        #[arg(long)]
        popular: bool,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        scope: Scope,
        #[arg(long, default_value_t = DEFAULT_DEFICIENCY_LOOKBACK_DAYS)]
        lookback_days: u32,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

struct UserData {
    profile_id: Uuid,
    profile: UserProfile,
    meals: Vec<MealRecord>,
    health: Vec<HealthSample>,
}

async fn connect(settings: &Settings) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(settings.require_database_url()?)
        .await
        .context("failed to connect to Postgres")
}

fn load_catalog(settings: &Settings) -> anyhow::Result<FoodCatalog> {
    let catalog = match &settings.catalog_path {
        Some(path) => FoodCatalog::load(path)?,
        None => FoodCatalog::builtin()?,
    };
    Ok(catalog)
}

async fn profile_id(pool: &PgPool, email: &str) -> anyhow::Result<Uuid> {
    let (id, _) = db::fetch_profile(pool, email)
        .await?
        .with_context(|| format!("no profile found for {email}"))?;
    Ok(id)
}

async fn load_user(
    pool: &PgPool,
    email: &str,
    lookback_days: u32,
    today: NaiveDate,
) -> anyhow::Result<UserData> {
    let (profile_id, profile) = db::fetch_profile(pool, email)
        .await?
        .with_context(|| format!("no profile found for {email}"))?;
    let since = intake::window_start(today, lookback_days.max(NUTRITION_WINDOW_DAYS));
    let meals = db::fetch_meals(pool, profile_id, since).await?;
    let health = db::fetch_health_samples(pool, profile_id, since).await?;
    tracing::info!(%email, meals = meals.len(), samples = health.len(), "loaded history");

    Ok(UserData {
        profile_id,
        profile,
        meals,
        health,
    })
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::InitDb => {
            let pool = connect(&settings).await?;
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            let pool = connect(&settings).await?;
            db::seed(&pool).await?;
            println!("Seed data inserted.");
        }
        Commands::SetProfile {
            email,
            name,
            profile,
        } => {
            let raw = std::fs::read_to_string(&profile)
                .with_context(|| format!("failed to read {}", profile.display()))?;
            let parsed: UserProfile = serde_json::from_str(&raw)
                .with_context(|| format!("{} is not a valid profile", profile.display()))?;
            let pool = connect(&settings).await?;
            db::upsert_profile(&pool, &email, &name, &parsed).await?;
            println!("Profile saved for {email}.");
        }
        Commands::ImportMeals { email, csv } => {
            let pool = connect(&settings).await?;
            let id = profile_id(&pool, &email).await?;
            let inserted = db::import_meals_csv(&pool, id, &csv).await?;
            println!("Inserted {inserted} meals from {}.", csv.display());
        }
        Commands::ImportHealth { email, csv } => {
            let pool = connect(&settings).await?;
            let id = profile_id(&pool, &email).await?;
            let inserted = db::import_health_csv(&pool, id, &csv).await?;
            println!("Inserted {inserted} health samples from {}.", csv.display());
        }
        Commands::ImportWater { email, csv } => {
            let pool = connect(&settings).await?;
            let id = profile_id(&pool, &email).await?;
            let inserted = db::import_water_csv(&pool, id, &csv).await?;
            println!("Inserted {inserted} water entries from {}.", csv.display());
        }
        Commands::Deficiencies {
            scope,
            lookback_days,
        } => {
            let today = scope.today();
            let pool = connect(&settings).await?;
            let user = load_user(&pool, &scope.email, lookback_days, today).await?;
            let engine = NutritionEngine::new(Some(&user.profile), &user.meals, &user.health, &[]);
            let deficiencies = engine.analyze_deficiencies(lookback_days, today);

            if scope.json {
                print_json(&deficiencies)?;
            } else if deficiencies.is_empty() {
                println!("No nutrient gaps in the last {lookback_days} days.");
            } else {
                println!("Nutrient gaps, most severe first:");
                for deficiency in &deficiencies {
                    println!(
                        "- {} ({}) {:.1}/{:.1} {}: {}",
                        deficiency.nutrient,
                        deficiency.severity.as_str(),
                        deficiency.current_intake,
                        deficiency.recommended_intake,
                        deficiency.nutrient.unit(),
                        deficiency.health_impact
                    );
                }
            }
        }
        Commands::Recommend {
            scope,
            lookback_days,
            limit,
        } => {
            let today = scope.today();
            let catalog = load_catalog(&settings)?;
            let pool = connect(&settings).await?;
            let user = load_user(&pool, &scope.email, lookback_days, today).await?;
            let engine =
                NutritionEngine::new(Some(&user.profile), &user.meals, &user.health, catalog.items());
            let deficiencies = engine.analyze_deficiencies(lookback_days, today);
            let recommendations = engine.recommend_meals(&deficiencies);
            let shown = &recommendations[..recommendations.len().min(limit)];

            if scope.json {
                print_json(shown)?;
            } else if shown.is_empty() {
                println!("No catalog foods address the current gaps.");
            } else {
                println!("Suggested foods:");
                for recommendation in shown {
                    println!(
                        "- {} priority {} (fit {:.2}): {}",
                        recommendation.food.name,
                        recommendation.priority,
                        recommendation.compatibility_score,
                        recommendation.reason
                    );
                }
            }
        }
        Commands::Trends {
            scope,
            lookback_days,
        } => {
            let today = scope.today();
            let pool = connect(&settings).await?;
            let user = load_user(&pool, &scope.email, lookback_days, today).await?;
            let engine = NutritionEngine::new(Some(&user.profile), &user.meals, &user.health, &[]);
            let predictions = engine.predict_health_trends(lookback_days, today);

            if scope.json {
                print_json(&predictions)?;
            } else {
                for prediction in &predictions {
                    println!(
                        "- {}: {} over {}, projected {} (confidence {:.0}%)",
                        prediction.metric.display_name(),
                        prediction.trend.as_str(),
                        prediction.timeframe,
                        prediction.predicted_value,
                        prediction.confidence * 100.0
                    );
                }
            }
        }
        Commands::Progress { scope } => {
            let today = scope.today();
            let pool = connect(&settings).await?;
            let user = load_user(&pool, &scope.email, 7, today).await?;
            let water = db::fetch_water_entries(&pool, user.profile_id, today).await?;
            let goals = goals::auto_goals(&user.profile).unwrap_or_default();
            let progress = goals::daily_progress(&user.meals, &water, &goals, today);

            if scope.json {
                print_json(&progress)?;
            } else {
                println!(
                    "{today}: {:.0}/{:.0} kcal ({:.0} remaining), water {:.0}/{:.0} ml",
                    progress.totals.calories,
                    goals.calories,
                    progress.calories_remaining,
                    progress.water_ml,
                    goals.water_ml
                );
            }
        }
        Commands::Foods {
            query,
            category,
            max_calories,
            popular,
        } => {
            let catalog = load_catalog(&settings)?;
            let criteria = FoodFilter {
                category: category.map(FoodCategory::from),
                max_calories,
                popular: popular.then_some(true),
                ..FoodFilter::default()
            };
            let filtered = catalog.filter(&criteria);
            let matches: Vec<_> = match query.as_deref() {
                Some(query) => {
                    let hits = catalog.search(query);
                    filtered
                        .into_iter()
                        .filter(|item| hits.iter().any(|hit| hit.id == item.id))
                        .collect()
                }
                None => filtered,
            };

            for item in matches {
                println!(
                    "- {} [{}] {:.0} kcal, {:.1} g protein ({})",
                    item.name, item.category, item.calories, item.protein, item.portion
                );
            }
        }
        Commands::Report {
            scope,
            lookback_days,
            out,
        } => {
            let today = scope.today();
            let catalog = load_catalog(&settings)?;
            let pool = connect(&settings).await?;
            let user =
                load_user(&pool, &scope.email, lookback_days.max(DEFAULT_TREND_LOOKBACK_DAYS), today)
                    .await?;
            let water: Vec<WaterEntry> = db::fetch_water_entries(&pool, user.profile_id, today).await?;
            let engine =
                NutritionEngine::new(Some(&user.profile), &user.meals, &user.health, catalog.items());

            let deficiencies = engine.analyze_deficiencies(lookback_days, today);
            let recommendations = engine.recommend_meals(&deficiencies);
            let predictions = engine.predict_health_trends(DEFAULT_TREND_LOOKBACK_DAYS, today);
            let daily_goals: DailyGoals = goals::auto_goals(&user.profile).unwrap_or_default();
            let progress = goals::daily_progress(&user.meals, &water, &daily_goals, today);
            let macros = goals::macro_distribution(&user.meals, today);
            let weekly = goals::weekly_summary(&user.meals, today);
            let has_meals = !intake::meals_in_window(&user.meals, lookback_days, today).is_empty();

            let report = report::build_report(&ReportInput {
                subject: &scope.email,
                today,
                lookback_days,
                has_meals,
                deficiencies: &deficiencies,
                recommendations: &recommendations,
                predictions: &predictions,
                progress: &progress,
                macros: &macros,
                weekly: &weekly,
            });
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
