use anyhow::Context;
use chrono::{Duration, NaiveDate, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{
    ActivityLevel, BloodPressure, DietaryPreference, HealthCondition, HealthSample, MealRecord, Sex,
    UserProfile, WaterEntry,
};

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn upsert_profile(
    pool: &PgPool,
    email: &str,
    full_name: &str,
    profile: &UserProfile,
) -> anyhow::Result<Uuid> {
    let conditions: Vec<String> = profile
        .health_conditions
        .iter()
        .cloned()
        .map(String::from)
        .collect();
    let preferences: Vec<String> = profile.preferences.iter().cloned().map(String::from).collect();

    let id: Uuid = sqlx::query(
        r#"
        INSERT INTO nutrition_insights.profiles
        (id, email, full_name, age, sex, weight_kg, height_cm, activity_level,
         health_conditions, preferences, allergies)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        ON CONFLICT (email) DO UPDATE
        SET full_name = EXCLUDED.full_name,
            age = EXCLUDED.age,
            sex = EXCLUDED.sex,
            weight_kg = EXCLUDED.weight_kg,
            height_cm = EXCLUDED.height_cm,
            activity_level = EXCLUDED.activity_level,
            health_conditions = EXCLUDED.health_conditions,
            preferences = EXCLUDED.preferences,
            allergies = EXCLUDED.allergies
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(full_name)
    .bind(i32::try_from(profile.age).context("age out of range")?)
    .bind(match profile.sex {
        Sex::Male => "male",
        Sex::Female => "female",
    })
    .bind(profile.weight_kg)
    .bind(profile.height_cm)
    .bind(profile.activity_level.as_str())
    .bind(&conditions)
    .bind(&preferences)
    .bind(&profile.allergies)
    .fetch_one(pool)
    .await?
    .get("id");

    Ok(id)
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let profiles = vec![
        (
            "linh.nguyen@example.com",
            "Linh Nguyen",
            UserProfile {
                age: 29,
                sex: Sex::Female,
                weight_kg: 54.0,
                height_cm: 158.0,
                activity_level: ActivityLevel::Light,
                health_conditions: Vec::new(),
                preferences: vec![DietaryPreference::Vegetarian],
                allergies: vec!["peanut".to_string()],
            },
        ),
        (
            "minh.tran@example.com",
            "Minh Tran",
            UserProfile {
                age: 56,
                sex: Sex::Male,
                weight_kg: 78.0,
                height_cm: 170.0,
                activity_level: ActivityLevel::Sedentary,
                health_conditions: vec![HealthCondition::Diabetes, HealthCondition::Hypertension],
                preferences: Vec::new(),
                allergies: Vec::new(),
            },
        ),
    ];

    let today = Utc::now().date_naive();
    let menu = [
        ("Xôi xéo", 312.0, 6.8, 58.4, 6.2, "breakfast"),
        ("Bún chả", 452.0, 24.1, 51.3, 16.8, "lunch"),
        ("Canh chua", 124.0, 9.6, 14.2, 3.4, "dinner"),
    ];

    for (email, name, profile) in profiles {
        let profile_id = upsert_profile(pool, email, name, &profile).await?;

        for days_ago in 0..14_i64 {
            let day = today - Duration::days(days_ago);
            for (slot, (meal, calories, protein, carbs, fat, category)) in menu.iter().enumerate() {
                sqlx::query(
                    r#"
                    INSERT INTO nutrition_insights.meals
                    (id, profile_id, name, calories, protein, carbs, fat, eaten_on, category, source_key)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                    ON CONFLICT (source_key) DO NOTHING
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(profile_id)
                .bind(*meal)
                .bind(*calories)
                .bind(*protein)
                .bind(*carbs)
                .bind(*fat)
                .bind(day)
                .bind(*category)
                .bind(format!("seed-{email}-{day}-{slot}"))
                .execute(pool)
                .await?;
            }

            for (glass, amount_ml) in [500.0_f64, 750.0, 400.0].iter().enumerate() {
                sqlx::query(
                    r#"
                    INSERT INTO nutrition_insights.water_entries
                    (id, profile_id, logged_on, amount_ml, source_key)
                    VALUES ($1, $2, $3, $4, $5)
                    ON CONFLICT (source_key) DO NOTHING
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(profile_id)
                .bind(day)
                .bind(*amount_ml)
                .bind(format!("seed-{email}-{day}-water-{glass}"))
                .execute(pool)
                .await?;
            }

            if days_ago % 2 == 0 {
                sqlx::query(
                    r#"
                    INSERT INTO nutrition_insights.health_samples
                    (id, profile_id, measured_on, weight_kg, sleep_hours, source_key)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    ON CONFLICT (source_key) DO NOTHING
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(profile_id)
                .bind(day)
                .bind(profile.weight_kg + 0.05 * days_ago as f64)
                .bind(7.0_f64)
                .bind(format!("seed-{email}-{day}-health"))
                .execute(pool)
                .await?;
            }
        }
    }

    Ok(())
}

pub async fn fetch_profile(pool: &PgPool, email: &str) -> anyhow::Result<Option<(Uuid, UserProfile)>> {
    let row = sqlx::query(
        r#"
        SELECT id, age, sex, weight_kg, height_cm, activity_level,
               health_conditions, preferences, allergies
        FROM nutrition_insights.profiles
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let sex: String = row.get("sex");
    let activity: String = row.get("activity_level");
    let age: i32 = row.get("age");
    let conditions: Vec<String> = row.get("health_conditions");
    let preferences: Vec<String> = row.get("preferences");

    let profile = UserProfile {
        age: u32::try_from(age).unwrap_or(0),
        sex: parse_sex(&sex).unwrap_or_else(|| {
            tracing::warn!(%email, %sex, "unknown sex, using male");
            Sex::Male
        }),
        weight_kg: row.get("weight_kg"),
        height_cm: row.get("height_cm"),
        activity_level: ActivityLevel::parse(&activity).unwrap_or_else(|| {
            tracing::warn!(%email, %activity, "unknown activity level, using moderate");
            ActivityLevel::Moderate
        }),
        health_conditions: conditions.into_iter().map(HealthCondition::from).collect(),
        preferences: preferences.into_iter().map(DietaryPreference::from).collect(),
        allergies: row.get("allergies"),
    };

    Ok(Some((row.get("id"), profile)))
}

fn parse_sex(value: &str) -> Option<Sex> {
    match value.trim().to_ascii_lowercase().as_str() {
        "male" => Some(Sex::Male),
        "female" => Some(Sex::Female),
        _ => None,
    }
}

pub async fn fetch_meals(
    pool: &PgPool,
    profile_id: Uuid,
    since_date: NaiveDate,
) -> anyhow::Result<Vec<MealRecord>> {
    let rows = sqlx::query(
        r#"
        SELECT id, name, calories, protein, carbs, fat, eaten_on, category
        FROM nutrition_insights.meals
        WHERE profile_id = $1 AND eaten_on >= $2
        ORDER BY eaten_on, created_at
        "#,
    )
    .bind(profile_id)
    .bind(since_date)
    .fetch_all(pool)
    .await?;

    let mut meals = Vec::with_capacity(rows.len());
    for row in rows {
        let id: Uuid = row.get("id");
        let eaten_on: NaiveDate = row.get("eaten_on");
        meals.push(MealRecord {
            id: id.to_string(),
            name: row.get("name"),
            calories: row.get("calories"),
            protein: row.get("protein"),
            carbs: row.get("carbs"),
            fat: row.get("fat"),
            date: eaten_on.format("%Y-%m-%d").to_string(),
            category: row.get("category"),
        });
    }

    Ok(meals)
}

pub async fn fetch_health_samples(
    pool: &PgPool,
    profile_id: Uuid,
    since_date: NaiveDate,
) -> anyhow::Result<Vec<HealthSample>> {
    let rows = sqlx::query(
        r#"
        SELECT measured_on, weight_kg, systolic, diastolic, blood_glucose,
               exercise_minutes, sleep_hours, stress_level, mood
        FROM nutrition_insights.health_samples
        WHERE profile_id = $1 AND measured_on >= $2
        ORDER BY measured_on
        "#,
    )
    .bind(profile_id)
    .bind(since_date)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(health_sample_from_row).collect())
}

fn health_sample_from_row(row: &PgRow) -> HealthSample {
    let systolic: Option<f64> = row.get("systolic");
    let diastolic: Option<f64> = row.get("diastolic");
    let stress: Option<i16> = row.get("stress_level");
    let mood: Option<i16> = row.get("mood");

    HealthSample {
        date: row.get("measured_on"),
        weight_kg: row.get("weight_kg"),
        blood_pressure: systolic
            .zip(diastolic)
            .map(|(systolic, diastolic)| BloodPressure {
                systolic,
                diastolic,
            }),
        blood_glucose: row.get("blood_glucose"),
        exercise_minutes: row.get("exercise_minutes"),
        sleep_hours: row.get("sleep_hours"),
        stress_level: stress.and_then(|value| u8::try_from(value).ok()),
        mood: mood.and_then(|value| u8::try_from(value).ok()),
    }
}

pub async fn fetch_water_entries(
    pool: &PgPool,
    profile_id: Uuid,
    day: NaiveDate,
) -> anyhow::Result<Vec<WaterEntry>> {
    let rows = sqlx::query(
        r#"
        SELECT logged_on, amount_ml
        FROM nutrition_insights.water_entries
        WHERE profile_id = $1 AND logged_on = $2
        "#,
    )
    .bind(profile_id)
    .bind(day)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| WaterEntry {
            date: row.get("logged_on"),
            amount_ml: row.get("amount_ml"),
        })
        .collect())
}

/// Scores outside 1..=5 are treated as not recorded.
fn score_in_range(value: Option<i16>, field: &str) -> Option<i16> {
    value.filter(|score| {
        let valid = (1..=5).contains(score);
        if !valid {
            tracing::warn!(field, score, "dropping out-of-range score");
        }
        valid
    })
}

pub async fn import_meals_csv(
    pool: &PgPool,
    profile_id: Uuid,
    csv_path: &std::path::Path,
) -> anyhow::Result<usize> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        name: String,
        calories: f64,
        protein: f64,
        carbs: f64,
        fat: f64,
        date: NaiveDate,
        category: Option<String>,
        source_key: Option<String>,
    }

    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let mut inserted = 0usize;

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        let source_key = row
            .source_key
            .unwrap_or_else(|| format!("import-{}", Uuid::new_v4()));

        let result = sqlx::query(
            r#"
            INSERT INTO nutrition_insights.meals
            (id, profile_id, name, calories, protein, carbs, fat, eaten_on, category, source_key)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (source_key) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(profile_id)
        .bind(&row.name)
        .bind(row.calories)
        .bind(row.protein)
        .bind(row.carbs)
        .bind(row.fat)
        .bind(row.date)
        .bind(&row.category)
        .bind(source_key)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            inserted += 1;
        }
    }

    Ok(inserted)
}

pub async fn import_health_csv(
    pool: &PgPool,
    profile_id: Uuid,
    csv_path: &std::path::Path,
) -> anyhow::Result<usize> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        date: NaiveDate,
        weight_kg: Option<f64>,
        systolic: Option<f64>,
        diastolic: Option<f64>,
        blood_glucose: Option<f64>,
        exercise_minutes: Option<f64>,
        sleep_hours: Option<f64>,
        stress_level: Option<i16>,
        mood: Option<i16>,
        source_key: Option<String>,
    }

    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let mut inserted = 0usize;

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        let source_key = row
            .source_key
            .unwrap_or_else(|| format!("import-{}", Uuid::new_v4()));

        let result = sqlx::query(
            r#"
            INSERT INTO nutrition_insights.health_samples
            (id, profile_id, measured_on, weight_kg, systolic, diastolic, blood_glucose,
             exercise_minutes, sleep_hours, stress_level, mood, source_key)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (source_key) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(profile_id)
        .bind(row.date)
        .bind(row.weight_kg)
        .bind(row.systolic)
        .bind(row.diastolic)
        .bind(row.blood_glucose)
        .bind(row.exercise_minutes)
        .bind(row.sleep_hours)
        .bind(score_in_range(row.stress_level, "stress_level"))
        .bind(score_in_range(row.mood, "mood"))
        .bind(source_key)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            inserted += 1;
        }
    }

    Ok(inserted)
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct WaterCsvRow {
    pub date: NaiveDate,
    pub amount_ml: f64,
    pub source_key: Option<String>,
}

/// Reads water rows, skipping amounts that are negative or not finite.
pub fn read_water_csv(csv_path: &std::path::Path) -> anyhow::Result<Vec<WaterCsvRow>> {
    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let mut rows = Vec::new();

    for result in reader.deserialize::<WaterCsvRow>() {
        let row = result.with_context(|| format!("bad row in {}", csv_path.display()))?;
        if !row.amount_ml.is_finite() || row.amount_ml < 0.0 {
            tracing::warn!(date = %row.date, amount_ml = row.amount_ml, "skipping invalid water amount");
            continue;
        }
        rows.push(row);
    }

    Ok(rows)
}

pub async fn import_water_csv(
    pool: &PgPool,
    profile_id: Uuid,
    csv_path: &std::path::Path,
) -> anyhow::Result<usize> {
    let mut inserted = 0usize;

    for row in read_water_csv(csv_path)? {
        let source_key = row
            .source_key
            .unwrap_or_else(|| format!("import-{}", Uuid::new_v4()));

        let result = sqlx::query(
            r#"
            INSERT INTO nutrition_insights.water_entries
            (id, profile_id, logged_on, amount_ml, source_key)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (source_key) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(profile_id)
        .bind(row.date)
        .bind(row.amount_ml)
        .bind(source_key)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            inserted += 1;
        }
    }

    Ok(inserted)
}
