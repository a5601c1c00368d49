//! Database seeders for demo data.
//!
//! Stands in for a fixture import: gives a fresh install a browsable
//! overview page and something to book against.

use anyhow::Result;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

/// Seed a handful of demo tours when the tours table is empty.
pub async fn seed_demo_tours(pool: &SqlitePool) -> Result<()> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tours")
        .fetch_one(pool)
        .await?;

    if count.0 > 0 {
        return Ok(());
    }

    info!("Seeding demo tours...");

    // (name, slug, duration, group, difficulty, price, summary, lat, lng, start_dates)
    let tours: Vec<(&str, &str, i64, i64, &str, f64, &str, f64, f64, &str)> = vec![
        (
            "The Forest Hiker",
            "the-forest-hiker",
            5,
            25,
            "easy",
            397.0,
            "Breathtaking hike through the Canadian Banff National Park",
            51.178,
            -115.570,
            r#"["2026-04-25T09:00:00Z","2026-07-20T09:00:00Z","2026-10-05T09:00:00Z"]"#,
        ),
        (
            "The Sea Explorer",
            "the-sea-explorer",
            7,
            15,
            "medium",
            497.0,
            "Exploring the jaw-dropping US east coast by foot and by boat",
            41.727,
            -71.320,
            r#"["2026-06-19T09:00:00Z","2026-07-20T09:00:00Z","2026-08-18T09:00:00Z"]"#,
        ),
        (
            "The Snow Adventurer",
            "the-snow-adventurer",
            4,
            10,
            "difficult",
            997.0,
            "Exciting adventure in the snow with snowboarding and skiing",
            47.086,
            -122.349,
            r#"["2026-01-05T09:00:00Z","2026-02-12T09:00:00Z"]"#,
        ),
        (
            "The City Wanderer",
            "the-city-wanderer",
            9,
            20,
            "easy",
            1197.0,
            "Living the life of Wanderlust in the US' most beautiful cities",
            40.790,
            -73.965,
            r#"["2026-03-11T09:00:00Z","2026-05-02T09:00:00Z"]"#,
        ),
    ];

    for (name, slug, duration, group, difficulty, price, summary, lat, lng, dates) in tours {
        sqlx::query(
            r#"
            INSERT INTO tours
                (id, name, slug, duration, max_group_size, difficulty, price,
                 summary, start_dates, start_lat, start_lng, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(name)
        .bind(slug)
        .bind(duration)
        .bind(group)
        .bind(difficulty)
        .bind(price)
        .bind(summary)
        .bind(dates)
        .bind(lat)
        .bind(lng)
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(pool)
        .await?;
    }

    info!("Seeded demo tours");
    Ok(())
}
