//! Tour endpoints: public catalog reads, role-gated writes, aggregate
//! stats, and geo queries against tour start locations.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{
    serialize_json_list, CreateTourRequest, Difficulty, MonthlyPlanEntry, Role, Tour,
    TourDistance, TourStats, UpdateTourRequest,
};
use crate::AppState;

use super::auth::{require_role, CurrentUser};
use super::error::{ApiError, ValidationErrorBuilder};
use super::uploads;
use super::validation::{slugify, validate_positive, validate_price, validate_tour_name};

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Maximum gallery images per tour
const MAX_GALLERY_IMAGES: usize = 3;

#[derive(Debug, Deserialize)]
pub struct ListToursQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListToursResponse {
    pub tours: Vec<Tour>,
    pub total: usize,
}

/// Map a requested sort keyword to a whitelisted ORDER BY fragment.
/// Anything outside the whitelist is a validation error, never SQL.
fn sort_clause(sort: Option<&str>) -> Result<&'static str, ApiError> {
    match sort {
        None => Ok("created_at DESC"),
        Some("price") => Ok("price ASC"),
        Some("-price") => Ok("price DESC"),
        Some("ratings") => Ok("ratings_average ASC"),
        Some("-ratings") => Ok("ratings_average DESC"),
        Some("name") => Ok("name ASC"),
        Some(other) => Err(ApiError::validation_field(
            "sort",
            format!("Unsupported sort key: {}", other),
        )),
    }
}

/// GET /api/v1/tours
pub async fn list_tours(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListToursQuery>,
) -> Result<Json<ListToursResponse>, ApiError> {
    let order = sort_clause(query.sort.as_deref())?;
    let limit = query.limit.unwrap_or(20).clamp(1, 100) as i64;
    let page = query.page.unwrap_or(1).max(1) as i64;
    let offset = (page - 1) * limit;

    let sql = format!("SELECT * FROM tours ORDER BY {} LIMIT ? OFFSET ?", order);
    let tours: Vec<Tour> = sqlx::query_as(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(&state.db)
        .await?;

    let total = tours.len();
    Ok(Json(ListToursResponse { tours, total }))
}

/// GET /api/v1/tours/top-5-cheap
pub async fn top_tours(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ListToursResponse>, ApiError> {
    let tours: Vec<Tour> =
        sqlx::query_as("SELECT * FROM tours ORDER BY ratings_average DESC, price ASC LIMIT 5")
            .fetch_all(&state.db)
            .await?;

    let total = tours.len();
    Ok(Json(ListToursResponse { tours, total }))
}

/// GET /api/v1/tours/:id
pub async fn get_tour(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Tour>, ApiError> {
    let tour: Option<Tour> = sqlx::query_as("SELECT * FROM tours WHERE id = ?")
        .bind(&id)
        .fetch_optional(&state.db)
        .await?;

    tour.map(Json).ok_or_else(|| ApiError::not_found("Tour not found"))
}

fn validate_tour_fields(
    name: &str,
    price: f64,
    duration: i64,
    max_group_size: i64,
) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    if let Err(e) = validate_tour_name(name) {
        errors.add("name", e);
    }
    if let Err(e) = validate_price(price) {
        errors.add("price", e);
    }
    if let Err(e) = validate_positive(duration, "duration") {
        errors.add("duration", e);
    }
    if let Err(e) = validate_positive(max_group_size, "max_group_size") {
        errors.add("max_group_size", e);
    }
    errors.finish()
}

/// POST /api/v1/tours
pub async fn create_tour(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateTourRequest>,
) -> Result<(StatusCode, Json<Tour>), ApiError> {
    require_role(&user, &[Role::Admin, Role::LeadGuide])?;
    validate_tour_fields(
        &request.name,
        request.price,
        request.duration,
        request.max_group_size,
    )?;

    let id = Uuid::new_v4().to_string();
    let name = request.name.trim().to_string();
    let slug = slugify(&name);

    sqlx::query(
        r#"
        INSERT INTO tours
            (id, name, slug, duration, max_group_size, difficulty, price,
             summary, description, start_dates, start_lat, start_lng, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&name)
    .bind(&slug)
    .bind(request.duration)
    .bind(request.max_group_size)
    .bind(request.difficulty)
    .bind(request.price)
    .bind(request.summary.trim())
    .bind(&request.description)
    .bind(serialize_json_list(&request.start_dates))
    .bind(request.start_lat)
    .bind(request.start_lng)
    .bind(chrono::Utc::now().to_rfc3339())
    .execute(&state.db)
    .await?;

    let tour: Tour = sqlx::query_as("SELECT * FROM tours WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    tracing::info!(tour_id = %id, name = %tour.name, "Tour created");

    Ok((StatusCode::CREATED, Json(tour)))
}

/// PATCH /api/v1/tours/:id
pub async fn update_tour(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateTourRequest>,
) -> Result<Json<Tour>, ApiError> {
    require_role(&user, &[Role::Admin, Role::LeadGuide])?;

    if let Some(ref name) = request.name {
        validate_tour_name(name).map_err(|e| ApiError::validation_field("name", e))?;
    }
    if let Some(price) = request.price {
        validate_price(price).map_err(|e| ApiError::validation_field("price", e))?;
    }
    if let Some(duration) = request.duration {
        validate_positive(duration, "duration")
            .map_err(|e| ApiError::validation_field("duration", e))?;
    }
    if let Some(size) = request.max_group_size {
        validate_positive(size, "max_group_size")
            .map_err(|e| ApiError::validation_field("max_group_size", e))?;
    }

    let name = request.name.as_deref().map(str::trim).map(String::from);
    let slug = name.as_deref().map(slugify);

    let result = sqlx::query(
        r#"
        UPDATE tours
        SET name = COALESCE(?, name),
            slug = COALESCE(?, slug),
            duration = COALESCE(?, duration),
            max_group_size = COALESCE(?, max_group_size),
            difficulty = COALESCE(?, difficulty),
            price = COALESCE(?, price),
            summary = COALESCE(?, summary),
            description = COALESCE(?, description),
            start_dates = COALESCE(?, start_dates),
            start_lat = COALESCE(?, start_lat),
            start_lng = COALESCE(?, start_lng)
        WHERE id = ?
        "#,
    )
    .bind(&name)
    .bind(&slug)
    .bind(request.duration)
    .bind(request.max_group_size)
    .bind(request.difficulty)
    .bind(request.price)
    .bind(request.summary.as_deref().map(str::trim))
    .bind(&request.description)
    .bind(request.start_dates.as_deref().and_then(serialize_json_list))
    .bind(request.start_lat)
    .bind(request.start_lng)
    .bind(&id)
    .execute(&state.db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Tour not found"));
    }

    let tour: Tour = sqlx::query_as("SELECT * FROM tours WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    Ok(Json(tour))
}

/// DELETE /api/v1/tours/:id
pub async fn delete_tour(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    require_role(&user, &[Role::Admin, Role::LeadGuide])?;

    let result = sqlx::query("DELETE FROM tours WHERE id = ?")
        .bind(&id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Tour not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/tours/:id/images
///
/// Multipart form: one `image_cover` field and up to three `images`
/// fields. Everything is resized to 2000×1333 JPEG. Filenames embed the
/// tour id and a timestamp. If a later resize fails after earlier files
/// were written there is no compensating cleanup; the document update
/// only happens after all files are on disk.
pub async fn upload_tour_images(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<Tour>, ApiError> {
    require_role(&user, &[Role::Admin, Role::LeadGuide])?;

    let tour: Option<Tour> = sqlx::query_as("SELECT * FROM tours WHERE id = ?")
        .bind(&id)
        .fetch_optional(&state.db)
        .await?;
    if tour.is_none() {
        return Err(ApiError::not_found("Tour not found"));
    }

    let mut cover_bytes: Option<Vec<u8>> = None;
    let mut gallery_bytes: Vec<Vec<u8>> = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image_cover" | "images" => {
                if !uploads::is_image_content_type(field.content_type()) {
                    return Err(ApiError::validation_field(&name, "Please upload only images"));
                }
                let bytes = field.bytes().await?.to_vec();
                if name == "image_cover" {
                    cover_bytes = Some(bytes);
                } else {
                    if gallery_bytes.len() >= MAX_GALLERY_IMAGES {
                        return Err(ApiError::validation_field(
                            "images",
                            format!("At most {} gallery images", MAX_GALLERY_IMAGES),
                        ));
                    }
                    gallery_bytes.push(bytes);
                }
            }
            _ => {}
        }
    }

    if cover_bytes.is_none() && gallery_bytes.is_empty() {
        return Err(ApiError::validation_message("No images provided"));
    }

    let timestamp = chrono::Utc::now().timestamp_millis();
    let (width, height) = uploads::TOUR_IMAGE_SIZE;
    let base_dir = state.config.server.uploads_dir.join("img/tours");

    let mut cover_filename: Option<String> = None;
    if let Some(bytes) = cover_bytes {
        let filename = uploads::tour_cover_filename(&id, timestamp);
        uploads::save_resized_jpeg(bytes, base_dir.join(&filename), width, height).await?;
        cover_filename = Some(filename);
    }

    let mut gallery_filenames: Vec<String> = Vec::new();
    for (i, bytes) in gallery_bytes.into_iter().enumerate() {
        let filename = uploads::tour_image_filename(&id, timestamp, i + 1);
        uploads::save_resized_jpeg(bytes, base_dir.join(&filename), width, height).await?;
        gallery_filenames.push(filename);
    }

    sqlx::query(
        r#"
        UPDATE tours
        SET image_cover = COALESCE(?, image_cover),
            images = COALESCE(?, images)
        WHERE id = ?
        "#,
    )
    .bind(&cover_filename)
    .bind(serialize_json_list(&gallery_filenames))
    .bind(&id)
    .execute(&state.db)
    .await?;

    let tour: Tour = sqlx::query_as("SELECT * FROM tours WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    Ok(Json(tour))
}

// -------------------------------------------------------------------------
// Aggregates
// -------------------------------------------------------------------------

/// Group tours rated >= 4.5 by difficulty
fn aggregate_stats(tours: &[Tour]) -> Vec<TourStats> {
    let mut stats = Vec::new();

    for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Difficult] {
        let group: Vec<&Tour> = tours
            .iter()
            .filter(|t| t.difficulty == difficulty && t.ratings_average >= 4.5)
            .collect();
        if group.is_empty() {
            continue;
        }

        let n = group.len() as f64;
        stats.push(TourStats {
            difficulty,
            num_tours: group.len() as u32,
            num_ratings: group.iter().map(|t| t.ratings_quantity).sum(),
            avg_rating: group.iter().map(|t| t.ratings_average).sum::<f64>() / n,
            avg_price: group.iter().map(|t| t.price).sum::<f64>() / n,
            min_price: group.iter().map(|t| t.price).fold(f64::INFINITY, f64::min),
            max_price: group
                .iter()
                .map(|t| t.price)
                .fold(f64::NEG_INFINITY, f64::max),
        });
    }

    stats
}

/// Bucket tour starts in `year` by month, busiest month first
fn aggregate_monthly_plan(tours: &[Tour], year: i32) -> Vec<MonthlyPlanEntry> {
    use chrono::Datelike;

    let mut by_month: [Vec<String>; 12] = Default::default();

    for tour in tours {
        for date in tour.start_dates() {
            if let Ok(parsed) = chrono::DateTime::parse_from_rfc3339(&date) {
                if parsed.year() == year {
                    by_month[parsed.month0() as usize].push(tour.name.clone());
                }
            }
        }
    }

    let mut plan: Vec<MonthlyPlanEntry> = by_month
        .into_iter()
        .enumerate()
        .filter(|(_, names)| !names.is_empty())
        .map(|(i, names)| MonthlyPlanEntry {
            month: i as u32 + 1,
            num_tours: names.len() as u32,
            tours: names,
        })
        .collect();

    plan.sort_by(|a, b| b.num_tours.cmp(&a.num_tours).then(a.month.cmp(&b.month)));
    plan
}

/// GET /api/v1/tours/tour-stats
pub async fn tour_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TourStats>>, ApiError> {
    let tours: Vec<Tour> = sqlx::query_as("SELECT * FROM tours")
        .fetch_all(&state.db)
        .await?;
    Ok(Json(aggregate_stats(&tours)))
}

/// GET /api/v1/tours/monthly-plan/:year
pub async fn monthly_plan(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(year): Path<i32>,
) -> Result<Json<Vec<MonthlyPlanEntry>>, ApiError> {
    require_role(&user, &[Role::Admin, Role::LeadGuide, Role::Guide])?;

    let tours: Vec<Tour> = sqlx::query_as("SELECT * FROM tours")
        .fetch_all(&state.db)
        .await?;
    Ok(Json(aggregate_monthly_plan(&tours, year)))
}

// -------------------------------------------------------------------------
// Geo queries
// -------------------------------------------------------------------------

/// Great-circle distance between two points, in meters
fn haversine_meters(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_METERS * a.sqrt().asin()
}

fn parse_latlng(latlng: &str) -> Result<(f64, f64), ApiError> {
    let invalid = || {
        ApiError::bad_request("Please provide latitude and longitude in the format lat,lng")
    };
    let (lat, lng) = latlng.split_once(',').ok_or_else(invalid)?;
    let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
    let lng: f64 = lng.trim().parse().map_err(|_| invalid())?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(invalid());
    }
    Ok((lat, lng))
}

fn meters_per_unit(unit: &str) -> Result<f64, ApiError> {
    match unit {
        "mi" => Ok(1_609.344),
        "km" => Ok(1_000.0),
        _ => Err(ApiError::bad_request("Unit must be mi or km")),
    }
}

/// GET /api/v1/tours/tours-within/:distance/center/:latlng/unit/:unit
pub async fn tours_within(
    State(state): State<Arc<AppState>>,
    Path((distance, latlng, unit)): Path<(f64, String, String)>,
) -> Result<Json<ListToursResponse>, ApiError> {
    let (lat, lng) = parse_latlng(&latlng)?;
    let radius_meters = distance * meters_per_unit(&unit)?;

    let tours: Vec<Tour> = sqlx::query_as(
        "SELECT * FROM tours WHERE start_lat IS NOT NULL AND start_lng IS NOT NULL",
    )
    .fetch_all(&state.db)
    .await?;

    let tours: Vec<Tour> = tours
        .into_iter()
        .filter(|t| match (t.start_lat, t.start_lng) {
            (Some(t_lat), Some(t_lng)) => {
                haversine_meters(lat, lng, t_lat, t_lng) <= radius_meters
            }
            _ => false,
        })
        .collect();

    let total = tours.len();
    Ok(Json(ListToursResponse { tours, total }))
}

/// GET /api/v1/tours/tour-distances/center/:latlng/unit/:unit
pub async fn tour_distances(
    State(state): State<Arc<AppState>>,
    Path((latlng, unit)): Path<(String, String)>,
) -> Result<Json<Vec<TourDistance>>, ApiError> {
    let (lat, lng) = parse_latlng(&latlng)?;
    let per_unit = meters_per_unit(&unit)?;

    let tours: Vec<Tour> = sqlx::query_as(
        "SELECT * FROM tours WHERE start_lat IS NOT NULL AND start_lng IS NOT NULL",
    )
    .fetch_all(&state.db)
    .await?;

    let mut distances: Vec<TourDistance> = tours
        .into_iter()
        .filter_map(|t| match (t.start_lat, t.start_lng) {
            (Some(t_lat), Some(t_lng)) => Some(TourDistance {
                distance: haversine_meters(lat, lng, t_lat, t_lng) / per_unit,
                id: t.id,
                name: t.name,
            }),
            _ => None,
        })
        .collect();

    distances.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    Ok(Json(distances))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tour(name: &str, difficulty: Difficulty, price: f64, rating: f64, dates: &[&str]) -> Tour {
        Tour {
            id: format!("id-{}", name),
            name: name.to_string(),
            slug: slugify(name),
            duration: 5,
            max_group_size: 10,
            difficulty,
            price,
            summary: String::new(),
            description: None,
            image_cover: None,
            images: None,
            start_dates: serialize_json_list(
                &dates.iter().map(|d| d.to_string()).collect::<Vec<_>>(),
            ),
            start_lat: None,
            start_lng: None,
            ratings_average: rating,
            ratings_quantity: 10,
            created_at: String::new(),
        }
    }

    #[test]
    fn stats_group_by_difficulty_above_rating_floor() {
        let tours = vec![
            tour("a", Difficulty::Easy, 100.0, 4.6, &[]),
            tour("b", Difficulty::Easy, 300.0, 4.8, &[]),
            tour("c", Difficulty::Medium, 500.0, 4.0, &[]), // below floor
            tour("d", Difficulty::Difficult, 900.0, 4.9, &[]),
        ];

        let stats = aggregate_stats(&tours);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].difficulty, Difficulty::Easy);
        assert_eq!(stats[0].num_tours, 2);
        assert_eq!(stats[0].min_price, 100.0);
        assert_eq!(stats[0].max_price, 300.0);
        assert_eq!(stats[0].avg_price, 200.0);
        assert_eq!(stats[1].difficulty, Difficulty::Difficult);
    }

    #[test]
    fn monthly_plan_buckets_and_sorts() {
        let tours = vec![
            tour("a", Difficulty::Easy, 100.0, 4.6, &[
                "2026-07-01T09:00:00Z",
                "2026-03-10T09:00:00Z",
            ]),
            tour("b", Difficulty::Easy, 100.0, 4.6, &[
                "2026-07-15T09:00:00Z",
                "2025-07-15T09:00:00Z", // wrong year, ignored
            ]),
        ];

        let plan = aggregate_monthly_plan(&tours, 2026);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].month, 7);
        assert_eq!(plan[0].num_tours, 2);
        assert_eq!(plan[1].month, 3);
        assert_eq!(plan[1].num_tours, 1);
    }

    #[test]
    fn haversine_of_identical_points_is_zero() {
        assert_eq!(haversine_meters(51.5, -0.12, 51.5, -0.12), 0.0);
    }

    #[test]
    fn haversine_matches_reference_distance() {
        // London to Paris, ~343.5 km great-circle
        let d = haversine_meters(51.5074, -0.1278, 48.8566, 2.3522);
        let reference = 343_500.0;
        assert!((d - reference).abs() / reference < 0.01, "got {}", d);
    }

    #[test]
    fn latlng_parsing() {
        assert_eq!(parse_latlng("34.1,-118.1").unwrap(), (34.1, -118.1));
        assert!(parse_latlng("34.1").is_err());
        assert!(parse_latlng("abc,def").is_err());
        assert!(parse_latlng("91.0,0.0").is_err());
    }

    #[test]
    fn sort_whitelist() {
        assert_eq!(sort_clause(None).unwrap(), "created_at DESC");
        assert_eq!(sort_clause(Some("-price")).unwrap(), "price DESC");
        assert!(sort_clause(Some("price; DROP TABLE tours")).is_err());
    }
}
