//! Tour model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Difficulty rating of a tour. Stored as TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Difficult,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Easy => write!(f, "easy"),
            Self::Medium => write!(f, "medium"),
            Self::Difficult => write!(f, "difficult"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tour {
    pub id: String,
    pub name: String,
    pub slug: String,
    /// Length of the tour in days
    pub duration: i64,
    pub max_group_size: i64,
    pub difficulty: Difficulty,
    pub price: f64,
    pub summary: String,
    pub description: Option<String>,
    pub image_cover: Option<String>,
    /// JSON array of gallery image filenames
    pub images: Option<String>,
    /// JSON array of RFC 3339 start dates
    pub start_dates: Option<String>,
    pub start_lat: Option<f64>,
    pub start_lng: Option<f64>,
    pub ratings_average: f64,
    pub ratings_quantity: i64,
    pub created_at: String,
}

impl Tour {
    pub fn gallery_images(&self) -> Vec<String> {
        parse_json_list(self.images.as_deref())
    }

    pub fn start_dates(&self) -> Vec<String> {
        parse_json_list(self.start_dates.as_deref())
    }
}

/// Helper to parse a JSON string-array column
pub fn parse_json_list(json: Option<&str>) -> Vec<String> {
    json.and_then(|s| serde_json::from_str(s).ok())
        .unwrap_or_default()
}

/// Helper to serialize a string list for a JSON TEXT column
pub fn serialize_json_list(items: &[String]) -> Option<String> {
    if items.is_empty() {
        None
    } else {
        serde_json::to_string(items).ok()
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateTourRequest {
    pub name: String,
    pub duration: i64,
    pub max_group_size: i64,
    pub difficulty: Difficulty,
    pub price: f64,
    pub summary: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_dates: Vec<String>,
    #[serde(default)]
    pub start_lat: Option<f64>,
    #[serde(default)]
    pub start_lng: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTourRequest {
    pub name: Option<String>,
    pub duration: Option<i64>,
    pub max_group_size: Option<i64>,
    pub difficulty: Option<Difficulty>,
    pub price: Option<f64>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub start_dates: Option<Vec<String>>,
    pub start_lat: Option<f64>,
    pub start_lng: Option<f64>,
}

/// Aggregate row for the tour-stats endpoint
#[derive(Debug, Serialize, PartialEq)]
pub struct TourStats {
    pub difficulty: Difficulty,
    pub num_tours: u32,
    pub num_ratings: i64,
    pub avg_rating: f64,
    pub avg_price: f64,
    pub min_price: f64,
    pub max_price: f64,
}

/// Per-month entry for the monthly-plan endpoint
#[derive(Debug, Serialize, PartialEq)]
pub struct MonthlyPlanEntry {
    pub month: u32,
    pub num_tours: u32,
    pub tours: Vec<String>,
}

/// Tour plus its distance from a query point
#[derive(Debug, Serialize)]
pub struct TourDistance {
    pub id: String,
    pub name: String,
    pub distance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_list_round_trip() {
        let items = vec!["a.jpeg".to_string(), "b.jpeg".to_string()];
        let json = serialize_json_list(&items).unwrap();
        assert_eq!(parse_json_list(Some(&json)), items);
    }

    #[test]
    fn empty_list_serializes_to_none() {
        assert_eq!(serialize_json_list(&[]), None);
        assert!(parse_json_list(None).is_empty());
        assert!(parse_json_list(Some("not json")).is_empty());
    }
}
