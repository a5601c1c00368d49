// Askama template definitions

use askama::Template;

use crate::db::{Tour, UserResponse};

/// Tour summary for list pages
pub struct TourCard {
    pub name: String,
    pub slug: String,
    pub summary: String,
    pub duration: i64,
    pub difficulty: String,
    pub price: f64,
    pub image_cover: Option<String>,
    pub ratings_average: f64,
}

impl From<Tour> for TourCard {
    fn from(tour: Tour) -> Self {
        Self {
            name: tour.name,
            slug: tour.slug,
            summary: tour.summary,
            duration: tour.duration,
            difficulty: tour.difficulty.to_string(),
            price: tour.price,
            image_cover: tour.image_cover,
            ratings_average: tour.ratings_average,
        }
    }
}

/// Full tour detail for the tour page
pub struct TourDetail {
    pub id: String,
    pub name: String,
    pub summary: String,
    pub description: String,
    pub duration: i64,
    pub max_group_size: i64,
    pub difficulty: String,
    pub price: f64,
    pub image_cover: Option<String>,
    pub images: Vec<String>,
    pub ratings_average: f64,
    pub ratings_quantity: i64,
}

impl From<Tour> for TourDetail {
    fn from(tour: Tour) -> Self {
        let images = tour.gallery_images();
        Self {
            id: tour.id,
            name: tour.name,
            summary: tour.summary,
            description: tour.description.unwrap_or_default(),
            duration: tour.duration,
            max_group_size: tour.max_group_size,
            difficulty: tour.difficulty.to_string(),
            price: tour.price,
            image_cover: tour.image_cover,
            images,
            ratings_average: tour.ratings_average,
            ratings_quantity: tour.ratings_quantity,
        }
    }
}

#[derive(Template)]
#[template(path = "overview.html")]
pub struct OverviewTemplate {
    pub title: String,
    pub user: Option<UserResponse>,
    pub tours: Vec<TourCard>,
}

#[derive(Template)]
#[template(path = "tour.html")]
pub struct TourPageTemplate {
    pub title: String,
    pub user: Option<UserResponse>,
    pub tour: TourDetail,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub title: String,
    pub user: Option<UserResponse>,
}

#[derive(Template)]
#[template(path = "account.html")]
pub struct AccountTemplate {
    pub title: String,
    pub user: Option<UserResponse>,
    pub account: UserResponse,
}

#[derive(Template)]
#[template(path = "my_tours.html")]
pub struct MyToursTemplate {
    pub title: String,
    pub user: Option<UserResponse>,
    pub tours: Vec<TourCard>,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub user: Option<UserResponse>,
    pub message: String,
}
