// Server-rendered views using Askama templates.
//
// Every page goes through optional authentication so the nav reflects the
// visitor; account pages redirect anonymous visitors to the login form.

mod templates;

use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::api::auth::MaybeUser;
use crate::db::{Tour, UserResponse};
use crate::AppState;

pub use templates::*;

// Helper to render templates and handle errors
fn render_template<T: Template>(template: T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Template error: {}", e),
        )
            .into_response(),
    }
}

pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(overview))
        .route("/tour/:slug", get(tour_page))
        .route("/login", get(login_page))
        .route("/me", get(account))
        .route("/my-tours", get(my_tours))
}

/// GET / — all tours
async fn overview(State(state): State<Arc<AppState>>, MaybeUser(user): MaybeUser) -> Response {
    let tours: Vec<Tour> = match sqlx::query_as("SELECT * FROM tours ORDER BY name ASC")
        .fetch_all(&state.db)
        .await
    {
        Ok(tours) => tours,
        Err(e) => {
            tracing::error!("Failed to load tours for overview: {}", e);
            return render_error(user.map(Into::into), "Please try again later.");
        }
    };

    render_template(OverviewTemplate {
        title: "All Tours".to_string(),
        user: user.map(Into::into),
        tours: tours.into_iter().map(TourCard::from).collect(),
    })
}

/// GET /tour/:slug
async fn tour_page(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
    Path(slug): Path<String>,
) -> Response {
    let tour: Option<Tour> = match sqlx::query_as("SELECT * FROM tours WHERE slug = ?")
        .bind(&slug)
        .fetch_optional(&state.db)
        .await
    {
        Ok(tour) => tour,
        Err(e) => {
            tracing::error!("Failed to load tour {}: {}", slug, e);
            return render_error(user.map(Into::into), "Please try again later.");
        }
    };

    let Some(tour) = tour else {
        let page = ErrorTemplate {
            title: "Not found".to_string(),
            user: user.map(Into::into),
            message: "There is no tour with that name.".to_string(),
        };
        return (StatusCode::NOT_FOUND, render_template(page)).into_response();
    };

    render_template(TourPageTemplate {
        title: format!("{} Tour", tour.name),
        user: user.map(Into::into),
        tour: TourDetail::from(tour),
    })
}

/// GET /login
async fn login_page(MaybeUser(user): MaybeUser) -> Response {
    render_template(LoginTemplate {
        title: "Log into your account".to_string(),
        user: user.map(Into::into),
    })
}

/// GET /me
async fn account(MaybeUser(user): MaybeUser) -> Response {
    let Some(user) = user else {
        return Redirect::to("/login").into_response();
    };

    let account = UserResponse::from(user);
    render_template(AccountTemplate {
        title: "Your account".to_string(),
        user: Some(account.clone()),
        account,
    })
}

/// GET /my-tours — tours the visitor has booked
async fn my_tours(State(state): State<Arc<AppState>>, MaybeUser(user): MaybeUser) -> Response {
    let Some(user) = user else {
        return Redirect::to("/login").into_response();
    };

    let tours: Vec<Tour> = match sqlx::query_as(
        r#"
        SELECT t.* FROM tours t
        JOIN bookings b ON b.tour_id = t.id
        WHERE b.user_id = ?
        ORDER BY b.created_at DESC
        "#,
    )
    .bind(&user.id)
    .fetch_all(&state.db)
    .await
    {
        Ok(tours) => tours,
        Err(e) => {
            tracing::error!("Failed to load bookings for {}: {}", user.id, e);
            return render_error(Some(user.into()), "Please try again later.");
        }
    };

    render_template(MyToursTemplate {
        title: "My Tours".to_string(),
        user: Some(user.into()),
        tours: tours.into_iter().map(TourCard::from).collect(),
    })
}

fn render_error(user: Option<UserResponse>, message: &str) -> Response {
    let page = ErrorTemplate {
        title: "Something went wrong".to_string(),
        user,
        message: message.to_string(),
    };
    (StatusCode::INTERNAL_SERVER_ERROR, render_template(page)).into_response()
}
