pub mod auth;
mod bookings;
pub mod error;
pub mod rate_limit;
mod tours;
mod uploads;
mod users;
mod validation;
mod webhooks;

use axum::{
    middleware,
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

/// Simple status/message envelope for endpoints with no payload
#[derive(Debug, Serialize)]
pub struct StatusMessage {
    pub status: &'static str,
    pub message: String,
}

impl StatusMessage {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: message.into(),
        }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    // Credential endpoints: the brute-force surface, strictest tier
    let auth_routes = Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/forgotPassword", post(auth::forgot_password))
        .route("/resetPassword/:token", patch(auth::reset_password))
        .route("/updatePassword", patch(auth::update_password))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::rate_limit_auth,
        ));

    let user_routes = Router::new()
        .route("/me", get(users::get_me))
        .route("/updateMe", patch(users::update_me))
        .route("/deleteMe", delete(users::delete_me))
        .route("/", get(users::list_users))
        .route("/:id", get(users::get_user))
        .route("/:id", patch(users::update_user))
        .route("/:id", delete(users::delete_user));

    let tour_routes = Router::new()
        .route("/", get(tours::list_tours))
        .route("/", post(tours::create_tour))
        .route("/top-5-cheap", get(tours::top_tours))
        .route("/tour-stats", get(tours::tour_stats))
        .route("/monthly-plan/:year", get(tours::monthly_plan))
        .route(
            "/tours-within/:distance/center/:latlng/unit/:unit",
            get(tours::tours_within),
        )
        .route(
            "/tour-distances/center/:latlng/unit/:unit",
            get(tours::tour_distances),
        )
        .route("/:id", get(tours::get_tour))
        .route("/:id", patch(tours::update_tour))
        .route("/:id", delete(tours::delete_tour))
        .route("/:id/images", put(tours::upload_tour_images));

    let booking_routes = Router::new()
        .route("/checkout-session/:tour_id", get(bookings::get_checkout_session))
        .route("/", get(bookings::list_bookings))
        .route("/", post(bookings::create_booking))
        .route("/:id", get(bookings::get_booking))
        .route("/:id", patch(bookings::update_booking))
        .route("/:id", delete(bookings::delete_booking));

    let api_routes = Router::new()
        .nest("/users", auth_routes.merge(user_routes))
        .nest("/tours", tour_routes)
        .nest("/bookings", booking_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::rate_limit_api,
        ))
        .layer(CorsLayer::permissive());

    // Raw-body route; the provider's deliveries get their own tier
    let webhook_routes = Router::new()
        .route("/payments", post(webhooks::payment_webhook))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::rate_limit_webhook,
        ));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes)
        .nest("/webhooks", webhook_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .with_state(state)
}

async fn health_check() -> Json<StatusMessage> {
    Json(StatusMessage::ok("OK"))
}
