//! Booking endpoints: checkout-session creation for the authenticated
//! buyer, plus the admin/lead-guide management CRUD.
//!
//! The checkout path never creates a booking; that happens when the
//! provider's completed-session webhook lands (see `webhooks`).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{Booking, CreateBookingRequest, Role, Tour, UpdateBookingRequest};
use crate::payments::{CheckoutParams, CheckoutSession};
use crate::AppState;

use super::auth::{require_role, CurrentUser};
use super::error::{ApiError, ErrorCode};
use super::validation::validate_price;

#[derive(Debug, Serialize)]
pub struct CheckoutSessionResponse {
    pub status: &'static str,
    pub session: CheckoutSession,
}

/// GET /api/v1/bookings/checkout-session/:tour_id
pub async fn get_checkout_session(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(tour_id): Path<String>,
) -> Result<Json<CheckoutSessionResponse>, ApiError> {
    let tour: Option<Tour> = sqlx::query_as("SELECT * FROM tours WHERE id = ?")
        .bind(&tour_id)
        .fetch_optional(&state.db)
        .await?;
    let tour = tour.ok_or_else(|| ApiError::not_found("Tour not found"))?;

    let public_url = &state.config.server.public_url;
    let success_url = format!("{}/my-tours?alert=booking", public_url);
    let cancel_url = format!("{}/tour/{}", public_url, tour.slug);

    let session = state
        .payments
        .create_checkout_session(CheckoutParams {
            tour_id: &tour.id,
            tour_name: &tour.name,
            tour_summary: &tour.summary,
            price: tour.price,
            customer_email: &user.email,
            success_url: &success_url,
            cancel_url: &cancel_url,
        })
        .await
        .map_err(|e| {
            tracing::error!(tour_id = %tour.id, "Failed to create checkout session: {}", e);
            ApiError::new(
                ErrorCode::ExternalServiceError,
                "Could not create checkout session",
            )
        })?;

    Ok(Json(CheckoutSessionResponse {
        status: "success",
        session,
    }))
}

// -------------------------------------------------------------------------
// Management CRUD
// -------------------------------------------------------------------------

const MANAGER_ROLES: &[Role] = &[Role::Admin, Role::LeadGuide];

/// GET /api/v1/bookings
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Booking>>, ApiError> {
    require_role(&user, MANAGER_ROLES)?;

    let bookings: Vec<Booking> =
        sqlx::query_as("SELECT * FROM bookings ORDER BY created_at DESC")
            .fetch_all(&state.db)
            .await?;

    Ok(Json(bookings))
}

/// GET /api/v1/bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Booking>, ApiError> {
    require_role(&user, MANAGER_ROLES)?;

    let booking: Option<Booking> = sqlx::query_as("SELECT * FROM bookings WHERE id = ?")
        .bind(&id)
        .fetch_optional(&state.db)
        .await?;

    booking
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Booking not found"))
}

/// POST /api/v1/bookings
///
/// Manual creation (e.g. a booking taken over the phone). Unlike the
/// webhook path the price is taken from the request, so it is validated
/// and the referenced user and tour must exist.
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), ApiError> {
    require_role(&user, MANAGER_ROLES)?;
    validate_price(request.price).map_err(|e| ApiError::validation_field("price", e))?;

    let tour: Option<(String,)> = sqlx::query_as("SELECT id FROM tours WHERE id = ?")
        .bind(&request.tour_id)
        .fetch_optional(&state.db)
        .await?;
    if tour.is_none() {
        return Err(ApiError::validation_field("tour_id", "Tour does not exist"));
    }

    let target: Option<(String,)> =
        sqlx::query_as("SELECT id FROM users WHERE id = ? AND active = 1")
            .bind(&request.user_id)
            .fetch_optional(&state.db)
            .await?;
    if target.is_none() {
        return Err(ApiError::validation_field("user_id", "User does not exist"));
    }

    let id = Uuid::new_v4().to_string();
    sqlx::query(
        r#"
        INSERT INTO bookings (id, tour_id, user_id, price, paid, created_at)
        VALUES (?, ?, ?, ?, 1, ?)
        "#,
    )
    .bind(&id)
    .bind(&request.tour_id)
    .bind(&request.user_id)
    .bind(request.price)
    .bind(chrono::Utc::now().to_rfc3339())
    .execute(&state.db)
    .await?;

    let booking: Booking = sqlx::query_as("SELECT * FROM bookings WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    Ok((StatusCode::CREATED, Json(booking)))
}

/// PATCH /api/v1/bookings/:id
pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateBookingRequest>,
) -> Result<Json<Booking>, ApiError> {
    require_role(&user, MANAGER_ROLES)?;

    if let Some(price) = request.price {
        validate_price(price).map_err(|e| ApiError::validation_field("price", e))?;
    }

    let result = sqlx::query(
        "UPDATE bookings SET price = COALESCE(?, price), paid = COALESCE(?, paid) WHERE id = ?",
    )
    .bind(request.price)
    .bind(request.paid)
    .bind(&id)
    .execute(&state.db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Booking not found"));
    }

    let booking: Booking = sqlx::query_as("SELECT * FROM bookings WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    Ok(Json(booking))
}

/// DELETE /api/v1/bookings/:id
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    require_role(&user, MANAGER_ROLES)?;

    let result = sqlx::query("DELETE FROM bookings WHERE id = ?")
        .bind(&id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Booking not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
