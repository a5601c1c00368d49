//! Booking model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: String,
    pub tour_id: String,
    pub user_id: String,
    pub price: f64,
    /// Provider checkout session id when created via the webhook path.
    /// UNIQUE in the schema, which is what makes redelivery idempotent.
    pub checkout_session_id: Option<String>,
    pub paid: bool,
    pub created_at: String,
}

/// Manual booking creation (admin path). The webhook path never reads a
/// client-supplied price.
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub tour_id: String,
    pub user_id: String,
    pub price: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateBookingRequest {
    pub price: Option<f64>,
    pub paid: Option<bool>,
}
