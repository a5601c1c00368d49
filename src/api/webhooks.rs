//! Payment webhook ingestion and booking reconciliation.
//!
//! The body is consumed as raw bytes so signature verification runs over
//! exactly what the provider signed; routing this through the JSON
//! extractor would re-serialize the payload and break the check.
//!
//! Only `checkout.session.completed` has a side effect. Every other event
//! type is acknowledged and ignored: the endpoint is not the place to
//! reject event types that may change over the provider's lifetime.

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::DbPool;
use crate::payments::{self, WebhookEvent, CHECKOUT_COMPLETED, SIGNATURE_HEADER};
use crate::AppState;

use super::error::ApiError;

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

/// Result of reconciling a completed checkout session into a booking
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ReconcileOutcome {
    Created,
    /// The session id was already booked; redelivery is a no-op
    Duplicate,
    NoMatchingUser,
    UnknownTour,
    MissingField(&'static str),
}

/// Create at most one booking for a completed checkout session.
///
/// The insert is keyed on the provider session id (UNIQUE column), so a
/// redelivered event — or a concurrent duplicate delivery — cannot
/// produce a second booking. Price comes from the session's authoritative
/// total, never from client input.
pub(crate) async fn reconcile_booking(
    db: &DbPool,
    event: &WebhookEvent,
) -> Result<ReconcileOutcome, ApiError> {
    let object = &event.data.object;

    let Some(tour_id) = object.client_reference_id.as_deref() else {
        return Ok(ReconcileOutcome::MissingField("client_reference_id"));
    };
    let Some(email) = object.customer_email.as_deref() else {
        return Ok(ReconcileOutcome::MissingField("customer_email"));
    };
    let Some(amount_total) = object.amount_total else {
        return Ok(ReconcileOutcome::MissingField("amount_total"));
    };

    let user: Option<(String,)> =
        sqlx::query_as("SELECT id FROM users WHERE email = ? AND active = 1")
            .bind(email.to_lowercase())
            .fetch_optional(db)
            .await?;
    let Some((user_id,)) = user else {
        return Ok(ReconcileOutcome::NoMatchingUser);
    };

    let tour: Option<(String,)> = sqlx::query_as("SELECT id FROM tours WHERE id = ?")
        .bind(tour_id)
        .fetch_optional(db)
        .await?;
    if tour.is_none() {
        return Ok(ReconcileOutcome::UnknownTour);
    }

    let price = amount_total as f64 / 100.0;
    let result = sqlx::query(
        r#"
        INSERT INTO bookings (id, tour_id, user_id, price, checkout_session_id, paid, created_at)
        VALUES (?, ?, ?, ?, ?, 1, ?)
        ON CONFLICT(checkout_session_id) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(tour_id)
    .bind(&user_id)
    .bind(price)
    .bind(&object.id)
    .bind(chrono::Utc::now().to_rfc3339())
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        Ok(ReconcileOutcome::Duplicate)
    } else {
        Ok(ReconcileOutcome::Created)
    }
}

/// POST /webhooks/payments
pub async fn payment_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, ApiError> {
    let secret = state
        .config
        .payments
        .webhook_secret
        .as_deref()
        .ok_or_else(|| {
            tracing::error!("Webhook received but no webhook secret is configured");
            ApiError::internal("webhook endpoint not configured")
        })?;

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("Payment webhook missing {} header", SIGNATURE_HEADER);
            ApiError::signature("missing signature header")
        })?;

    payments::verify_webhook_signature(
        secret,
        signature,
        &body,
        state.config.payments.signature_tolerance_secs,
        chrono::Utc::now().timestamp(),
    )
    .map_err(|e| {
        tracing::warn!("Payment webhook signature verification failed: {}", e);
        ApiError::signature(format!("webhook signature verification failed: {}", e))
    })?;

    let event: WebhookEvent = serde_json::from_slice(&body).map_err(|e| {
        tracing::error!("Failed to parse payment webhook payload: {}", e);
        ApiError::bad_request("malformed webhook payload")
    })?;

    if event.event_type != CHECKOUT_COMPLETED {
        tracing::debug!(event_type = %event.event_type, "Ignoring webhook event");
        return Ok(Json(WebhookAck { received: true }));
    }

    // Reconciliation failures other than database errors still get a 200:
    // redelivering the same broken event cannot fix it, and a non-2xx
    // would have the provider retry indefinitely.
    match reconcile_booking(&state.db, &event).await? {
        ReconcileOutcome::Created => {
            tracing::info!(event_id = %event.id, session = %event.data.object.id, "Booking created from checkout session");
        }
        ReconcileOutcome::Duplicate => {
            tracing::info!(event_id = %event.id, session = %event.data.object.id, "Duplicate webhook delivery ignored");
        }
        ReconcileOutcome::NoMatchingUser => {
            tracing::error!(event_id = %event.id, "Checkout session completed for unknown user email");
        }
        ReconcileOutcome::UnknownTour => {
            tracing::error!(event_id = %event.id, "Checkout session references unknown tour");
        }
        ReconcileOutcome::MissingField(field) => {
            tracing::error!(event_id = %event.id, field, "Checkout session payload missing field");
        }
    }

    Ok(Json(WebhookAck { received: true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn seed_user_and_tour(pool: &DbPool) {
        sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, created_at, updated_at)
             VALUES ('u1', 'Buyer', 'buyer@example.com', 'hash', '', '')",
        )
        .execute(pool)
        .await
        .unwrap();

        sqlx::query(
            "INSERT INTO tours (id, name, slug, duration, max_group_size, difficulty, price, summary)
             VALUES ('t1', 'Forest Hiker', 'forest-hiker', 5, 25, 'easy', 397.0, 'A hike')",
        )
        .execute(pool)
        .await
        .unwrap();
    }

    fn completed_event(session_id: &str, email: Option<&str>, amount: Option<i64>) -> WebhookEvent {
        serde_json::from_value(serde_json::json!({
            "id": "evt_1",
            "type": "checkout.session.completed",
            "data": {
                "object": {
                    "id": session_id,
                    "client_reference_id": "t1",
                    "customer_email": email,
                    "amount_total": amount,
                }
            }
        }))
        .unwrap()
    }

    async fn booking_count(pool: &DbPool) -> i64 {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bookings")
            .fetch_one(pool)
            .await
            .unwrap();
        count
    }

    #[tokio::test]
    async fn completed_session_creates_exactly_one_booking() {
        let pool = db::init_test().await;
        seed_user_and_tour(&pool).await;

        let event = completed_event("cs_1", Some("buyer@example.com"), Some(39700));
        assert_eq!(
            reconcile_booking(&pool, &event).await.unwrap(),
            ReconcileOutcome::Created
        );

        let (price,): (f64,) = sqlx::query_as("SELECT price FROM bookings")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(price, 397.0);
        assert_eq!(booking_count(&pool).await, 1);
    }

    #[tokio::test]
    async fn duplicate_delivery_is_a_no_op() {
        let pool = db::init_test().await;
        seed_user_and_tour(&pool).await;

        let event = completed_event("cs_dup", Some("buyer@example.com"), Some(39700));
        assert_eq!(
            reconcile_booking(&pool, &event).await.unwrap(),
            ReconcileOutcome::Created
        );
        assert_eq!(
            reconcile_booking(&pool, &event).await.unwrap(),
            ReconcileOutcome::Duplicate
        );
        assert_eq!(booking_count(&pool).await, 1);
    }

    #[tokio::test]
    async fn unknown_user_creates_no_booking() {
        let pool = db::init_test().await;
        seed_user_and_tour(&pool).await;

        let event = completed_event("cs_2", Some("stranger@example.com"), Some(39700));
        assert_eq!(
            reconcile_booking(&pool, &event).await.unwrap(),
            ReconcileOutcome::NoMatchingUser
        );
        assert_eq!(booking_count(&pool).await, 0);
    }

    #[tokio::test]
    async fn missing_fields_create_no_booking() {
        let pool = db::init_test().await;
        seed_user_and_tour(&pool).await;

        let event = completed_event("cs_3", None, Some(39700));
        assert_eq!(
            reconcile_booking(&pool, &event).await.unwrap(),
            ReconcileOutcome::MissingField("customer_email")
        );

        let event = completed_event("cs_4", Some("buyer@example.com"), None);
        assert_eq!(
            reconcile_booking(&pool, &event).await.unwrap(),
            ReconcileOutcome::MissingField("amount_total")
        );
        assert_eq!(booking_count(&pool).await, 0);
    }

    #[tokio::test]
    async fn inactive_user_does_not_match() {
        let pool = db::init_test().await;
        seed_user_and_tour(&pool).await;
        sqlx::query("UPDATE users SET active = 0 WHERE id = 'u1'")
            .execute(&pool)
            .await
            .unwrap();

        let event = completed_event("cs_5", Some("buyer@example.com"), Some(39700));
        assert_eq!(
            reconcile_booking(&pool, &event).await.unwrap(),
            ReconcileOutcome::NoMatchingUser
        );
    }
}
