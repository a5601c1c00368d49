//! Payment provider integration.
//!
//! Two concerns live here: creating hosted checkout sessions via the
//! provider's HTTP API, and verifying the HMAC signature the provider
//! attaches to webhook deliveries. Verification runs over the *raw*
//! request bytes; parsing and re-serializing the body first would change
//! the byte sequence and break the signature.

use anyhow::{Context, Result};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::config::PaymentsConfig;

type HmacSha256 = Hmac<Sha256>;

/// Webhook event type that triggers booking reconciliation
pub const CHECKOUT_COMPLETED: &str = "checkout.session.completed";

/// Signature header carried on webhook deliveries
pub const SIGNATURE_HEADER: &str = "Stripe-Signature";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("signature header is malformed")]
    Malformed,
    #[error("signature timestamp is outside the tolerance window")]
    TimestampOutOfTolerance,
    #[error("no signature matched the payload")]
    Mismatch,
}

/// Verify a provider webhook signature.
///
/// Header format: `t=<unix seconds>,v1=<hex hmac>[,v1=...]`. The signed
/// message is `"{t}.{raw body}"` and the MAC is HMAC-SHA256 under the
/// shared endpoint secret. `now` is passed in so the tolerance check is
/// deterministic under test.
pub fn verify_webhook_signature(
    secret: &str,
    signature_header: &str,
    payload: &[u8],
    tolerance_secs: i64,
    now: i64,
) -> Result<(), SignatureError> {
    let mut timestamp: Option<i64> = None;
    let mut candidates: Vec<Vec<u8>> = Vec::new();

    for part in signature_header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => {
                timestamp = Some(value.parse().map_err(|_| SignatureError::Malformed)?);
            }
            Some(("v1", value)) => {
                candidates.push(hex::decode(value).map_err(|_| SignatureError::Malformed)?);
            }
            // Unknown schemes (e.g. v0) are ignored, not errors
            Some(_) => {}
            None => return Err(SignatureError::Malformed),
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::Malformed)?;
    if candidates.is_empty() {
        return Err(SignatureError::Malformed);
    }

    if (now - timestamp).abs() > tolerance_secs {
        return Err(SignatureError::TimestampOutOfTolerance);
    }

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| SignatureError::Malformed)?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    let expected = mac.finalize().into_bytes();

    for candidate in &candidates {
        if candidate.len() == expected.len()
            && bool::from(candidate.as_slice().ct_eq(expected.as_slice()))
        {
            return Ok(());
        }
    }

    Err(SignatureError::Mismatch)
}

/// Compute a signature header for a payload. Test helper; this is what
/// the provider does on its side.
#[cfg(test)]
pub fn sign_payload(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes()))
}

// -------------------------------------------------------------------------
// Webhook event payloads
// -------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: WebhookEventData,
}

#[derive(Debug, Deserialize)]
pub struct WebhookEventData {
    pub object: CheckoutSessionObject,
}

/// The completed-session object inside a checkout webhook event
#[derive(Debug, Deserialize)]
pub struct CheckoutSessionObject {
    pub id: String,
    /// Our tour id, set when the session was created
    pub client_reference_id: Option<String>,
    pub customer_email: Option<String>,
    /// Authoritative total in minor currency units
    pub amount_total: Option<i64>,
}

// -------------------------------------------------------------------------
// Checkout session client
// -------------------------------------------------------------------------

/// A hosted checkout session returned by the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    /// Redirect target the customer completes payment at
    pub url: Option<String>,
    pub amount_total: Option<i64>,
}

/// Parameters for creating a checkout session
#[derive(Debug)]
pub struct CheckoutParams<'a> {
    pub tour_id: &'a str,
    pub tour_name: &'a str,
    pub tour_summary: &'a str,
    /// Price in major units; converted to minor units on the wire
    pub price: f64,
    pub customer_email: &'a str,
    pub success_url: &'a str,
    pub cancel_url: &'a str,
}

/// Client for the payment provider's HTTP API
pub struct PaymentClient {
    config: PaymentsConfig,
    client: reqwest::Client,
}

impl PaymentClient {
    pub fn new(config: PaymentsConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.secret_key.is_some()
    }

    /// Create a hosted checkout session for one tour booking.
    /// Returns the provider's session handle; no booking is created here.
    pub async fn create_checkout_session(
        &self,
        params: CheckoutParams<'_>,
    ) -> Result<CheckoutSession> {
        let secret_key = self
            .config
            .secret_key
            .as_ref()
            .context("payment provider secret key not configured")?;

        let unit_amount = (params.price * 100.0).round() as i64;
        let form: Vec<(&str, String)> = vec![
            ("mode", "payment".to_string()),
            ("success_url", params.success_url.to_string()),
            ("cancel_url", params.cancel_url.to_string()),
            ("customer_email", params.customer_email.to_string()),
            ("client_reference_id", params.tour_id.to_string()),
            ("line_items[0][quantity]", "1".to_string()),
            (
                "line_items[0][price_data][currency]",
                self.config.currency.clone(),
            ),
            (
                "line_items[0][price_data][unit_amount]",
                unit_amount.to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]",
                params.tour_name.to_string(),
            ),
            (
                "line_items[0][price_data][product_data][description]",
                params.tour_summary.to_string(),
            ),
        ];

        let response = self
            .client
            .post(format!("{}/v1/checkout/sessions", self.config.api_base))
            .bearer_auth(secret_key)
            .form(&form)
            .send()
            .await
            .context("Failed to reach payment provider")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Payment provider error: {} - {}", status, body);
        }

        response
            .json()
            .await
            .context("Failed to parse checkout session response")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";
    const BODY: &[u8] = br#"{"id":"evt_1","type":"checkout.session.completed"}"#;

    #[test]
    fn valid_signature_passes() {
        let header = sign_payload(SECRET, 1_700_000_000, BODY);
        assert_eq!(
            verify_webhook_signature(SECRET, &header, BODY, 300, 1_700_000_010),
            Ok(())
        );
    }

    #[test]
    fn tampered_payload_fails() {
        let header = sign_payload(SECRET, 1_700_000_000, BODY);
        let tampered = br#"{"id":"evt_1","type":"checkout.session.completed","amount":1}"#;
        assert_eq!(
            verify_webhook_signature(SECRET, &header, tampered, 300, 1_700_000_010),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn wrong_secret_fails() {
        let header = sign_payload("whsec_other", 1_700_000_000, BODY);
        assert_eq!(
            verify_webhook_signature(SECRET, &header, BODY, 300, 1_700_000_010),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn stale_timestamp_fails_even_with_valid_mac() {
        let header = sign_payload(SECRET, 1_700_000_000, BODY);
        assert_eq!(
            verify_webhook_signature(SECRET, &header, BODY, 300, 1_700_000_301),
            Err(SignatureError::TimestampOutOfTolerance)
        );
        // Right at the edge of the window still passes
        assert_eq!(
            verify_webhook_signature(SECRET, &header, BODY, 300, 1_700_000_300),
            Ok(())
        );
    }

    #[test]
    fn one_valid_signature_among_many_passes() {
        let valid = sign_payload(SECRET, 1_700_000_000, BODY);
        let v1 = valid.split("v1=").nth(1).unwrap();
        let header = format!("t=1700000000,v1={},v1={}", "ab".repeat(32), v1);
        assert_eq!(
            verify_webhook_signature(SECRET, &header, BODY, 300, 1_700_000_000),
            Ok(())
        );
    }

    #[test]
    fn malformed_headers_are_rejected() {
        assert_eq!(
            verify_webhook_signature(SECRET, "", BODY, 300, 0),
            Err(SignatureError::Malformed)
        );
        assert_eq!(
            verify_webhook_signature(SECRET, "t=notanumber,v1=aabb", BODY, 300, 0),
            Err(SignatureError::Malformed)
        );
        assert_eq!(
            verify_webhook_signature(SECRET, "v1=aabb", BODY, 300, 0),
            Err(SignatureError::Malformed)
        );
        assert_eq!(
            verify_webhook_signature(SECRET, "t=100", BODY, 300, 100),
            Err(SignatureError::Malformed)
        );
    }

    #[test]
    fn completed_event_parses() {
        let event: WebhookEvent = serde_json::from_slice(
            br#"{
                "id": "evt_123",
                "type": "checkout.session.completed",
                "data": {
                    "object": {
                        "id": "cs_test_1",
                        "client_reference_id": "tour-1",
                        "customer_email": "buyer@example.com",
                        "amount_total": 39700
                    }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(event.event_type, CHECKOUT_COMPLETED);
        assert_eq!(event.data.object.amount_total, Some(39700));
        assert_eq!(event.data.object.client_reference_id.as_deref(), Some("tour-1"));
    }
}
