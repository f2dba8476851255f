//! Processor webhook slice

use axum::{Json, body::Bytes, extract::State, http::HeaderMap};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{info, warn};

use crate::infra::{ClientError, Settings};

use super::{WebhookAck, WebhookError};

pub const SIGNATURE_HEADER: &str = "stripe-signature";

type HmacSha256 = Hmac<Sha256>;

//------------------------- Web API ----------------------------

pub async fn webhook_endpoint(
    State(settings): State<Settings>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, ClientError> {
    // Without a shared secret events cannot be trusted, so they are acknowledged unread.
    let Some(secret) = settings
        .payments
        .webhook_secret
        .as_deref()
        .filter(|secret| !secret.is_empty())
    else {
        return Ok(Json(WebhookAck { received: true }));
    };

    let event = headers
        .get(SIGNATURE_HEADER)
        .ok_or(WebhookError::MissingSignature)
        .and_then(|header| header.to_str().map_err(|_| WebhookError::MalformedSignature))
        .and_then(|header| {
            construct_event(
                &body,
                header,
                secret,
                settings.payments.webhook_tolerance_secs,
                jiff::Timestamp::now().as_second(),
            )
        })
        .inspect_err(|e| warn!("Rejected webhook: {e}"))?;

    match event.kind.as_str() {
        "payment_intent.succeeded" => info!("Payment succeeded: {}", event.data.object.id),
        "payment_intent.payment_failed" => warn!("Payment failed: {}", event.data.object.id),
        other => info!("Unhandled webhook event: {other}"),
    }
    Ok(Json(WebhookAck { received: true }))
}

//----------------------- Implementation --------------------------

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: WebhookEventData,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct WebhookEventData {
    pub object: WebhookObject,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct WebhookObject {
    pub id: String,
}

/// Verifies the signature header and only then parses the payload.
pub fn construct_event(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_secs: i64,
    now: i64,
) -> Result<WebhookEvent, WebhookError> {
    verify_signature(payload, header, secret, tolerance_secs, now)?;
    serde_json::from_slice(payload).map_err(|e| WebhookError::InvalidPayload(e.to_string()))
}

/// Checks a `t=<unix>,v1=<hex>` header. Any one matching `v1` signature is enough.
pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_secs: i64,
    now: i64,
) -> Result<(), WebhookError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();
    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse::<i64>().ok(),
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }
    let timestamp = timestamp.ok_or(WebhookError::MalformedSignature)?;
    if signatures.is_empty() {
        return Err(WebhookError::MalformedSignature);
    }

    let matched = signatures.iter().any(|signature| {
        let Ok(expected) = hex::decode(signature) else {
            return false;
        };
        signing_mac(payload, secret, timestamp)
            .is_some_and(|mac| mac.verify_slice(&expected).is_ok())
    });
    if !matched {
        return Err(WebhookError::SignatureMismatch);
    }

    if tolerance_secs > 0 && (now - timestamp).abs() > tolerance_secs {
        return Err(WebhookError::TimestampOutsideTolerance);
    }
    Ok(())
}

/// Builds a header value the way the processor signs its events.
pub fn sign_payload(payload: &[u8], secret: &str, timestamp: i64) -> String {
    let signature = signing_mac(payload, secret, timestamp)
        .map(|mac| hex::encode(mac.finalize().into_bytes()))
        .unwrap_or_default();
    format!("t={timestamp},v1={signature}")
}

fn signing_mac(payload: &[u8], secret: &str, timestamp: i64) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Some(mac)
}

//-------------------------- Tests -------------------------------
