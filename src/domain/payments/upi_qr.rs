//! UPI QR slice

use axum::{Json, extract::State};
use base64::Engine;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use qrcode::{QrCode, render::svg};
use rust_decimal::Decimal;

use crate::infra::{ClientError, Settings, UpiSettings};

use super::{PaymentError, QrRequest, QrResponse};

/// Everything but the characters a URI component may carry unescaped.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

//------------------------- Web API ----------------------------

pub async fn generate_qr_endpoint(
    State(settings): State<Settings>,
    Json(payload): Json<QrRequest>,
) -> Result<Json<QrResponse>, ClientError> {
    let upi = &settings.upi;
    let payee = payload
        .upi_id
        .filter(|upi_id| !upi_id.trim().is_empty())
        .unwrap_or_else(|| upi.merchant_upi_id.clone());
    let payee_name = payload
        .name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| upi.merchant_name.clone());

    let upi_string = upi_payment_link(&payee, &payee_name, payload.amount);
    let qr_image = render_qr_data_url(&upi_string, upi)?;

    Ok(Json(QrResponse {
        qr_image,
        upi_string,
    }))
}

//----------------------- Implementation --------------------------

/// Standard UPI deep link. A missing amount leaves `am` empty so the payer types it in.
pub fn upi_payment_link(payee: &str, payee_name: &str, amount: Option<Decimal>) -> String {
    let amount = amount
        .map(|amount| amount.normalize().to_string())
        .unwrap_or_default();
    format!(
        "upi://pay?pa={payee}&pn={}&am={amount}&cu=INR",
        utf8_percent_encode(payee_name, URI_COMPONENT)
    )
}

/// Renders `content` as an SVG QR code and wraps it in a base64 data URL.
pub fn render_qr_data_url(content: &str, settings: &UpiSettings) -> Result<String, PaymentError> {
    let code = QrCode::new(content.as_bytes())
        .map_err(|e| PaymentError::QrGeneration(e.to_string()))?;
    let image = code
        .render::<svg::Color>()
        .min_dimensions(settings.qr_size, settings.qr_size)
        .dark_color(svg::Color(&settings.dark_color))
        .light_color(svg::Color(&settings.light_color))
        .quiet_zone(true)
        .build();
    let encoded = base64::engine::general_purpose::STANDARD.encode(image);
    Ok(format!("data:image/svg+xml;base64,{encoded}"))
}

//-------------------------- Tests -------------------------------
