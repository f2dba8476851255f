//! Card payment intent slice

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use tracing::info;

use crate::infra::{ClientError, Settings};

use super::{
    NewPaymentIntent, PaymentError, PaymentIntentRequest, PaymentIntentResponse,
    PaymentStatusResponse, SharedProcessor,
};

pub const DEFAULT_CUSTOMER_NAME: &str = "AgriTech Customer";

//------------------------- Web API ----------------------------

pub async fn create_payment_intent_endpoint(
    State(settings): State<Settings>,
    State(processor): State<SharedProcessor>,
    Json(payload): Json<PaymentIntentRequest>,
) -> Result<Json<PaymentIntentResponse>, ClientError> {
    let amount = payload.amount.ok_or(PaymentError::InvalidAmount)?;
    let intent = NewPaymentIntent {
        amount: to_minor_units(amount)?,
        currency: payload
            .currency
            .filter(|currency| !currency.is_empty())
            .unwrap_or_else(|| settings.payments.default_currency.clone()),
        customer_name: payload
            .customer_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CUSTOMER_NAME.to_owned()),
        customer_email: payload.customer_email,
    };

    let created = processor.create_intent(intent).await?;
    let client_secret = created.client_secret.ok_or_else(|| {
        PaymentError::Processor("Payment processor returned no client secret".to_owned())
    })?;
    info!("Created payment intent {}", created.id);

    Ok(Json(PaymentIntentResponse {
        client_secret,
        payment_intent_id: created.id,
        amount,
    }))
}

pub async fn payment_status_endpoint(
    State(processor): State<SharedProcessor>,
    Path(payment_intent_id): Path<String>,
) -> Result<Json<PaymentStatusResponse>, ClientError> {
    let intent = processor.retrieve_intent(&payment_intent_id).await?;
    Ok(Json(PaymentStatusResponse {
        status: intent.status,
        amount: Decimal::new(intent.amount, 2).normalize(),
        currency: intent.currency,
    }))
}

//----------------------- Implementation --------------------------

/// Rupees to paise, rejecting anything under one rupee.
pub fn to_minor_units(amount: Decimal) -> Result<i64, PaymentError> {
    if amount < Decimal::ONE {
        return Err(PaymentError::InvalidAmount);
    }
    (amount * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PaymentError::InvalidAmount)
}

//-------------------------- Tests -------------------------------
