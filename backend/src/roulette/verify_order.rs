use axum::extract::State;
use axum::http::HeaderMap;
use axum::{debug_handler, Json};
use shared::api::{VerifyOrderRequest, VerifyOrderResponse};
use shared::constants::INVALID_ORDER_ERROR;
use shared::rate_limit::RateLimitType;
use shared::validation::{order_number_error_message, validate_order_number};
use tracing::info;

use crate::error::{Error, VerifyError};
use crate::ledger::Consumption;
use crate::rate_limit::{check_rate_limit, client_ip};
use crate::AppState;

/// Consumes one eligibility unit for the posted order number.
#[debug_handler]
pub async fn verify_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Option<Json<VerifyOrderRequest>>,
) -> Result<Json<VerifyOrderResponse>, VerifyError> {
    let raw = payload
        .and_then(|Json(request)| request.order_number)
        .unwrap_or_default();
    let order_number = validate_order_number(&raw).map_err(|e| match e.code.as_ref() {
        "order_number_required" => Error::MissingOrderNumber,
        _ => Error::InvalidOrderNumber(order_number_error_message(&e)),
    })?;

    let ip = client_ip(&headers);
    check_rate_limit(state.redis.as_ref(), RateLimitType::VerifyOrder, &ip)
        .await
        .map_err(Error::RateLimited)?;

    let ledger = state.ledger.as_deref().ok_or(Error::Misconfigured)?;

    match ledger.consume_order(&order_number).await? {
        Consumption::Consumed { remaining } => {
            info!("Order verified from {} ({} spins left)", ip, remaining);
            Ok(Json(VerifyOrderResponse::allowed(remaining)))
        }
        Consumption::NotFound => {
            info!("Unknown or used order number from {}", ip);
            Ok(Json(VerifyOrderResponse::denied(INVALID_ORDER_ERROR)))
        }
    }
}
