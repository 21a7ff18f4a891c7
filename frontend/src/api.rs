use gloo_net::http::Request;
use serde_json::Value;
use shared::api::{LogEventRequest, VerificationResult, VerifyOrderRequest, VerifyOrderResponse};
use shared::constants::{LOG_EVENT_ENDPOINT, NETWORK_ERROR, VERIFY_ORDER_ENDPOINT};
use shared::game_session::SpinRecord;
use shared::validation::{order_number_error_message, validate_order_number};
use wasm_bindgen_futures::spawn_local;

use crate::config::{endpoint, user_agent};

/// Consumes one eligibility unit for `order_number`.
/// Every failure comes back as a denied result with a reason to show.
pub async fn verify_order(order_number: &str) -> VerificationResult {
    let order_number = match validate_order_number(order_number) {
        Ok(order_number) => order_number,
        Err(e) => return VerificationResult::denied(order_number_error_message(&e)),
    };

    let request = match Request::post(&endpoint(VERIFY_ORDER_ENDPOINT)).json(&VerifyOrderRequest::new(order_number)) {
        Ok(request) => request,
        Err(e) => {
            log::error!("Failed to build verification request: {:?}", e);
            return VerificationResult::denied(NETWORK_ERROR);
        }
    };

    match request.send().await {
        Ok(response) => {
            let status = response.status();
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|value| value.trim().parse::<u64>().ok());
            let body = response.json::<VerifyOrderResponse>().await.ok();
            VerificationResult::from_response(status, retry_after, body)
        }
        Err(e) => {
            log::warn!("Verification request failed: {:?}", e);
            VerificationResult::denied(NETWORK_ERROR)
        }
    }
}

/// Fire-and-forget telemetry. Failures are logged to the console and dropped.
pub fn log_event(event_type: &str, details: Value, result: Option<String>) {
    send_log(LogEventRequest {
        event_type: event_type.to_string(),
        details,
        result,
        user_agent: user_agent(),
    });
}

pub fn log_spin_result(record: &SpinRecord) {
    send_log(LogEventRequest::spin_result(record, user_agent()));
}

fn send_log(event: LogEventRequest) {
    spawn_local(async move {
        let request = match Request::post(&endpoint(LOG_EVENT_ENDPOINT)).json(&event) {
            Ok(request) => request,
            Err(e) => {
                log::warn!("Dropping {} event: {:?}", event.event_type, e);
                return;
            }
        };
        match request.send().await {
            Ok(response) if !response.ok() => {
                log::warn!("Log endpoint answered {} for {}", response.status(), event.event_type);
            }
            Ok(_) => {}
            Err(e) => log::warn!("Dropping {} event: {:?}", event.event_type, e),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use shared::constants::{MAX_ORDER_NUMBER_LENGTH, ORDER_NUMBER_FORMAT_ERROR, ORDER_NUMBER_REQUIRED_ERROR};

    // Runs natively: any attempt to reach gloo-net here would panic outside a browser.
    #[test]
    fn test_blank_order_number_is_denied_before_sending() {
        let result = block_on(verify_order("   "));
        assert!(!result.allowed);
        assert_eq!(result.reason.as_deref(), Some(ORDER_NUMBER_REQUIRED_ERROR));
        assert!(result.remaining.is_none());
    }

    #[test]
    fn test_oversized_order_number_is_denied_before_sending() {
        let result = block_on(verify_order(&"7".repeat(MAX_ORDER_NUMBER_LENGTH + 1)));
        assert!(!result.allowed);
        assert_eq!(result.reason.as_deref(), Some(ORDER_NUMBER_FORMAT_ERROR));
    }
}
