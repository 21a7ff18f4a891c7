use validator::ValidationError;

use crate::constants::{MAX_ORDER_NUMBER_LENGTH, ORDER_NUMBER_FORMAT_ERROR, ORDER_NUMBER_REQUIRED_ERROR};

/// Trims an order number and checks it is worth sending to the ledger.
/// Returns the trimmed value.
pub fn validate_order_number(order_number: &str) -> Result<String, ValidationError> {
    let trimmed = order_number.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new("order_number_required"));
    }
    if trimmed.chars().count() > MAX_ORDER_NUMBER_LENGTH {
        return Err(ValidationError::new("order_number_too_long"));
    }
    if trimmed.chars().any(char::is_control) {
        return Err(ValidationError::new("order_number_invalid_characters"));
    }
    Ok(trimmed.to_string())
}

/// User-facing text for a validation failure from `validate_order_number`.
pub fn order_number_error_message(error: &ValidationError) -> &'static str {
    match error.code.as_ref() {
        "order_number_required" => ORDER_NUMBER_REQUIRED_ERROR,
        _ => ORDER_NUMBER_FORMAT_ERROR,
    }
}
