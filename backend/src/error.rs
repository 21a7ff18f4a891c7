use std::fmt;

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use shared::api::{LogEventResponse, VerifyOrderResponse};
use shared::constants::{
    rate_limit_message, INTERNAL_SERVER_ERROR, INVALID_REQUEST_ERROR, LOG_SHEET_MISSING_ERROR,
    ORDER_NUMBER_REQUIRED_ERROR, SERVER_CONFIG_ERROR,
};

use crate::ledger::LedgerError;

#[derive(Debug)]
pub enum Error {
    MissingOrderNumber,
    InvalidOrderNumber(&'static str),
    InvalidPayload,
    RateLimited(u64),
    Misconfigured,
    Ledger(LedgerError),
    LogSheetMissing,
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingOrderNumber | Self::InvalidOrderNumber(_) | Self::InvalidPayload => {
                StatusCode::BAD_REQUEST
            }
            Self::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::Misconfigured | Self::Ledger(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::LogSheetMissing => StatusCode::NOT_FOUND,
        }
    }

    /// Text safe to show a player. Ledger and configuration details stay in the server log.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingOrderNumber => ORDER_NUMBER_REQUIRED_ERROR.to_string(),
            Self::InvalidOrderNumber(message) => message.to_string(),
            Self::InvalidPayload => INVALID_REQUEST_ERROR.to_string(),
            Self::RateLimited(secs) => rate_limit_message(*secs),
            Self::Misconfigured => SERVER_CONFIG_ERROR.to_string(),
            Self::Ledger(_) => INTERNAL_SERVER_ERROR.to_string(),
            Self::LogSheetMissing => LOG_SHEET_MISSING_ERROR.to_string(),
        }
    }

    fn retry_after(&self) -> Option<u64> {
        match self {
            Self::RateLimited(secs) => Some(*secs),
            _ => None,
        }
    }

    fn trace(&self) {
        match self {
            Self::Misconfigured => tracing::error!("Ledger is not configured"),
            Self::Ledger(e) => tracing::error!("Ledger request failed: {}", e),
            Self::LogSheetMissing => tracing::warn!("Spreadsheet has no log sheet"),
            _ => {}
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingOrderNumber => write!(f, "Order number missing"),
            Self::InvalidOrderNumber(message) => write!(f, "Invalid order number: {}", message),
            Self::InvalidPayload => write!(f, "Request body is not valid JSON for this endpoint"),
            Self::RateLimited(secs) => write!(f, "Rate limited for {}s", secs),
            Self::Misconfigured => write!(f, "Ledger not configured"),
            Self::Ledger(e) => write!(f, "Ledger error: {}", e),
            Self::LogSheetMissing => write!(f, "Log sheet missing"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Ledger(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LedgerError> for Error {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::LogSheetMissing => Self::LogSheetMissing,
            other => Self::Ledger(other),
        }
    }
}

fn with_retry_after(mut response: Response, retry_after: Option<u64>) -> Response {
    if let Some(secs) = retry_after {
        if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }
    }
    response
}

/// Error rendered in the verification endpoint's `{allowed, error}` shape.
#[derive(Debug)]
pub struct VerifyError(pub Error);

impl From<Error> for VerifyError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl From<LedgerError> for VerifyError {
    fn from(err: LedgerError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for VerifyError {
    fn into_response(self) -> Response {
        let err = self.0;
        err.trace();
        let body = match err.retry_after() {
            Some(secs) => VerifyOrderResponse::rate_limited(secs),
            None => VerifyOrderResponse::denied(err.user_message()),
        };
        with_retry_after((err.status(), Json(body)).into_response(), err.retry_after())
    }
}

/// Error rendered in the logging endpoint's `{success, error}` shape.
#[derive(Debug)]
pub struct LogError(pub Error);

impl From<Error> for LogError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl From<LedgerError> for LogError {
    fn from(err: LedgerError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for LogError {
    fn into_response(self) -> Response {
        let err = self.0;
        err.trace();
        let body = match err {
            Error::LogSheetMissing => LogEventResponse {
                success: false,
                error: Some(err.user_message()),
            },
            _ => LogEventResponse::failed(),
        };
        with_retry_after((err.status(), Json(body)).into_response(), err.retry_after())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::MissingOrderNumber.status(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::RateLimited(3).status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(Error::Misconfigured.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(Error::LogSheetMissing.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_ledger_details_are_not_shown_to_players() {
        let err = Error::from(LedgerError::Api {
            status: 403,
            message: "The caller does not have permission".to_string(),
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.user_message().contains("permission"));
    }

    #[test]
    fn test_missing_log_sheet_is_its_own_error() {
        assert!(matches!(Error::from(LedgerError::LogSheetMissing), Error::LogSheetMissing));
    }

    #[test]
    fn test_rate_limited_response_sets_retry_after() {
        let response = VerifyError(Error::RateLimited(42)).into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "42");
    }
}
