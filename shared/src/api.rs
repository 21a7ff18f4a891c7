use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::constants::*;
use crate::game_session::SpinRecord;

// === Verification endpoint ===

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOrderRequest {
    #[serde(default)]
    pub order_number: Option<String>,
}

impl VerifyOrderRequest {
    pub fn new(order_number: impl Into<String>) -> Self {
        Self {
            order_number: Some(order_number.into()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOrderResponse {
    pub allowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

impl VerifyOrderResponse {
    pub fn allowed(remaining: u32) -> Self {
        Self {
            allowed: true,
            remaining: Some(remaining),
            error: None,
            retry_after: None,
        }
    }

    pub fn denied(message: impl Into<String>) -> Self {
        Self {
            allowed: false,
            remaining: None,
            error: Some(message.into()),
            retry_after: None,
        }
    }

    pub fn rate_limited(retry_after_secs: u64) -> Self {
        Self {
            retry_after: Some(retry_after_secs),
            ..Self::denied(rate_limit_message(retry_after_secs))
        }
    }
}

/// What the title screen needs to know about one verification attempt.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pub allowed: bool,
    pub remaining: Option<u32>,
    pub reason: Option<String>,
    pub retry_after: Option<u64>,
}

impl VerificationResult {
    pub fn denied(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            remaining: None,
            reason: Some(reason.into()),
            retry_after: None,
        }
    }

    /// Folds an HTTP exchange with the verification endpoint into a result.
    /// `body` is `None` when the response could not be parsed.
    pub fn from_response(
        status: u16,
        retry_after_header: Option<u64>,
        body: Option<VerifyOrderResponse>,
    ) -> Self {
        if status == 429 {
            let wait = body
                .as_ref()
                .and_then(|b| b.retry_after)
                .or(retry_after_header)
                .unwrap_or(60);
            return Self {
                retry_after: Some(wait),
                ..Self::denied(rate_limit_message(wait))
            };
        }

        match body {
            Some(body) if body.allowed && (200..300).contains(&status) => Self {
                allowed: true,
                remaining: body.remaining,
                reason: None,
                retry_after: None,
            },
            Some(VerifyOrderResponse {
                error: Some(message),
                ..
            }) if !message.trim().is_empty() => Self::denied(message),
            _ if status >= 500 => Self::denied(INTERNAL_SERVER_ERROR),
            _ => Self::denied(AUTH_FAILED_ERROR),
        }
    }
}

// === Logging endpoint ===

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogEventRequest {
    pub event_type: String,
    #[serde(default)]
    pub details: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default)]
    pub user_agent: String,
}

impl LogEventRequest {
    pub fn spin_result(record: &SpinRecord, user_agent: impl Into<String>) -> Self {
        Self {
            event_type: EVENT_SPIN_RESULT.to_string(),
            details: json!({
                "category": record.category,
                "prizeId": record.prize_id,
                "forced": record.forced,
                "remainingSpins": record.remaining_spins,
            }),
            result: Some(record.label.clone()),
            user_agent: user_agent.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LogEventResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LogEventResponse {
    pub fn ok() -> Self {
        Self { success: true, error: None }
    }

    pub fn failed() -> Self {
        Self { success: false, error: None }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum DeviceType {
    Mobile,
    Desktop,
}

static MOBILE_AGENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)iPhone|iPad|iPod|Android").expect("valid user agent pattern"));

impl DeviceType {
    pub fn from_user_agent(user_agent: &str) -> Self {
        if MOBILE_AGENT.is_match(user_agent) {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mobile => "Mobile",
            Self::Desktop => "Desktop",
        }
    }
}
