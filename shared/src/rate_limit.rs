use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const VERIFY_ORDER_WINDOW: Duration = Duration::from_secs(60);
pub const LOG_EVENT_WINDOW: Duration = Duration::from_secs(60);

pub const VERIFY_ORDER_MAX_REQUESTS: u32 = 10;
pub const LOG_EVENT_MAX_REQUESTS: u32 = 120;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitType {
    VerifyOrder,
    LogEvent,
}

impl RateLimitType {
    pub fn get_window(&self) -> Duration {
        match self {
            Self::VerifyOrder => VERIFY_ORDER_WINDOW,
            Self::LogEvent => LOG_EVENT_WINDOW,
        }
    }

    pub fn get_max_attempts(&self) -> u32 {
        match self {
            Self::VerifyOrder => VERIFY_ORDER_MAX_REQUESTS,
            Self::LogEvent => LOG_EVENT_MAX_REQUESTS,
        }
    }

    fn key_segment(&self) -> &'static str {
        match self {
            Self::VerifyOrder => "verify_order",
            Self::LogEvent => "log_event",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitCheck {
    pub current_attempts: u32,
    pub is_locked: bool,
}

impl RateLimitCheck {
    pub fn new(attempts: u32, limit_type: RateLimitType) -> Self {
        Self {
            current_attempts: attempts,
            is_locked: attempts >= limit_type.get_max_attempts(),
        }
    }
}

pub fn get_rate_limit_key(limit_type: RateLimitType, identifier: &str) -> String {
    format!("rate_limit:{}:{}", limit_type.key_segment(), identifier)
}

/// Seconds a client should wait, given the TTL Redis reports for the key.
/// Missing or non-expiring keys fall back to the full window.
pub fn retry_after_secs(limit_type: RateLimitType, ttl: i64) -> u64 {
    if ttl > 0 {
        ttl as u64
    } else {
        limit_type.get_window().as_secs()
    }
}
