//! The spreadsheet that holds eligibility units (one row per unit, order
//! number in the first column) and receives gameplay log rows.

use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};
use shared::api::{DeviceType, LogEventRequest};

use crate::config::LedgerConfig;

pub mod google_auth;
pub mod memory;
pub mod sheets;

pub use memory::MemoryLedger;
pub use sheets::SheetsLedger;

const JST_OFFSET_SECS: i32 = 9 * 3600;

#[derive(Debug)]
pub enum LedgerError {
    Http(reqwest::Error),
    Api { status: u16, message: String },
    Token(jsonwebtoken::errors::Error),
    Malformed(String),
    LogSheetMissing,
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "HTTP error: {}", e),
            Self::Api { status, message } => write!(f, "Sheets API returned {}: {}", status, message),
            Self::Token(e) => write!(f, "Service account token error: {}", e),
            Self::Malformed(what) => write!(f, "Unexpected response: {}", what),
            Self::LogSheetMissing => write!(f, "Log sheet missing"),
        }
    }
}

impl std::error::Error for LedgerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            Self::Token(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for LedgerError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err)
    }
}

impl From<jsonwebtoken::errors::Error> for LedgerError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::Token(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consumption {
    /// One row was removed; `remaining` rows for the same order are left.
    Consumed { remaining: u32 },
    NotFound,
}

/// One row of the log sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: String,
    pub event: String,
    pub details: String,
    pub device: DeviceType,
    pub result: String,
}

impl LogEntry {
    pub const COLUMNS: [&'static str; 5] = ["timestamp", "event", "details", "device", "result"];

    /// `fallback_user_agent` is the request header, used when the body carries none.
    pub fn from_request(request: &LogEventRequest, fallback_user_agent: &str, now: DateTime<Utc>) -> Self {
        let user_agent = if request.user_agent.trim().is_empty() {
            fallback_user_agent
        } else {
            request.user_agent.as_str()
        };
        let details = if request.details.is_null() {
            "{}".to_string()
        } else {
            request.details.to_string()
        };

        Self {
            timestamp: tokyo_timestamp(now),
            event: request.event_type.clone(),
            details,
            device: DeviceType::from_user_agent(user_agent),
            result: request.result.clone().unwrap_or_default(),
        }
    }

    /// Value for a header cell, matched case-insensitively. Unknown columns stay blank.
    pub fn field(&self, column: &str) -> &str {
        match column.trim().to_ascii_lowercase().as_str() {
            "timestamp" => &self.timestamp,
            "event" => &self.event,
            "details" => &self.details,
            "device" => self.device.as_str(),
            "result" => &self.result,
            _ => "",
        }
    }
}

/// Wall-clock time in Japan, e.g. `2024/3/9 7:05:02`.
pub fn tokyo_timestamp(now: DateTime<Utc>) -> String {
    match FixedOffset::east_opt(JST_OFFSET_SECS) {
        Some(jst) => now.with_timezone(&jst).format("%Y/%-m/%-d %-H:%M:%S").to_string(),
        None => now.format("%Y/%-m/%-d %-H:%M:%S").to_string(),
    }
}

pub enum Ledger {
    Sheets(SheetsLedger),
    Memory(MemoryLedger),
}

impl Ledger {
    /// `Ok(None)` when no credentials were configured.
    pub fn from_config(config: &LedgerConfig) -> Result<Option<Self>, LedgerError> {
        match config {
            LedgerConfig::Sheets(sheets) => Ok(Some(Self::Sheets(SheetsLedger::new(sheets)?))),
            LedgerConfig::Memory(orders) => Ok(Some(Self::Memory(MemoryLedger::new(orders.clone())))),
            LedgerConfig::Missing => Ok(None),
        }
    }

    /// Removes one eligibility unit for `order_number`, at most once per unit.
    pub async fn consume_order(&self, order_number: &str) -> Result<Consumption, LedgerError> {
        match self {
            Self::Sheets(ledger) => ledger.consume_order(order_number).await,
            Self::Memory(ledger) => Ok(ledger.consume_order(order_number).await),
        }
    }

    pub async fn append_log(&self, entry: &LogEntry) -> Result<(), LedgerError> {
        match self {
            Self::Sheets(ledger) => ledger.append_log(entry).await,
            Self::Memory(ledger) => ledger.append_log(entry).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn request(details: serde_json::Value, user_agent: &str) -> LogEventRequest {
        LogEventRequest {
            event_type: "SpinResult".to_string(),
            details,
            result: Some("残念、はずれ！".to_string()),
            user_agent: user_agent.to_string(),
        }
    }

    #[test]
    fn test_tokyo_timestamp() {
        let utc = Utc.with_ymd_and_hms(2024, 3, 8, 22, 5, 2).unwrap();
        assert_eq!(tokyo_timestamp(utc), "2024/3/9 7:05:02");
    }

    #[test]
    fn test_log_entry_from_request() {
        let now = Utc.with_ymd_and_hms(2024, 12, 31, 15, 0, 0).unwrap();
        let entry = LogEntry::from_request(
            &request(json!({"category": "LOSE"}), "Mozilla/5.0 (iPhone)"),
            "",
            now,
        );
        assert_eq!(entry.timestamp, "2025/1/1 0:00:00");
        assert_eq!(entry.details, r#"{"category":"LOSE"}"#);
        assert_eq!(entry.device, DeviceType::Mobile);
        assert_eq!(entry.field("Result"), "残念、はずれ！");
        assert_eq!(entry.field("memo"), "");
    }

    #[test]
    fn test_log_entry_defaults() {
        let entry = LogEntry::from_request(&request(serde_json::Value::Null, ""), "Mozilla/5.0 (Android 14)", Utc::now());
        assert_eq!(entry.details, "{}");
        assert_eq!(entry.device, DeviceType::Mobile);
    }
}
