use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::{debug_handler, Json};
use chrono::Utc;
use shared::api::{LogEventRequest, LogEventResponse};
use shared::rate_limit::RateLimitType;
use tracing::{debug, warn};

use crate::error::{Error, LogError};
use crate::ledger::LogEntry;
use crate::rate_limit::{check_rate_limit, client_ip};
use crate::AppState;

/// Appends one gameplay event to the log sheet.
#[debug_handler]
pub async fn log_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<LogEventRequest>, JsonRejection>,
) -> Result<Json<LogEventResponse>, LogError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected log event body: {}", rejection.body_text());
        Error::InvalidPayload
    })?;

    check_rate_limit(state.redis.as_ref(), RateLimitType::LogEvent, &client_ip(&headers))
        .await
        .map_err(Error::RateLimited)?;

    let ledger = state.ledger.as_deref().ok_or(Error::Misconfigured)?;

    let header_agent = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");
    let entry = LogEntry::from_request(&request, header_agent, Utc::now());
    ledger.append_log(&entry).await?;

    debug!("Logged {} event", entry.event);
    Ok(Json(LogEventResponse::ok()))
}
