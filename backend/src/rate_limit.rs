use axum::http::HeaderMap;
use redis::Client as RedisClient;
use shared::rate_limit::{get_rate_limit_key, retry_after_secs, RateLimitCheck, RateLimitType};
use tracing::warn;

/// Best guess at the caller's address behind Cloudflare or a reverse proxy.
pub fn client_ip(headers: &HeaderMap) -> String {
    let header = |name: &str| headers.get(name).and_then(|value| value.to_str().ok());

    if let Some(cf_ip) = header("cf-connecting-ip") {
        cf_ip.trim().to_string()
    } else if let Some(forwarded) = header("x-forwarded-for") {
        forwarded.split(',').next().unwrap_or("unknown").trim().to_string()
    } else if let Some(real_ip) = header("x-real-ip") {
        real_ip.trim().to_string()
    } else {
        "unknown".to_string()
    }
}

/// Counts one request against the caller's window.
/// Returns the seconds to wait when the window is used up. Without Redis, or
/// when Redis cannot be reached, every request is let through.
pub async fn check_rate_limit(
    redis: Option<&RedisClient>,
    limit_type: RateLimitType,
    identifier: &str,
) -> Result<(), u64> {
    let Some(client) = redis else {
        return Ok(());
    };

    let mut conn = match client.get_async_connection().await {
        Ok(conn) => conn,
        Err(e) => {
            warn!("Rate limiter unavailable, allowing request: {}", e);
            return Ok(());
        }
    };

    let key = get_rate_limit_key(limit_type, identifier);

    let attempts: Option<u32> = redis::cmd("GET")
        .arg(&key)
        .query_async(&mut conn)
        .await
        .unwrap_or(None);

    let check = RateLimitCheck::new(attempts.unwrap_or(0), limit_type);
    if check.is_locked {
        let ttl: i64 = redis::cmd("TTL")
            .arg(&key)
            .query_async(&mut conn)
            .await
            .unwrap_or(-1);
        return Err(retry_after_secs(limit_type, ttl));
    }

    // Fixed window: the first hit opens it, later hits keep its expiry.
    let current: u32 = redis::cmd("INCR")
        .arg(&key)
        .query_async(&mut conn)
        .await
        .unwrap_or(0);
    if current == 1 {
        let _: () = redis::cmd("EXPIRE")
            .arg(&key)
            .arg(limit_type.get_window().as_secs())
            .query_async(&mut conn)
            .await
            .unwrap_or(());
    }

    Ok(())
}
