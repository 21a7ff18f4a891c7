use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use redis::Client as RedisClient;
use shared::constants::HEALTH_CHECK_ENDPOINT;
use tokio::net::TcpListener;
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::ledger::Ledger;

mod config;
mod error;
mod ledger;
mod logging;
mod rate_limit;
mod roulette;

#[derive(Clone)]
pub struct AppState {
    /// `None` when no spreadsheet credentials are configured.
    pub ledger: Option<Arc<Ledger>>,
    /// `None` disables rate limiting.
    pub redis: Option<RedisClient>,
}

pub async fn health_check() -> &'static str {
    "OK"
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(vec![header::CONTENT_TYPE])
}

pub fn create_app(state: AppState, config: &Config) -> Router {
    let dist = &config.frontend_dist;
    let frontend = ServeDir::new(dist).not_found_service(ServeFile::new(dist.join("index.html")));
    // Trunk hashes asset names, but index.html must always be revalidated.
    let frontend = SetResponseHeaderLayer::if_not_present(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"))
        .layer(frontend);

    Router::new()
        .route(HEALTH_CHECK_ENDPOINT, get(health_check))
        .nest("/api", roulette::create_router())
        .layer(cors_layer(&config.cors_origins))
        .fallback_service(frontend)
        .with_state(state)
}

fn open_ledger(config: &Config) -> Option<Arc<Ledger>> {
    match Ledger::from_config(&config.ledger) {
        Ok(Some(ledger)) => {
            match &ledger {
                Ledger::Sheets(_) => info!("Using Google Sheets ledger"),
                Ledger::Memory(_) => warn!("Using in-memory ledger; consumed orders are lost on restart"),
            }
            Some(Arc::new(ledger))
        }
        Ok(None) => {
            error!("Google Sheets credentials are not set; order verification will fail");
            None
        }
        Err(e) => {
            error!("Could not set up ledger: {}", e);
            None
        }
    }
}

fn open_redis(config: &Config) -> Option<RedisClient> {
    let Some(url) = config.redis_url.as_deref() else {
        info!("REDIS_URL not set; rate limiting disabled");
        return None;
    };
    match RedisClient::open(url) {
        Ok(client) => Some(client),
        Err(e) => {
            warn!("Invalid REDIS_URL, rate limiting disabled: {}", e);
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    logging::setup();

    let config = Config::from_env()?;
    let state = AppState {
        ledger: open_ledger(&config),
        redis: open_redis(&config),
    };
    let app = create_app(state, &config);

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!("listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MemoryLedger;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_config() -> Config {
        Config::from_lookup(|key| match key {
            "LEDGER_BACKEND" => Some("memory".to_string()),
            "FRONTEND_DIST" => Some("does-not-exist".to_string()),
            _ => None,
        })
        .unwrap()
    }

    fn app_with(ledger: Option<Ledger>) -> Router {
        let state = AppState {
            ledger: ledger.map(Arc::new),
            redis: None,
        };
        create_app(state, &test_config())
    }

    fn memory_app(orders: &[&str]) -> Router {
        app_with(Some(Ledger::Memory(MemoryLedger::new(
            orders.iter().map(|o| o.to_string()).collect(),
        ))))
    }

    async fn post_json(app: &Router, uri: &str, body: Value) -> Response {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::USER_AGENT, "Mozilla/5.0 (Macintosh)")
            .body(Body::from(body.to_string()))
            .unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_order_is_consumed_once() {
        let app = memory_app(&["1234-5678"]);

        let first = post_json(&app, "/api/verify-order", json!({"orderNumber": "1234-5678"})).await;
        assert_eq!(first.status(), StatusCode::OK);
        let body = body_json(first).await;
        assert_eq!(body["allowed"], true);
        assert_eq!(body["remaining"], 0);

        let second = post_json(&app, "/api/verify-order", json!({"orderNumber": "1234-5678"})).await;
        assert_eq!(second.status(), StatusCode::OK);
        let body = body_json(second).await;
        assert_eq!(body["allowed"], false);
        assert_eq!(body["error"], shared::constants::INVALID_ORDER_ERROR);
    }

    #[tokio::test]
    async fn test_repeated_rows_report_remaining_spins() {
        let app = memory_app(&["42", "42", "42"]);
        let body = body_json(post_json(&app, "/api/verify-order", json!({"orderNumber": " 42 "})).await).await;
        assert_eq!(body["allowed"], true);
        assert_eq!(body["remaining"], 2);
    }

    #[tokio::test]
    async fn test_missing_order_number() {
        let app = memory_app(&["1234-5678"]);
        for body in [json!({}), json!({"orderNumber": "   "})] {
            let response = post_json(&app, "/api/verify-order", body).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body = body_json(response).await;
            assert_eq!(body["allowed"], false);
            assert_eq!(body["error"], shared::constants::ORDER_NUMBER_REQUIRED_ERROR);
        }
    }

    #[tokio::test]
    async fn test_missing_ledger_is_a_generic_server_error() {
        let app = app_with(None);
        let response = post_json(&app, "/api/verify-order", json!({"orderNumber": "1234-5678"})).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["allowed"], false);
        assert_eq!(body["error"], shared::constants::SERVER_CONFIG_ERROR);
    }

    #[tokio::test]
    async fn test_log_event_appends_row() {
        let ledger = Arc::new(Ledger::Memory(MemoryLedger::new(Vec::new())));
        let app = create_app(
            AppState {
                ledger: Some(ledger.clone()),
                redis: None,
            },
            &test_config(),
        );

        let response = post_json(
            &app,
            "/api/log-event",
            json!({
                "eventType": "SpinResult",
                "details": {"category": "GEISHA"},
                "result": "ゲイシャをプレゼント！",
                "userAgent": "Mozilla/5.0 (iPhone)"
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["success"], true);

        let Ledger::Memory(memory) = ledger.as_ref() else {
            panic!("expected memory ledger");
        };
        let rows = memory.log_entries().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].event, "SpinResult");
        assert_eq!(rows[0].device, shared::api::DeviceType::Mobile);
    }

    #[tokio::test]
    async fn test_log_event_without_log_sheet() {
        let app = app_with(Some(Ledger::Memory(MemoryLedger::without_log_sheet(Vec::new()))));
        let response = post_json(&app, "/api/log-event", json!({"eventType": "CouponCopy", "details": {}})).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Log sheet missing");
    }

    #[tokio::test]
    async fn test_malformed_log_event() {
        let app = memory_app(&[]);
        let response = post_json(&app, "/api/log-event", json!({"details": "no event"})).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["success"], false);
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = memory_app(&[]);
        let request = Request::builder().uri("/api/health_check").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
