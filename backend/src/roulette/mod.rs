use axum::routing::post;
use axum::Router;

use crate::AppState;

pub mod log_event;
pub mod verify_order;

/// Routes relative to `/api`.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/verify-order", post(verify_order::verify_order))
        .route("/log-event", post(log_event::log_event))
}
