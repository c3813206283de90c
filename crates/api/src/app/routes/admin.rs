//! Fulfilment endpoints. They act on any order and are not session-scoped;
//! deployments are expected to keep `/admin` off the public network.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/orders/:id/ship", post(ship_order))
        .route("/orders/:id/deliver", post(deliver_order))
}

pub async fn ship_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let order_id = match errors::parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.orders.ship(&order_id) {
        Ok(order) => (StatusCode::OK, Json(dto::order_to_json(&order))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn deliver_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let order_id = match errors::parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.orders.deliver(&order_id) {
        Ok(order) => (StatusCode::OK, Json(dto::order_to_json(&order))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
