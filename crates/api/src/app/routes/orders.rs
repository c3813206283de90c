use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::SessionContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_orders))
        .route("/:id", get(get_order))
        .route("/:id/cancel", post(cancel_order))
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    let user_id = match session.require_user() {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let items = services
        .orders
        .list_for_user(user_id)
        .iter()
        .map(dto::order_to_json)
        .collect::<Vec<_>>();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let user_id = match session.require_user() {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let order_id = match errors::parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.orders.get_for_user(&order_id, user_id) {
        Ok(order) => (StatusCode::OK, Json(dto::order_to_json(&order))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Cancel one of the caller's orders. The JSON body (`{"reason": ...}`) is optional.
pub async fn cancel_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<String>,
    body: Option<Json<dto::CancelOrderRequest>>,
) -> axum::response::Response {
    let user_id = match session.require_user() {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let order_id = match errors::parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let reason = body.and_then(|Json(b)| b.reason);

    match services.orders.cancel(&order_id, user_id, reason) {
        Ok(order) => (StatusCode::OK, Json(dto::order_to_json(&order))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
