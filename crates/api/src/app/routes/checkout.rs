use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::SessionContext;

/// Place an order from the caller's cart. Only signed-in users can check out.
pub async fn checkout(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Json(body): Json<dto::CheckoutRequest>,
) -> axum::response::Response {
    let user_id = match session.require_user() {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services
        .checkout
        .checkout(&session.cart_id(), user_id, body.shipping_address)
    {
        Ok(order) => (StatusCode::CREATED, Json(dto::order_to_json(&order))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
