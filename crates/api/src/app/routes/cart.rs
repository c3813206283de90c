use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::SessionContext;

pub async fn get_cart(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    let cart = services.carts.get(&session.cart_id());
    (StatusCode::OK, Json(dto::cart_to_json(&cart))).into_response()
}

pub async fn add_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Json(body): Json<dto::AddCartItemRequest>,
) -> axum::response::Response {
    let product_id = match errors::parse_product_id(&body.product_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services
        .carts
        .add_item(&session.cart_id(), &product_id, body.quantity)
    {
        Ok(cart) => (StatusCode::OK, Json(dto::cart_to_json(&cart))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_quantity(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(product_id): Path<String>,
    Json(body): Json<dto::UpdateQuantityRequest>,
) -> axum::response::Response {
    let product_id = match errors::parse_product_id(&product_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services
        .carts
        .update_quantity(&session.cart_id(), &product_id, body.quantity)
    {
        Ok(cart) => (StatusCode::OK, Json(dto::cart_to_json(&cart))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn remove_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(product_id): Path<String>,
) -> axum::response::Response {
    let product_id = match errors::parse_product_id(&product_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let cart = services.carts.remove_item(&session.cart_id(), &product_id);
    (StatusCode::OK, Json(dto::cart_to_json(&cart))).into_response()
}

pub async fn clear_cart(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    let cart = services.carts.clear(&session.cart_id());
    (StatusCode::OK, Json(dto::cart_to_json(&cart))).into_response()
}
