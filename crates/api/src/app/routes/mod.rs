use axum::{
    Router,
    routing::{get, post, put},
};

pub mod admin;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;
pub mod system;

/// Catalog browsing; no session required.
pub fn public_router() -> Router {
    Router::new().nest("/products", products::router())
}

/// Endpoints scoped to the caller's session or user.
pub fn shopper_router() -> Router {
    Router::new()
        .route("/cart", get(cart::get_cart).delete(cart::clear_cart))
        .route("/cart/items", post(cart::add_item))
        .route(
            "/cart/items/:product_id",
            put(cart::update_quantity).delete(cart::remove_item),
        )
        .route("/checkout", post(checkout::checkout))
        .nest("/orders", orders::router())
}
