use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use storefront_catalog::CatalogStore;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products))
        .route("/:id", get(get_product))
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> axum::response::Response {
    let query = dto::ProductListParams::from_pairs(pairs).to_query();
    let items = services
        .catalog
        .query(&query)
        .into_iter()
        .map(dto::product_to_json)
        .collect::<Vec<_>>();

    tracing::debug!(?query, count = items.len(), "catalog query");
    (
        StatusCode::OK,
        Json(serde_json::json!({ "count": items.len(), "items": items })),
    )
        .into_response()
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let product_id = match errors::parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.catalog.store().get(&product_id) {
        Some(product) => (StatusCode::OK, Json(dto::product_to_json(product))).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "product not found"),
    }
}
