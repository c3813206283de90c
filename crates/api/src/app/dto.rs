use serde::Deserialize;
use serde_json::json;

use storefront_cart::Cart;
use storefront_catalog::{CatalogQuery, Product};
use storefront_orders::{Address, Order};

// -------------------------
// Request DTOs
// -------------------------

/// `GET /products` query string. Values are kept raw so that malformed
/// numbers or unknown sort keys degrade to "not given" instead of a 400.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ProductListParams {
    pub category: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl ProductListParams {
    /// Fold decoded query pairs. The first occurrence of a key wins and unknown
    /// keys are ignored.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "category" => &mut params.category,
                "sort" => &mut params.sort,
                "limit" => &mut params.limit,
                "offset" => &mut params.offset,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }

    pub fn to_query(&self) -> CatalogQuery {
        let number = |raw: &Option<String>| raw.as_deref().and_then(|v| v.trim().parse().ok());
        CatalogQuery::from_params(
            self.category.as_deref(),
            self.sort.as_deref(),
            number(&self.limit),
            number(&self.offset),
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCartItemRequest {
    pub product_id: String,
    pub quantity: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default)]
    pub shipping_address: Address,
}

#[derive(Debug, Default, Deserialize)]
pub struct CancelOrderRequest {
    pub reason: Option<String>,
}

// -------------------------
// Response mapping
// -------------------------

pub fn product_to_json(product: Product) -> serde_json::Value {
    serde_json::to_value(product).unwrap_or(serde_json::Value::Null)
}

pub fn cart_to_json(cart: &Cart) -> serde_json::Value {
    json!({
        "id": cart.id_typed().as_str(),
        "items": cart.items(),
        "itemCount": cart.item_count(),
        "total": cart.total(),
    })
}

pub fn order_to_json(order: &Order) -> serde_json::Value {
    json!({
        "id": order.id_typed().to_string(),
        "userId": order.user_id().map(|id| id.to_string()),
        "items": order.items(),
        "total": order.total(),
        "status": order.status().as_str(),
        "createdAt": order.created_at().map(|t| t.to_rfc3339()),
        "shippingAddress": order.shipping_address(),
    })
}

#[cfg(test)]
mod tests {
    use storefront_cart::{CartId, NewLineItem};
    use storefront_catalog::{Page, SortOrder};

    use super::*;

    fn params(category: &str, sort: &str, limit: &str, offset: &str) -> ProductListParams {
        let opt = |v: &str| (!v.is_empty()).then(|| v.to_string());
        ProductListParams {
            category: opt(category),
            sort: opt(sort),
            limit: opt(limit),
            offset: opt(offset),
        }
    }

    #[test]
    fn params_map_to_catalog_query() {
        let q = params("home", "price-desc", "2", "1").to_query();
        let expected = CatalogQuery::new()
            .category("home")
            .sort(SortOrder::PriceDesc)
            .page(Page::new(1, Some(2)));
        assert_eq!(q, expected);
    }

    #[test]
    fn malformed_params_are_ignored() {
        let q = params("", "cheapest", "lots", "-1").to_query();
        assert_eq!(q, CatalogQuery::new());
    }

    #[test]
    fn repeated_keys_keep_the_first_value() {
        let pairs = [
            ("category", "home"),
            ("sort", "rating"),
            ("category", "clothing"),
            ("sort", "price-asc"),
            ("limit", "2"),
            ("limit", "3"),
            ("page", "9"),
        ]
        .map(|(k, v)| (k.to_string(), v.to_string()));

        let folded = ProductListParams::from_pairs(pairs);

        assert_eq!(folded, params("home", "rating", "2", ""));
        assert_eq!(
            folded.to_query(),
            CatalogQuery::new()
                .category("home")
                .sort(SortOrder::Rating)
                .page(Page::new(0, Some(2)))
        );
    }

    #[test]
    fn cart_json_carries_derived_totals() {
        let mut cart = Cart::empty(CartId::for_session("s-1"));
        cart.add_item(NewLineItem::new("p1", "Lamp", 250).with_quantity(2))
            .unwrap();

        let body = cart_to_json(&cart);

        assert_eq!(body["id"], "session:s-1");
        assert_eq!(body["itemCount"], 2);
        assert_eq!(body["total"], 500);
        assert_eq!(body["items"][0]["productId"], "p1");
    }
}
