use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    models::Product,
    pricing::{self, ProductAttributes},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub base_price: Decimal,
    #[serde(default)]
    pub discount_percentage: Option<Decimal>,
    #[serde(default)]
    pub attributes: Option<ProductAttributes>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub base_price: Option<Decimal>,
    pub discount_percentage: Option<Decimal>,
    pub attributes: Option<ProductAttributes>,
}

/// Catalog view of a product. `display_price` is the discounted base price
/// from the same resolver that prices orders, so the catalog and the
/// checkout never disagree.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub display_price: Decimal,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        let unit = pricing::resolve_price(product.base_price, &product.attributes, "", "");
        let display_price =
            pricing::apply_discount(unit, product.discount_percentage).round_dp(2);
        Self {
            product,
            display_price,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<ProductView>,
}
