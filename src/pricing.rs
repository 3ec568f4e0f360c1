//! Cart pricing: attribute-dependent unit prices, percentage discounts and
//! the authoritative order total.
//!
//! The total computed here is the only amount ever persisted or sent to the
//! payment gateway; client-supplied totals are never read.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// One entry of a product's per-size or per-color attribute list. A present
/// `price` overrides the product base price for selections of this value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AttributeEntry {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductAttributes {
    #[serde(default)]
    pub size: Vec<AttributeEntry>,
    #[serde(default)]
    pub color: Vec<AttributeEntry>,
}

/// The pricing-relevant slice of a catalog product.
#[derive(Debug, Clone)]
pub struct ProductTerms {
    pub base_price: Decimal,
    pub discount_percentage: Decimal,
    pub attributes: ProductAttributes,
}

/// One requested cart line. `quantity` defaults to 1 when absent; an
/// explicit zero or negative quantity is rejected.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub product_id: Uuid,
    pub quantity: Option<i64>,
    pub size: String,
    pub color: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    #[error("product {0} not found")]
    ProductNotFound(Uuid),

    #[error("product {product_id} requires a {axis} selection")]
    MissingSelection { product_id: Uuid, axis: &'static str },

    #[error("invalid quantity {quantity} for product {product_id}")]
    InvalidQuantity { product_id: Uuid, quantity: i64 },
}

/// A priced cart line as resolved at order-creation time. Unit prices are
/// kept unrounded; rounding happens once on the order total.
#[derive(Debug, Clone)]
pub struct ResolvedLine {
    pub product_id: Uuid,
    pub quantity: i64,
    pub size: String,
    pub color: String,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

#[derive(Debug, Clone)]
pub struct Quote {
    pub total: Decimal,
    pub lines: Vec<ResolvedLine>,
}

/// Effective unit price for a (size, color) selection.
///
/// Overrides apply in evaluation order with the later one winning: a size
/// override replaces the base price, a color override replaces either. The
/// same policy is used for order pricing and catalog display pricing.
pub fn resolve_price(
    base_price: Decimal,
    attributes: &ProductAttributes,
    size: &str,
    color: &str,
) -> Decimal {
    let mut price = base_price;
    if let Some(entry) = attributes.size.iter().find(|e| e.value == size) {
        if let Some(p) = entry.price {
            price = p;
        }
    }
    if let Some(entry) = attributes.color.iter().find(|e| e.value == color) {
        if let Some(p) = entry.price {
            price = p;
        }
    }
    price
}

/// Applies a percentage discount without rounding. The [0, 100] bound on
/// `discount_percentage` is a catalog invariant enforced at write time.
pub fn apply_discount(unit_price: Decimal, discount_percentage: Decimal) -> Decimal {
    unit_price * (Decimal::ONE - discount_percentage / Decimal::ONE_HUNDRED)
}

/// Computes the authoritative order total over all cart lines.
///
/// Any failing line aborts the whole computation; there are no partial
/// orders. The total is rounded to two decimal places exactly once, after
/// summation.
pub fn compute_order_total(
    lines: &[CartLine],
    products: &HashMap<Uuid, ProductTerms>,
) -> Result<Quote, PricingError> {
    let mut total = Decimal::ZERO;
    let mut resolved = Vec::with_capacity(lines.len());

    for line in lines {
        let product = products
            .get(&line.product_id)
            .ok_or(PricingError::ProductNotFound(line.product_id))?;

        if !product.attributes.size.is_empty() && line.size.is_empty() {
            return Err(PricingError::MissingSelection {
                product_id: line.product_id,
                axis: "size",
            });
        }
        if !product.attributes.color.is_empty() && line.color.is_empty() {
            return Err(PricingError::MissingSelection {
                product_id: line.product_id,
                axis: "color",
            });
        }

        let quantity = match line.quantity {
            None => 1,
            Some(q) if q >= 1 => q,
            Some(q) => {
                return Err(PricingError::InvalidQuantity {
                    product_id: line.product_id,
                    quantity: q,
                });
            }
        };

        let unit_price = resolve_price(
            product.base_price,
            &product.attributes,
            &line.size,
            &line.color,
        );
        let discounted = apply_discount(unit_price, product.discount_percentage);
        let line_total = discounted * Decimal::from(quantity);
        total += line_total;

        resolved.push(ResolvedLine {
            product_id: line.product_id,
            quantity,
            size: line.size.clone(),
            color: line.color.clone(),
            unit_price,
            line_total,
        });
    }

    Ok(Quote {
        total: total.round_dp(2),
        lines: resolved,
    })
}
