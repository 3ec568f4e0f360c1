use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Order;

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderLineRequest {
    pub product_id: Uuid,
    /// Defaults to 1 when omitted; explicit 0 or negative is rejected.
    pub quantity: Option<i64>,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
}

/// Checkout entry point. There is deliberately no total field: the order
/// total is always recomputed server-side.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub address: String,
    pub items: Vec<OrderLineRequest>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderCreated {
    pub order_id: Uuid,
    pub payment_session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout_url: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderStatusRequest {
    pub order_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderStatusResponse {
    pub status: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TrackOrderRequest {
    pub order_id: Uuid,
}

/// Line view on the tracking page: item snapshot joined with the current
/// product name, which may have been deleted since the order was placed.
#[derive(Debug, Serialize, ToSchema)]
pub struct TrackedItem {
    pub product_id: Uuid,
    pub name: Option<String>,
    pub quantity: i64,
    pub size: String,
    pub color: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderTracking {
    pub order: Order,
    pub items: Vec<TrackedItem>,
}

/// Gateway webhook payload. All fields are optional at the wire level;
/// validation happens in the handler so a malformed event can be logged
/// without surfacing an error to the gateway.
#[derive(Debug, Deserialize, ToSchema)]
pub struct WebhookEvent {
    #[serde(default)]
    pub order: Option<WebhookOrder>,
    #[serde(default)]
    pub payment: Option<WebhookPayment>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct WebhookOrder {
    #[serde(default)]
    pub order_id: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct WebhookPayment {
    #[serde(default)]
    pub payment_status: Option<String>,
}
