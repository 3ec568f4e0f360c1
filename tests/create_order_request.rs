use serde_json::json;

use storefront_api::dto::orders::CreateOrderRequest;

// The checkout payload has no total field at all; a client asserting one
// sees it silently dropped, so the persisted amount can only ever come from
// the server-side computation.
#[test]
fn client_supplied_totals_are_dropped_at_the_boundary() {
    let raw = json!({
        "name": "Ada",
        "phone": "555-0100",
        "address": "1 Main St",
        "total": "0.01",
        "totalAmount": 0.01,
        "items": [
            { "product_id": "7ea82675-4ded-4133-95a7-a6efbaf165cc", "quantity": 2, "size": "L", "color": "Red" }
        ]
    });

    let payload: CreateOrderRequest = serde_json::from_value(raw).expect("parse");
    assert_eq!(payload.items.len(), 1);
    assert_eq!(payload.items[0].quantity, Some(2));
}

#[test]
fn quantity_size_and_color_are_optional_on_the_wire() {
    let raw = json!({
        "name": "Ada",
        "phone": "555-0100",
        "address": "1 Main St",
        "items": [
            { "product_id": "7ea82675-4ded-4133-95a7-a6efbaf165cc" }
        ]
    });

    let payload: CreateOrderRequest = serde_json::from_value(raw).expect("parse");
    assert_eq!(payload.items[0].quantity, None);
    assert_eq!(payload.items[0].size, "");
    assert_eq!(payload.items[0].color, "");
}
