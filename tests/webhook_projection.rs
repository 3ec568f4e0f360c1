use serde_json::json;

use storefront_api::dto::orders::WebhookEvent;
use storefront_api::models::{OrderStatus, project_payment_status};

#[test]
fn full_gateway_payload_parses() {
    let raw = json!({
        "order": { "order_id": "7ea82675-4ded-4133-95a7-a6efbaf165cc" },
        "payment": { "payment_status": "completed" },
        "event_id": "evt_123",
        "signature": "ignored"
    });

    let event: WebhookEvent = serde_json::from_value(raw).expect("parse");
    assert_eq!(
        event.order.as_ref().and_then(|o| o.order_id.as_deref()),
        Some("7ea82675-4ded-4133-95a7-a6efbaf165cc")
    );
    assert_eq!(
        event.payment.as_ref().and_then(|p| p.payment_status.as_deref()),
        Some("completed")
    );
}

#[test]
fn payload_without_payment_section_parses() {
    let raw = json!({ "order": { "order_id": "abc" } });
    let event: WebhookEvent = serde_json::from_value(raw).expect("parse");
    assert!(event.payment.is_none());
    assert_eq!(
        event.order.as_ref().and_then(|o| o.order_id.as_deref()),
        Some("abc")
    );
}

#[test]
fn empty_payload_parses_to_all_absent() {
    let event: WebhookEvent = serde_json::from_value(json!({})).expect("parse");
    assert!(event.order.is_none());
    assert!(event.payment.is_none());
}

#[test]
fn successful_statuses_project_to_processing_case_insensitively() {
    for status in ["SUCCESS", "success", "Completed", "paid", "PAID"] {
        assert_eq!(
            project_payment_status(Some(status)),
            OrderStatus::Processing,
            "status {status:?}"
        );
    }
}

#[test]
fn unknown_statuses_project_to_pending() {
    for status in [Some("failed"), Some("chargeback"), Some(""), None] {
        assert_eq!(project_payment_status(status), OrderStatus::Pending);
    }
}

#[test]
fn replaying_a_projection_converges() {
    let once = project_payment_status(Some("SUCCESS"));
    for _ in 0..5 {
        assert_eq!(project_payment_status(Some("SUCCESS")), once);
    }
}
