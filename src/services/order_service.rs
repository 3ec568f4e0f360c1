use std::collections::HashMap;

use chrono::Utc;
use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::orders::{
        CreateOrderRequest, OrderCreated, OrderTracking, TrackedItem, WebhookEvent,
    },
    error::{AppError, AppResult},
    models::{Order, OrderItem, OrderStatus, PaymentStatus, Product, project_payment_status},
    pricing::{CartLine, ProductTerms, compute_order_total},
    response::{ApiResponse, Meta},
    services::mail_service,
    state::AppState,
};

/// Computes the authoritative total and persists the order. No external
/// calls happen here; the payment session and OTP issuance are layered on
/// top in [`create_order`].
pub async fn place_order(state: &AppState, payload: &CreateOrderRequest) -> AppResult<Order> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }
    if payload.phone.trim().is_empty() {
        return Err(AppError::BadRequest("phone is required".into()));
    }
    if payload.address.trim().is_empty() {
        return Err(AppError::BadRequest("address is required".into()));
    }
    if payload.items.is_empty() {
        return Err(AppError::BadRequest("order has no items".into()));
    }

    let ids: Vec<Uuid> = payload.items.iter().map(|l| l.product_id).collect();
    let products: Vec<Product> = sqlx::query_as("SELECT * FROM products WHERE id = ANY($1)")
        .bind(&ids)
        .fetch_all(&state.pool)
        .await?;
    let terms: HashMap<Uuid, ProductTerms> =
        products.iter().map(|p| (p.id, p.terms())).collect();

    let lines: Vec<CartLine> = payload
        .items
        .iter()
        .map(|l| CartLine {
            product_id: l.product_id,
            quantity: l.quantity,
            size: l.size.clone(),
            color: l.color.clone(),
        })
        .collect();

    let quote = compute_order_total(&lines, &terms)?;

    let items: Vec<OrderItem> = quote
        .lines
        .iter()
        .map(|l| OrderItem {
            product_id: l.product_id,
            quantity: l.quantity,
            size: l.size.clone(),
            color: l.color.clone(),
        })
        .collect();

    let order: Order = sqlx::query_as(
        r#"
        INSERT INTO orders (id, items, total_amount, status, payment_status, name, email, phone, address)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(Json(&items))
    .bind(quote.total)
    .bind(OrderStatus::Pending.as_str())
    .bind(PaymentStatus::Pending.as_str())
    .bind(payload.name.trim())
    .bind(payload.email.as_deref())
    .bind(payload.phone.trim())
    .bind(payload.address.trim())
    .fetch_one(&state.pool)
    .await?;

    Ok(order)
}

/// Full checkout entry: persist the order, open a gateway payment session
/// for the server-computed total, and kick off OTP issuance when the
/// contact step already supplied an email.
pub async fn create_order(
    state: &AppState,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderCreated>> {
    let order = place_order(state, &payload).await?;

    let session = state
        .payments
        .create_session(
            order.id,
            order.total_amount,
            &order.name,
            order.email.as_deref(),
        )
        .await?;

    sqlx::query("UPDATE orders SET payment_session_id = $2, updated_at = now() WHERE id = $1")
        .bind(order.id)
        .bind(&session.session_id)
        .execute(&state.pool)
        .await?;

    if let Some(email) = order.email.as_deref() {
        // Best effort: the order and payment session already exist, so a
        // mail relay hiccup must not fail the checkout entry.
        if let Err(err) = mail_service::issue_otp(state, email).await {
            tracing::warn!(error = %err, order_id = %order.id, "otp issuance failed after order creation");
        }
    }

    Ok(ApiResponse::success(
        "Order created",
        OrderCreated {
            order_id: order.id,
            payment_session_id: session.session_id,
            checkout_url: session.checkout_url,
        },
        Some(Meta::empty()),
    ))
}

pub async fn get_status(state: &AppState, order_id: Uuid) -> AppResult<String> {
    let row: Option<(String,)> = sqlx::query_as("SELECT status FROM orders WHERE id = $1")
        .bind(order_id)
        .fetch_optional(&state.pool)
        .await?;
    match row {
        Some((status,)) => Ok(status),
        None => Err(AppError::NotFound),
    }
}

pub async fn track_order(state: &AppState, order_id: Uuid) -> AppResult<OrderTracking> {
    let order: Option<Order> = sqlx::query_as("SELECT * FROM orders WHERE id = $1")
        .bind(order_id)
        .fetch_optional(&state.pool)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let ids: Vec<Uuid> = order.items.iter().map(|item| item.product_id).collect();
    let names: Vec<(Uuid, String)> =
        sqlx::query_as("SELECT id, name FROM products WHERE id = ANY($1)")
            .bind(&ids)
            .fetch_all(&state.pool)
            .await?;
    let names: HashMap<Uuid, String> = names.into_iter().collect();

    let items = order
        .items
        .iter()
        .map(|item| TrackedItem {
            product_id: item.product_id,
            name: names.get(&item.product_id).cloned(),
            quantity: item.quantity,
            size: item.size.clone(),
            color: item.color.clone(),
        })
        .collect();

    Ok(OrderTracking { order, items })
}

/// Applies a gateway webhook to the referenced order and returns the
/// projected status. Errors are propagated to the caller, which logs them
/// and still answers 200 so the gateway never retry-storms.
pub async fn apply_webhook(state: &AppState, event: &WebhookEvent) -> AppResult<OrderStatus> {
    let raw_id = event
        .order
        .as_ref()
        .and_then(|o| o.order_id.as_deref())
        .ok_or_else(|| AppError::BadRequest("webhook is missing order id".into()))?;
    let order_id = Uuid::parse_str(raw_id)
        .map_err(|_| AppError::BadRequest(format!("malformed webhook order id {raw_id:?}")))?;

    let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM orders WHERE id = $1")
        .bind(order_id)
        .fetch_optional(&state.pool)
        .await?;
    if exists.is_none() {
        return Err(AppError::NotFound);
    }

    let payment_status = event
        .payment
        .as_ref()
        .and_then(|p| p.payment_status.as_deref());
    let next = project_payment_status(payment_status);
    if next == OrderStatus::Pending {
        tracing::warn!(
            order_id = %order_id,
            payment_status = payment_status.unwrap_or("<absent>"),
            "webhook payment status not recognized as success"
        );
    }

    let payment = match next {
        OrderStatus::Processing => PaymentStatus::Paid,
        _ => PaymentStatus::Pending,
    };

    // Last write wins; the projection is a pure function of the payload, so
    // replaying the same event converges on the same row state.
    sqlx::query(
        "UPDATE orders SET status = $2, payment_status = $3, updated_at = now() WHERE id = $1",
    )
    .bind(order_id)
    .bind(next.as_str())
    .bind(payment.as_str())
    .execute(&state.pool)
    .await?;

    Ok(next)
}

/// Cancels orders that never moved past `pending`/`pending`. A customer
/// abandoning checkout before payment leaves such a row behind.
pub async fn cancel_stale_orders(pool: &DbPool, older_than_hours: i64) -> AppResult<u64> {
    let cutoff = Utc::now() - chrono::Duration::hours(older_than_hours);
    let result = sqlx::query(
        r#"
        UPDATE orders
        SET status = $2, updated_at = now()
        WHERE status = $3 AND payment_status = $4 AND created_at < $1
        "#,
    )
    .bind(cutoff)
    .bind(OrderStatus::Cancelled.as_str())
    .bind(OrderStatus::Pending.as_str())
    .bind(PaymentStatus::Pending.as_str())
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
