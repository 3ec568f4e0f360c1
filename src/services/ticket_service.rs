use uuid::Uuid;

use crate::{
    dto::tickets::{CreateTicketRequest, TicketList, TicketWithMessages},
    error::{AppError, AppResult},
    models::{Ticket, TicketMessage, TicketStatus},
    response::{ApiResponse, Meta},
    routes::params::TicketListQuery,
    state::AppState,
};

pub async fn create_ticket(
    state: &AppState,
    payload: CreateTicketRequest,
) -> AppResult<TicketWithMessages> {
    if payload.name.trim().is_empty()
        || payload.email.trim().is_empty()
        || payload.subject.trim().is_empty()
        || payload.message.trim().is_empty()
    {
        return Err(AppError::BadRequest(
            "name, email, subject and message are required".into(),
        ));
    }

    let ticket: Ticket = sqlx::query_as(
        "INSERT INTO tickets (id, name, email, subject) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(payload.name.trim())
    .bind(payload.email.trim())
    .bind(payload.subject.trim())
    .fetch_one(&state.pool)
    .await?;

    let message = insert_message(state, ticket.id, "customer", payload.message.trim()).await?;

    Ok(TicketWithMessages {
        ticket,
        messages: vec![message],
    })
}

pub async fn get_ticket(state: &AppState, id: Uuid) -> AppResult<TicketWithMessages> {
    let ticket: Option<Ticket> = sqlx::query_as("SELECT * FROM tickets WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    let ticket = match ticket {
        Some(t) => t,
        None => return Err(AppError::NotFound),
    };

    let messages: Vec<TicketMessage> = sqlx::query_as(
        "SELECT * FROM ticket_messages WHERE ticket_id = $1 ORDER BY created_at ASC",
    )
    .bind(id)
    .fetch_all(&state.pool)
    .await?;

    Ok(TicketWithMessages { ticket, messages })
}

/// Appends a message. A customer message on an `open` ticket moves it to
/// `in-progress` automatically.
pub async fn add_message(
    state: &AppState,
    id: Uuid,
    sender: &str,
    body: &str,
) -> AppResult<TicketMessage> {
    if body.trim().is_empty() {
        return Err(AppError::BadRequest("message body is required".into()));
    }

    let ticket: Option<Ticket> = sqlx::query_as("SELECT * FROM tickets WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    let ticket = match ticket {
        Some(t) => t,
        None => return Err(AppError::NotFound),
    };

    let message = insert_message(state, ticket.id, sender, body.trim()).await?;

    if sender == "customer" && ticket.status == TicketStatus::Open.as_str() {
        sqlx::query("UPDATE tickets SET status = $2, updated_at = now() WHERE id = $1")
            .bind(ticket.id)
            .bind(TicketStatus::InProgress.as_str())
            .execute(&state.pool)
            .await?;
    }

    Ok(message)
}

pub async fn list_tickets(
    state: &AppState,
    query: TicketListQuery,
) -> AppResult<ApiResponse<TicketList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let status = query.status.filter(|s| !s.is_empty());

    let items: Vec<Ticket> = sqlx::query_as(
        r#"
        SELECT * FROM tickets
        WHERE ($1::text IS NULL OR status = $1)
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(status.as_deref())
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    let total: (i64,) =
        sqlx::query_as("SELECT count(*) FROM tickets WHERE ($1::text IS NULL OR status = $1)")
            .bind(status.as_deref())
            .fetch_one(&state.pool)
            .await?;

    let meta = Meta::new(page, limit, total.0);
    Ok(ApiResponse::success("Tickets", TicketList { items }, Some(meta)))
}

pub async fn update_status(state: &AppState, id: Uuid, status: &str) -> AppResult<Ticket> {
    let status = TicketStatus::parse(status)
        .ok_or_else(|| AppError::BadRequest(format!("unknown ticket status {status:?}")))?;

    let ticket: Option<Ticket> = sqlx::query_as(
        "UPDATE tickets SET status = $2, updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(status.as_str())
    .fetch_optional(&state.pool)
    .await?;

    match ticket {
        Some(t) => Ok(t),
        None => Err(AppError::NotFound),
    }
}

async fn insert_message(
    state: &AppState,
    ticket_id: Uuid,
    sender: &str,
    body: &str,
) -> AppResult<TicketMessage> {
    let message: TicketMessage = sqlx::query_as(
        "INSERT INTO ticket_messages (id, ticket_id, sender, body) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(ticket_id)
    .bind(sender)
    .bind(body)
    .fetch_one(&state.pool)
    .await?;
    Ok(message)
}
