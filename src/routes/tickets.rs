use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::tickets::{
        AddMessageRequest, CreateTicketRequest, TicketList, TicketWithMessages,
        UpdateTicketStatusRequest,
    },
    error::AppResult,
    middleware::auth::AdminAuth,
    models::{Ticket, TicketMessage},
    response::{ApiResponse, Meta},
    routes::params::TicketListQuery,
    services::ticket_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tickets).post(create_ticket))
        .route("/{id}", get(get_ticket))
        .route("/{id}/messages", post(add_message))
        .route("/{id}/reply", post(reply))
        .route("/{id}/status", patch(update_status))
}

#[utoipa::path(
    post,
    path = "/api/tickets",
    request_body = CreateTicketRequest,
    responses(
        (status = 200, description = "Ticket opened", body = ApiResponse<TicketWithMessages>),
        (status = 400, description = "Missing fields"),
    ),
    tag = "Tickets"
)]
pub async fn create_ticket(
    State(state): State<AppState>,
    Json(payload): Json<CreateTicketRequest>,
) -> AppResult<Json<ApiResponse<TicketWithMessages>>> {
    let data = ticket_service::create_ticket(&state, payload).await?;
    Ok(Json(ApiResponse::success(
        "Ticket created",
        data,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/tickets/{id}",
    params(
        ("id" = Uuid, Path, description = "Ticket ID")
    ),
    responses(
        (status = 200, description = "Ticket with messages", body = ApiResponse<TicketWithMessages>),
        (status = 404, description = "Ticket not found"),
    ),
    tag = "Tickets"
)]
pub async fn get_ticket(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<TicketWithMessages>>> {
    let data = ticket_service::get_ticket(&state, id).await?;
    Ok(Json(ApiResponse::success("OK", data, Some(Meta::empty()))))
}

#[utoipa::path(
    post,
    path = "/api/tickets/{id}/messages",
    params(
        ("id" = Uuid, Path, description = "Ticket ID")
    ),
    request_body = AddMessageRequest,
    responses(
        (status = 200, description = "Customer message appended", body = ApiResponse<TicketMessage>),
        (status = 404, description = "Ticket not found"),
    ),
    tag = "Tickets"
)]
pub async fn add_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddMessageRequest>,
) -> AppResult<Json<ApiResponse<TicketMessage>>> {
    let message = ticket_service::add_message(&state, id, "customer", &payload.body).await?;
    Ok(Json(ApiResponse::success(
        "Message added",
        message,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    post,
    path = "/api/tickets/{id}/reply",
    params(
        ("id" = Uuid, Path, description = "Ticket ID")
    ),
    request_body = AddMessageRequest,
    responses(
        (status = 200, description = "Agent reply appended", body = ApiResponse<TicketMessage>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Ticket not found"),
    ),
    security(("admin_password" = [])),
    tag = "Tickets"
)]
pub async fn reply(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddMessageRequest>,
) -> AppResult<Json<ApiResponse<TicketMessage>>> {
    let message = ticket_service::add_message(&state, id, "agent", &payload.body).await?;
    Ok(Json(ApiResponse::success(
        "Reply added",
        message,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/tickets",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status"),
    ),
    responses(
        (status = 200, description = "List tickets", body = ApiResponse<TicketList>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("admin_password" = [])),
    tag = "Tickets"
)]
pub async fn list_tickets(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Query(query): Query<TicketListQuery>,
) -> AppResult<Json<ApiResponse<TicketList>>> {
    let resp = ticket_service::list_tickets(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/tickets/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Ticket ID")
    ),
    request_body = UpdateTicketStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<Ticket>),
        (status = 400, description = "Unknown status"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Ticket not found"),
    ),
    security(("admin_password" = [])),
    tag = "Tickets"
)]
pub async fn update_status(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTicketStatusRequest>,
) -> AppResult<Json<ApiResponse<Ticket>>> {
    let ticket = ticket_service::update_status(&state, id, &payload.status).await?;
    Ok(Json(ApiResponse::success(
        "Status updated",
        ticket,
        Some(Meta::empty()),
    )))
}
