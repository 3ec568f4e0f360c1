use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::mail::{SendConfirmationRequest, VerifyOtpRequest},
    error::AppResult,
    response::{ApiResponse, Meta},
    services::mail_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/send-confirmation", post(send_confirmation))
        .route("/verify", post(verify))
}

#[utoipa::path(
    post,
    path = "/api/mail/send-confirmation",
    request_body = SendConfirmationRequest,
    responses(
        (status = 200, description = "Confirmation code sent"),
        (status = 400, description = "Order has no email on file"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Mail relay failure"),
    ),
    tag = "Mail"
)]
pub async fn send_confirmation(
    State(state): State<AppState>,
    Json(payload): Json<SendConfirmationRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let email = mail_service::send_confirmation(&state, payload).await?;
    Ok(Json(ApiResponse::success(
        "Confirmation code sent",
        serde_json::json!({ "email": email }),
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    post,
    path = "/api/mail/verify",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "Email verified"),
        (status = 400, description = "Invalid OTP / OTP expired"),
    ),
    tag = "Mail"
)]
pub async fn verify(
    State(state): State<AppState>,
    Json(payload): Json<VerifyOtpRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    mail_service::verify_otp(&state, payload).await?;
    Ok(Json(ApiResponse::success(
        "Email verified",
        serde_json::json!({ "verified": true }),
        Some(Meta::empty()),
    )))
}
