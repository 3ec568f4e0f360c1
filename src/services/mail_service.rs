use chrono::{Duration, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::{
    dto::mail::{SendConfirmationRequest, VerifyOtpRequest},
    error::{AppError, AppResult},
    models::MailVerification,
    state::AppState,
};

const OTP_TTL_MINUTES: i64 = 15;

fn generate_otp() -> String {
    format!("{:06}", rand::thread_rng().gen_range(0..1_000_000))
}

/// Issues a fresh 6-digit code for the address, replacing any outstanding
/// one, and mails it through the relay.
pub async fn issue_otp(state: &AppState, email: &str) -> AppResult<()> {
    let otp = generate_otp();
    let expires_at = Utc::now() + Duration::minutes(OTP_TTL_MINUTES);

    // One outstanding code per address.
    sqlx::query("DELETE FROM mail_verifications WHERE email = $1")
        .bind(email)
        .execute(&state.pool)
        .await?;
    sqlx::query(
        "INSERT INTO mail_verifications (id, email, otp, expires_at) VALUES ($1, $2, $3, $4)",
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(&otp)
    .bind(expires_at)
    .execute(&state.pool)
    .await?;

    state
        .mailer
        .send(
            email,
            "Confirm your order",
            &format!("Your confirmation code is {otp}. It expires in {OTP_TTL_MINUTES} minutes."),
        )
        .await?;

    Ok(())
}

/// Handles `/mail/send-confirmation`: resolves the order's email (the
/// payload may supply one for orders created without it) and issues a code.
pub async fn send_confirmation(
    state: &AppState,
    payload: SendConfirmationRequest,
) -> AppResult<String> {
    let order_email: Option<(Option<String>,)> =
        sqlx::query_as("SELECT email FROM orders WHERE id = $1")
            .bind(payload.order_id)
            .fetch_optional(&state.pool)
            .await?;
    let order_email = match order_email {
        Some((email,)) => email,
        None => return Err(AppError::NotFound),
    };

    let email = match payload.email.as_deref().filter(|e| !e.trim().is_empty()) {
        Some(supplied) => {
            if order_email.as_deref() != Some(supplied) {
                sqlx::query("UPDATE orders SET email = $2, updated_at = now() WHERE id = $1")
                    .bind(payload.order_id)
                    .bind(supplied)
                    .execute(&state.pool)
                    .await?;
            }
            supplied.to_string()
        }
        None => order_email
            .ok_or_else(|| AppError::BadRequest("order has no email on file".into()))?,
    };

    issue_otp(state, &email).await?;
    Ok(email)
}

/// Verifies `(email, otp)`. The record is single-use: it is deleted both on
/// success and on expiry detection, so a matched code can never be
/// replayed.
pub async fn verify_otp(state: &AppState, payload: VerifyOtpRequest) -> AppResult<()> {
    let record: Option<MailVerification> =
        sqlx::query_as("SELECT * FROM mail_verifications WHERE email = $1 AND otp = $2")
            .bind(&payload.email)
            .bind(&payload.otp)
            .fetch_optional(&state.pool)
            .await?;

    let record = match record {
        Some(r) => r,
        None => return Err(AppError::BadRequest("Invalid OTP".into())),
    };

    sqlx::query("DELETE FROM mail_verifications WHERE id = $1")
        .bind(record.id)
        .execute(&state.pool)
        .await?;

    if Utc::now() > record.expires_at {
        return Err(AppError::BadRequest("OTP expired".into()));
    }

    Ok(())
}
