use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Client for the external payment gateway's session API. A session binds
/// the hosted checkout to a specific order id and amount.
#[derive(Clone)]
pub struct PaymentClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionRequest<'a> {
    order_id: Uuid,
    amount: Decimal,
    currency: &'a str,
    customer_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    customer_email: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSession {
    pub session_id: String,
    #[serde(default)]
    pub checkout_url: Option<String>,
}

impl PaymentClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub async fn create_session(
        &self,
        order_id: Uuid,
        amount: Decimal,
        customer_name: &str,
        customer_email: Option<&str>,
    ) -> AppResult<PaymentSession> {
        let request = CreateSessionRequest {
            order_id,
            amount,
            currency: "USD",
            customer_name,
            customer_email,
        };

        let resp = self
            .http
            .post(format!("{}/sessions", self.base_url))
            .header("X-Api-Key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("payment gateway unreachable: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| AppError::Upstream(format!("payment gateway read error: {e}")))?;

        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "payment gateway error status={status}"
            )));
        }

        serde_json::from_str::<PaymentSession>(&body)
            .map_err(|e| AppError::Upstream(format!("invalid payment gateway response: {e}")))
    }
}
