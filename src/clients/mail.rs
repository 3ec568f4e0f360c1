use serde::Serialize;

use crate::error::{AppError, AppResult};

/// Client for the transactional mail relay.
#[derive(Clone)]
pub struct MailClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    from: String,
}

#[derive(Debug, Serialize)]
struct SendMailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

impl MailClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        from: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            from: from.into(),
        }
    }

    pub async fn send(&self, to: &str, subject: &str, text: &str) -> AppResult<()> {
        let request = SendMailRequest {
            from: &self.from,
            to,
            subject,
            text,
        };

        let resp = self
            .http
            .post(format!("{}/send", self.base_url))
            .header("X-Api-Key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("mail relay unreachable: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "mail relay error status={status}"
            )));
        }

        Ok(())
    }
}
