use std::sync::Arc;

use crate::{
    clients::{mail::MailClient, payments::PaymentClient},
    config::AppConfig,
    db::DbPool,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<AppConfig>,
    pub payments: PaymentClient,
    pub mailer: MailClient,
}

impl AppState {
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        let payments = PaymentClient::new(&config.gateway_base_url, &config.gateway_api_key);
        let mailer = MailClient::new(
            &config.mail_relay_base_url,
            &config.mail_relay_api_key,
            &config.mail_from,
        );
        Self {
            pool,
            config: Arc::new(config),
            payments,
            mailer,
        }
    }
}
