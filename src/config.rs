use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub admin_password: String,
    pub gateway_base_url: String,
    pub gateway_api_key: String,
    pub mail_relay_base_url: String,
    pub mail_relay_api_key: String,
    pub mail_from: String,
    pub order_stale_hours: i64,
    pub order_sweep_interval_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let admin_password = env::var("ADMIN_PASSWORD")?;
        let gateway_base_url = env::var("PAYMENT_GATEWAY_URL")?;
        let gateway_api_key = env::var("PAYMENT_GATEWAY_API_KEY")?;
        let mail_relay_base_url = env::var("MAIL_RELAY_URL")?;
        let mail_relay_api_key = env::var("MAIL_RELAY_API_KEY")?;
        let mail_from =
            env::var("MAIL_FROM").unwrap_or_else(|_| "no-reply@storefront.local".to_string());
        let order_stale_hours = env::var("ORDER_STALE_HOURS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(24);
        let order_sweep_interval_secs = env::var("ORDER_SWEEP_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(3600);
        Ok(Self {
            database_url,
            host,
            port,
            admin_password,
            gateway_base_url,
            gateway_api_key,
            mail_relay_base_url,
            mail_relay_api_key,
            mail_from,
            order_stale_hours,
            order_sweep_interval_secs,
        })
    }
}
