use axum::{body::Body, http::Request};
use tower::ServiceExt;

use storefront_api::{
    app::build_app, config::AppConfig, routes::health::health_check, state::AppState,
};

#[tokio::test]
async fn health_check_reports_the_service() {
    let response = health_check().await;
    assert_eq!(response.0.message, "Service healthy");

    let data = response.0.data.expect("health data");
    assert_eq!(data.status, "ok");
    assert_eq!(data.service, "storefront-api");
}

// Browser storefronts call the API cross-origin; responses must carry the
// CORS headers.
#[tokio::test]
async fn cross_origin_requests_get_cors_headers() {
    let app = build_app(test_state());

    let request = Request::builder()
        .uri("/health")
        .header("origin", "https://shop.example.com")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");

    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|value| value.to_str().ok()),
        Some("*")
    );
}

// Router assembly only; the pool is lazy and never connects here.
fn test_state() -> AppState {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy("postgres://postgres@127.0.0.1/storefront_test")
        .expect("lazy pool");
    let config = AppConfig {
        database_url: "postgres://postgres@127.0.0.1/storefront_test".into(),
        host: "127.0.0.1".into(),
        port: 0,
        admin_password: "test-password".into(),
        gateway_base_url: "http://127.0.0.1:9".into(),
        gateway_api_key: "test".into(),
        mail_relay_base_url: "http://127.0.0.1:9".into(),
        mail_relay_api_key: "test".into(),
        mail_from: "no-reply@test.local".into(),
        order_stale_hours: 24,
        order_sweep_interval_secs: 3600,
    };
    AppState::new(pool, config)
}
