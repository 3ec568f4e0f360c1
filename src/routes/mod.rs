use axum::Router;

use crate::state::AppState;

pub mod doc;
pub mod health;
pub mod mail;
pub mod orders;
pub mod params;
pub mod products;
pub mod tickets;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/products", products::router())
        .nest("/orders", orders::router())
        .nest("/mail", mail::router())
        .nest("/tickets", tickets::router())
}
