use super::{contact::handle_contact, health::handle_health};
use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handle_health))
        .route("/contact", post(handle_contact))
}
