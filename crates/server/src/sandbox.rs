//! Throwaway routing playground served by the `sandbox` binary. Shares nothing
//! with the user directory.

use axum::{extract::Path, http::StatusCode, routing::get, Router};
use tower_http::trace::TraceLayer;

/// Non-standard status answered to `POST /users`.
pub const CREATE_STATUS: u16 = 313;

pub fn build_sandbox_router() -> Router {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/courses/:id", get(show_course))
        .layer(TraceLayer::new_for_http())
}

async fn list_users() -> &'static str {
    "GET /users"
}

async fn create_user() -> StatusCode {
    // 100..=999 always parses
    StatusCode::from_u16(CREATE_STATUS).unwrap_or(StatusCode::OK)
}

async fn show_course(Path(id): Path<String>) -> String {
    format!("Course id: {id}")
}
