use axum::{
    Router,
    routing::{get, post},
};

pub mod account;
pub mod admin;
pub mod assistant;
pub mod auth;
pub mod common;
pub mod system;
pub mod transactions;

/// Endpoints reachable without a session.
pub fn public_router() -> Router {
    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
}

/// Router for all session-scoped endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/me", get(account::me))
        .route(
            "/api/transactions",
            get(transactions::list_transactions).post(transactions::post_transaction),
        )
        .route("/api/admin/snapshot", get(admin::snapshot))
        .route("/api/assistant", post(assistant::ask))
}
