use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;

use ucash_wallet::Session;

use crate::app::errors;
use crate::app::services::AppServices;

/// Unwrap a JSON body, answering malformed input with the error envelope.
pub fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    payload
        .map(|Json(v)| v)
        .map_err(|e| errors::json_error(StatusCode::BAD_REQUEST, "validation_error", e.body_text()))
}

/// Write the session snapshot back so later requests see the new balance.
pub fn persist_session(services: &AppServices, session: &Session) -> Result<(), Response> {
    services.sessions.save(session).map_err(|e| {
        tracing::error!(session_id = %session.id(), error = %e, "session save failed");
        errors::json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "storage_error",
            "session could not be saved",
        )
    })
}

/// Run synchronous ledger or session-store work on the blocking pool.
///
/// Storage calls can hit the filesystem and the posting mutex, so they never
/// run on the async workers.
pub async fn blocking<T, F>(services: &Arc<AppServices>, work: F) -> Result<T, Response>
where
    F: FnOnce(&AppServices) -> Result<T, Response> + Send + 'static,
    T: Send + 'static,
{
    let services = Arc::clone(services);
    tokio::task::spawn_blocking(move || work(&services))
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "blocking storage task failed");
            Err(errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "request could not be completed",
            ))
        })
}
