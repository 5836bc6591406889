use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use ucash_wallet::{NewAccount, Session};

use crate::app::dto::{self, AccountView, ApiResponse, AuthResponse};
use crate::app::errors;
use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::context::SessionContext;

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<dto::RegisterRequest>, JsonRejection>,
) -> Response {
    let body = match common::body(payload) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    services.simulate_latency().await;

    let input = NewAccount::new(body.name, body.phone, body.pin, body.email);
    let outcome = common::blocking(&services, move |services| {
        let session = services
            .ledger
            .register(input)
            .map_err(errors::ledger_error_to_response)?;
        establish(services, session, StatusCode::CREATED)
    })
    .await;
    let (Ok(resp) | Err(resp)) = outcome;
    resp
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<dto::LoginRequest>, JsonRejection>,
) -> Response {
    let body = match common::body(payload) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    services.simulate_latency().await;

    let outcome = common::blocking(&services, move |services| {
        let session = services
            .ledger
            .authenticate(&body.phone, &body.pin)
            .map_err(errors::ledger_error_to_response)?;
        establish(services, session, StatusCode::OK)
    })
    .await;
    let (Ok(resp) | Err(resp)) = outcome;
    resp
}

pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SessionContext>,
) -> Response {
    let session_id = ctx.session_id();
    let removed = common::blocking(&services, move |services| {
        services.sessions.remove(session_id).map_err(|e| {
            tracing::error!(%session_id, error = %e, "session removal failed");
            errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "session could not be removed",
            )
        })
    })
    .await;
    if let Err(resp) = removed {
        return resp;
    }

    tracing::info!(
        account_id = %ctx.account_id(),
        started_at = %ctx.session().started_at(),
        "logged out"
    );
    (
        StatusCode::OK,
        Json(ApiResponse::ok(serde_json::json!({ "loggedOut": true }))),
    )
        .into_response()
}

/// Persist the new session and hand back its token.
fn establish(services: &AppServices, session: Session, status: StatusCode) -> Result<Response, Response> {
    common::persist_session(services, &session)?;

    let token = services.issue_token(&session).map_err(|e| {
        tracing::error!(error = %e, "token issue failed");
        errors::json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "token_error",
            "session token could not be issued",
        )
    })?;

    let body = AuthResponse {
        account: AccountView::from(session.account()),
        token,
    };
    Ok((status, Json(ApiResponse::ok(body))).into_response())
}
