use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use ucash_auth::Permission;

use crate::app::dto::{self, ApiResponse};
use crate::app::errors;
use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::SessionContext;

pub async fn post_transaction(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SessionContext>,
    payload: Result<Json<dto::PostTransactionRequest>, JsonRejection>,
) -> Response {
    let body = match common::body(payload) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    if let Err(e) = authz::require(&ctx, Permission::Transact) {
        return errors::authz_error_to_response(e);
    }

    let (pin, request) = body.into_parts();

    services.simulate_latency().await;

    let mut session = ctx.into_session();
    let posted = common::blocking(&services, move |services| {
        services
            .ledger
            .confirm_pin(session.account_id(), &pin)
            .map_err(errors::ledger_error_to_response)?;
        let record = services
            .ledger
            .post_in_session(&mut session, request)
            .map_err(errors::ledger_error_to_response)?;
        common::persist_session(services, &session)?;
        Ok(record)
    })
    .await;
    let record = match posted {
        Ok(r) => r,
        Err(resp) => return resp,
    };

    (StatusCode::CREATED, Json(ApiResponse::ok(record))).into_response()
}

pub async fn list_transactions(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SessionContext>,
) -> Response {
    let account_id = ctx.account_id();
    let listed = common::blocking(&services, move |services| {
        services
            .ledger
            .list_transactions(account_id)
            .map_err(errors::ledger_error_to_response)
    })
    .await;
    match listed {
        Ok(items) => (StatusCode::OK, Json(ApiResponse::ok(items))).into_response(),
        Err(resp) => resp,
    }
}
