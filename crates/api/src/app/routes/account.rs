use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::app::dto::{AccountView, ApiResponse};
use crate::app::errors;
use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::context::SessionContext;

/// Current account, reloaded so incoming credits show up.
pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SessionContext>,
) -> Response {
    let mut session = ctx.into_session();
    let refreshed = common::blocking(&services, move |services| {
        services
            .ledger
            .refresh_session(&mut session)
            .map_err(errors::ledger_error_to_response)?;
        common::persist_session(services, &session)?;
        Ok(session)
    })
    .await;
    let session = match refreshed {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    (
        StatusCode::OK,
        Json(ApiResponse::ok(AccountView::from(session.account()))),
    )
        .into_response()
}
