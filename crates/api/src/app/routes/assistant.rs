use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use ucash_ai::{AdviceRequest, advise_or_fallback};

use crate::app::dto::{self, ApiResponse, AssistantReply};
use crate::app::errors;
use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::context::SessionContext;

/// Free-text advice grounded in the caller's balance and recent history.
///
/// Advisor failures still answer 200 with a fallback sentence.
pub async fn ask(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SessionContext>,
    payload: Result<Json<dto::AssistantRequest>, JsonRejection>,
) -> Response {
    let body = match common::body(payload) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    if body.query.trim().is_empty() {
        return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", "query is required");
    }

    let account_id = ctx.account_id();
    let loaded = common::blocking(&services, move |services| {
        let account = services
            .ledger
            .account(account_id)
            .map_err(errors::ledger_error_to_response)?;
        let history = services
            .ledger
            .list_transactions(account.id)
            .map_err(errors::ledger_error_to_response)?;
        Ok((account, history))
    })
    .await;
    let (account, history) = match loaded {
        Ok(loaded) => loaded,
        Err(resp) => return resp,
    };

    let request = AdviceRequest::new(
        body.query,
        account.balance,
        history.iter().map(dto::transaction_line).collect(),
    );
    let reply = advise_or_fallback(services.advisor.as_ref(), &request).await;

    (StatusCode::OK, Json(ApiResponse::ok(AssistantReply { reply }))).into_response()
}
