use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use ucash_auth::Permission;

use crate::app::dto::{AdminSnapshotView, ApiResponse};
use crate::app::errors;
use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::SessionContext;

/// Every account and transaction plus aggregate stats. ADMIN only.
pub async fn snapshot(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SessionContext>,
) -> Response {
    if let Err(e) = authz::require(&ctx, Permission::ViewAdminDashboard) {
        return errors::authz_error_to_response(e);
    }

    let snapshot = common::blocking(&services, |services| {
        services
            .ledger
            .admin_snapshot()
            .map_err(errors::ledger_error_to_response)
    })
    .await;
    match snapshot {
        Ok(snapshot) => (
            StatusCode::OK,
            Json(ApiResponse::ok(AdminSnapshotView::from(snapshot))),
        )
            .into_response(),
        Err(resp) => resp,
    }
}
