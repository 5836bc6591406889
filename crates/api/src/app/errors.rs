use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use ucash_auth::AuthzError;
use ucash_wallet::LedgerError;

use crate::app::dto::ApiResponse;

pub fn ledger_error_to_response(err: LedgerError) -> Response {
    let status = match &err {
        LedgerError::DuplicatePhone => StatusCode::CONFLICT,
        LedgerError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        LedgerError::RecipientNotFound(_) | LedgerError::AccountNotFound => StatusCode::NOT_FOUND,
        LedgerError::InsufficientBalance { .. } | LedgerError::SelfTransfer => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        LedgerError::MissingRequiredField(_)
        | LedgerError::InvalidAmount(_)
        | LedgerError::Validation(_) => StatusCode::BAD_REQUEST,
        LedgerError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let message = match &err {
        // Storage details stay in the logs.
        LedgerError::Storage(_) => "internal storage error".to_string(),
        other => other.to_string(),
    };
    json_error(status, err.code(), message)
}

pub fn authz_error_to_response(err: AuthzError) -> Response {
    json_error(StatusCode::FORBIDDEN, "forbidden", err.to_string())
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (status, axum::Json(ApiResponse::<()>::failure(code, message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn statuses_follow_error_kind() {
        let cases = [
            (LedgerError::DuplicatePhone, StatusCode::CONFLICT),
            (LedgerError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (LedgerError::RecipientNotFound("0171".into()), StatusCode::NOT_FOUND),
            (
                LedgerError::InsufficientBalance {
                    available: Decimal::ONE,
                    required: Decimal::TEN,
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (LedgerError::MissingRequiredField("pin"), StatusCode::BAD_REQUEST),
            (LedgerError::Storage("disk full".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ledger_error_to_response(err).status(), status);
        }
    }
}
