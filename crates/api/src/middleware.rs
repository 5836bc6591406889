use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use ucash_auth::Hs256Tokens;
use ucash_infra::SessionStore;

use crate::app::errors;
use crate::context::SessionContext;

#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<Hs256Tokens>,
    pub sessions: Arc<dyn SessionStore>,
}

/// Resolve the bearer token to a live session.
///
/// The token must verify and its session must still be in the store
/// (logout removes it).
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let unauthorized =
        || errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", "authentication required");

    let token = extract_bearer(req.headers()).ok_or_else(unauthorized)?;

    let claims = state.tokens.validate(token, Utc::now()).map_err(|e| {
        tracing::debug!(error = %e, "bearer token rejected");
        unauthorized()
    })?;

    let sessions = Arc::clone(&state.sessions);
    let sid = claims.sid;
    let loaded = tokio::task::spawn_blocking(move || sessions.load(sid))
        .await
        .map_err(|e| e.to_string())
        .and_then(|res| res.map_err(|e| e.to_string()));

    let session = match loaded {
        Ok(Some(session)) if session.account_id() == claims.sub => session,
        Ok(_) => return Err(unauthorized()),
        Err(e) => {
            tracing::error!(error = %e, "session lookup failed");
            return Err(errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "session lookup failed",
            ));
        }
    };

    req.extensions_mut().insert(SessionContext::new(session));

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(axum::http::header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn bearer_extraction() {
        assert_eq!(extract_bearer(&headers("Bearer abc.def")), Some("abc.def"));
        assert_eq!(extract_bearer(&headers("Bearer   ")), None);
        assert_eq!(extract_bearer(&headers("Basic abc")), None);
        assert_eq!(extract_bearer(&HeaderMap::new()), None);
    }
}
