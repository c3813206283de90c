use axum::{
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use storefront_core::UserId;

use crate::context::SessionContext;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const SESSION_ID_HEADER: &str = "x-session-id";

/// Resolve the shopper from `x-user-id` / `x-session-id` and insert a
/// [`SessionContext`]. Requests carrying neither header are rejected.
pub async fn session_middleware(
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let ctx = extract_session(req.headers())?;
    req.extensions_mut().insert(ctx);
    Ok(next.run(req).await)
}

fn extract_session(headers: &HeaderMap) -> Result<SessionContext, StatusCode> {
    let user_id = match header_value(headers, USER_ID_HEADER)? {
        Some(raw) => Some(raw.parse::<UserId>().map_err(|_e| StatusCode::UNAUTHORIZED)?),
        None => None,
    };
    let session_id = header_value(headers, SESSION_ID_HEADER)?.map(str::to_string);

    if user_id.is_none() && session_id.is_none() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(SessionContext::new(user_id, session_id))
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Result<Option<&'a str>, StatusCode> {
    let Some(value) = headers.get(name) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?.trim();
    Ok((!value.is_empty()).then_some(value))
}
