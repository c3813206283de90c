use axum::http::StatusCode;

use storefront_cart::CartId;
use storefront_core::UserId;

use crate::app::errors;

/// Shopper identity for a request.
///
/// Inserted by the session middleware; at least one of the two fields is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    user_id: Option<UserId>,
    session_id: Option<String>,
}

impl SessionContext {
    pub fn new(user_id: Option<UserId>, session_id: Option<String>) -> Self {
        Self {
            user_id,
            session_id,
        }
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// The cart this shopper works on. A signed-in user owns one cart across
    /// sessions; anonymous shoppers get one per session.
    pub fn cart_id(&self) -> CartId {
        match (self.user_id, self.session_id.as_deref()) {
            (Some(user_id), _) => CartId::for_user(user_id),
            (None, Some(session_id)) => CartId::for_session(session_id),
            (None, None) => CartId::for_session(""),
        }
    }

    /// The signed-in user, or a 401 response for anonymous sessions.
    pub fn require_user(&self) -> Result<UserId, axum::response::Response> {
        self.user_id.ok_or_else(|| {
            errors::json_error(
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "sign in required (missing x-user-id header)",
            )
        })
    }
}
