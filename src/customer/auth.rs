//! Identity of the signed-in user.
//!
//! Authentication happens upstream; the gateway forwards the verified
//! identity in `x-user-id`, `x-user-email` and optionally `x-user-name`.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const USER_NAME_HEADER: &str = "x-user-name";

/// Authenticated user info
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
    pub name: Option<String>,
}

impl AuthUser {
    /// Splits the display name into first and last name, falling back to the
    /// local part of the email.
    pub fn name_parts(&self) -> (String, String) {
        match self.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => match name.split_once(char::is_whitespace) {
                Some((first, last)) => (first.to_string(), last.trim().to_string()),
                None => (name.to_string(), String::new()),
            },
            None => {
                let local = self.email.split('@').next().unwrap_or_default();
                (local.to_string(), String::new())
            }
        }
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header(parts, USER_ID_HEADER)
            .ok_or_else(|| AppError::Unauthorized("sign in required".into()))?;
        let email = header(parts, USER_EMAIL_HEADER)
            .ok_or_else(|| AppError::Unauthorized("missing user email".into()))?;

        Ok(Self {
            user_id: user_id.to_string(),
            email: email.to_string(),
            name: header(parts, USER_NAME_HEADER).map(str::to_string),
        })
    }
}

/// Identity for routes open to guests.
///
/// No identity headers at all means a guest; an incomplete identity is
/// rejected like on signed-in routes rather than downgraded to a guest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let is_guest = [USER_ID_HEADER, USER_EMAIL_HEADER, USER_NAME_HEADER]
            .iter()
            .all(|name| header(parts, name).is_none());
        if is_guest {
            return Ok(Self(None));
        }
        AuthUser::from_request_parts(parts, state).await.map(|user| Self(Some(user)))
    }
}
