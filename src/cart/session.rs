//! Cart session resolution
//!
//! The browser session that owns a cart is identified by the `cart_session`
//! cookie. Requests without a usable cookie get a fresh session id, which the
//! handler hands back with `Set-Cookie`.

use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::Response;
use uuid::Uuid;

use super::storage::is_valid_key_segment;

pub const SESSION_COOKIE: &str = "cart_session";

/// Returns the session id and whether it was newly created.
pub fn resolve_session_id(headers: &HeaderMap) -> (String, bool) {
    let existing = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && is_valid_key_segment(value))
        .map(|(_, value)| value.to_string());

    match existing {
        Some(id) => (id, false),
        None => (Uuid::new_v4().simple().to_string(), true),
    }
}

/// Adds the session cookie to a response when the session is new.
pub fn attach_session_cookie(response: &mut Response, session_id: &str, is_new: bool) {
    if !is_new {
        return;
    }
    let cookie = format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax");
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
}
