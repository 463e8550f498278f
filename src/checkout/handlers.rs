//! REST API handler for checkout

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use super::service::{place_order, CheckoutRequest};
use crate::cart::{session, CartKey};
use crate::customer::auth::MaybeAuthUser;
use crate::error::Result;
use crate::state::SharedState;

/// Creates routes for order placement
pub fn routes() -> Router<SharedState> {
    Router::new().route("/restaurants/:slug/checkout", post(checkout))
}

/// Endpoint: POST /restaurants/:slug/checkout
/// Places an order from the session's cart; signing in is optional.
async fn checkout(
    State(state): State<SharedState>,
    headers: HeaderMap,
    MaybeAuthUser(user): MaybeAuthUser,
    Path(slug): Path<String>,
    Json(payload): Json<CheckoutRequest>,
) -> Result<Response> {
    let (session_id, is_new_session) = session::resolve_session_id(&headers);
    let key = CartKey::new(session_id, slug)?;

    let outcome = place_order(&state, &key, payload, user.as_ref()).await?;

    let mut response = (StatusCode::CREATED, Json(outcome)).into_response();
    session::attach_session_cookie(&mut response, key.session_id(), is_new_session);
    Ok(response)
}
