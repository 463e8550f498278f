//! REST API handlers for the blog

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::service::{self, NewComment};
use crate::error::Result;
use crate::models::{BlogComment, BlogPost};
use crate::state::SharedState;

const DEFAULT_PAGE_SIZE: usize = 10;

/// Creates routes for the blog
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/blog", get(list_posts))
        .route("/blog/:slug", get(get_post))
        .route("/blog/:slug/comments", get(list_comments).post(add_comment))
}

#[derive(Debug, Deserialize)]
struct ListParams {
    tag: Option<String>,
    limit: Option<usize>,
}

/// Endpoint: GET /blog
async fn list_posts(
    State(state): State<SharedState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<BlogPost>>> {
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, 50);
    let posts = service::list_posts(&state.sdk, params.tag.as_deref(), limit).await?;
    Ok(Json(posts))
}

/// Endpoint: GET /blog/:slug
async fn get_post(State(state): State<SharedState>, Path(slug): Path<String>) -> Result<Json<BlogPost>> {
    Ok(Json(service::post_by_slug(&state.sdk, &slug).await?))
}

/// Endpoint: GET /blog/:slug/comments
async fn list_comments(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<BlogComment>>> {
    let post = service::post_by_slug(&state.sdk, &slug).await?;
    Ok(Json(service::comments(&state.sdk, &post.id).await?))
}

/// Endpoint: POST /blog/:slug/comments
async fn add_comment(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
    Json(comment): Json<NewComment>,
) -> Result<(StatusCode, Json<BlogComment>)> {
    let post = service::post_by_slug(&state.sdk, &slug).await?;
    let stored = service::add_comment(&state.sdk, &post.id, &comment).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}
