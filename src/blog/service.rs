//! Blog queries and comment submission.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::error::AppError;
use crate::models::{BlogComment, BlogPost};
use crate::sdk::{collections, Predicate, Sdk, SdkError, SortDirection};

pub const MAX_COMMENT_LENGTH: usize = 2000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommentError {
    #[error("name cannot be empty")]
    MissingAuthor,
    #[error("comment cannot be empty")]
    EmptyContent,
    #[error("comment is longer than 2000 characters")]
    TooLong,
}

impl From<CommentError> for AppError {
    fn from(err: CommentError) -> Self {
        AppError::Unprocessable(err.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewComment {
    pub author_name: String,
    pub content: String,
}

#[derive(Serialize)]
struct CommentRecord<'a> {
    post_id: &'a str,
    author_name: &'a str,
    content: &'a str,
    approved: bool,
}

impl NewComment {
    /// Trims both fields and checks them.
    fn validated(&self) -> Result<(&str, &str), CommentError> {
        let author = self.author_name.trim();
        let content = self.content.trim();
        if author.is_empty() {
            return Err(CommentError::MissingAuthor);
        }
        if content.is_empty() {
            return Err(CommentError::EmptyContent);
        }
        if content.chars().count() > MAX_COMMENT_LENGTH {
            return Err(CommentError::TooLong);
        }
        Ok((author, content))
    }
}

/// Published posts, newest first.
pub async fn list_posts(sdk: &Sdk, tag: Option<&str>, limit: usize) -> Result<Vec<BlogPost>, SdkError> {
    let mut query = sdk
        .query_builder::<BlogPost>(collections::BLOG_POSTS)
        .filter(Predicate::eq("published", true));
    if let Some(tag) = tag {
        query = query.filter(Predicate::contains("tags", tag));
    }
    query
        .sort("published_at", SortDirection::Desc)
        .limit(limit)
        .exec()
        .await
}

pub async fn post_by_slug(sdk: &Sdk, slug: &str) -> Result<BlogPost, AppError> {
    sdk.query_builder::<BlogPost>(collections::BLOG_POSTS)
        .filter(Predicate::eq("slug", slug))
        .filter(Predicate::eq("published", true))
        .first()
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {slug}")))
}

/// Approved comments, oldest first.
pub async fn comments(sdk: &Sdk, post_id: &str) -> Result<Vec<BlogComment>, SdkError> {
    sdk.query_builder::<BlogComment>(collections::BLOG_COMMENTS)
        .filter(Predicate::eq("post_id", post_id))
        .filter(Predicate::eq("approved", true))
        .sort_asc("created_at")
        .exec()
        .await
}

/// Stores a comment for moderation.
pub async fn add_comment(sdk: &Sdk, post_id: &str, comment: &NewComment) -> Result<BlogComment, AppError> {
    let (author_name, content) = comment.validated()?;
    let record = CommentRecord {
        post_id,
        author_name,
        content,
        approved: false,
    };
    let stored: BlogComment = sdk.insert(collections::BLOG_COMMENTS, &record).await?;
    info!(post_id, comment_id = %stored.id, "Comment awaiting moderation");
    Ok(stored)
}
