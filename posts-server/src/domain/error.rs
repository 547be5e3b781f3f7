use std::collections::BTreeMap;

use thiserror::Error;

/// Field name -> first message reported for it.
pub(crate) type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Error)]
pub(crate) enum DomainError {
    #[error("validation failed: {0:?}")]
    Validation(FieldErrors),

    #[error("no posts found")]
    NoPostsFound,

    #[error("no post found with that id")]
    NoPostFound,

    #[error("post not found")]
    PostNotFound,

    #[error("comment does not exist")]
    CommentNotExists,

    #[error("profile not found")]
    ProfileNotFound,

    #[error("user not authorized")]
    NotAuthorized,

    #[error("user already liked this post")]
    AlreadyLiked,

    #[error("user has not liked this post")]
    NotLiked,

    #[error("store error: {0}")]
    Store(String),
}
