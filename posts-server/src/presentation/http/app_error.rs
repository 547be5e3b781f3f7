use std::collections::BTreeMap;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::domain::error::DomainError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unauthorized")]
    Unauthorized,
}

pub(crate) type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Error bodies are flat objects keyed by what went wrong, e.g. `{"postnotfound": "No post found"}`.
type ErrorBody = BTreeMap<String, String>;

fn keyed(key: &str, message: &str) -> ErrorBody {
    BTreeMap::from([(key.to_string(), message.to_string())])
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Domain(err) => match err {
                DomainError::Validation(errors) => (StatusCode::BAD_REQUEST, errors),
                DomainError::NoPostsFound => {
                    (StatusCode::NOT_FOUND, keyed("nopostfound", "No posts found"))
                }
                DomainError::NoPostFound => (
                    StatusCode::NOT_FOUND,
                    keyed("nopostfound", "No post found with that ID"),
                ),
                DomainError::PostNotFound => {
                    (StatusCode::NOT_FOUND, keyed("postnotfound", "No post found"))
                }
                DomainError::CommentNotExists => (
                    StatusCode::NOT_FOUND,
                    keyed("commentnotexists", "No comment exists"),
                ),
                DomainError::ProfileNotFound => (
                    StatusCode::NOT_FOUND,
                    keyed("noprofile", "There is no profile for this user"),
                ),
                DomainError::NotAuthorized => (
                    StatusCode::UNAUTHORIZED,
                    keyed("notauthorized", "User not authorized"),
                ),
                DomainError::AlreadyLiked => (
                    StatusCode::BAD_REQUEST,
                    keyed("alreadyliked", "User already liked this post"),
                ),
                DomainError::NotLiked => (
                    StatusCode::BAD_REQUEST,
                    keyed("notliked", "User has not liked this post"),
                ),
                DomainError::Store(message) => {
                    error!(error = %message, "unhandled store failure");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        keyed("error", "internal error"),
                    )
                }
            },
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, keyed("error", &message)),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                keyed("unauthorized", "Unauthorized"),
            ),
        };

        (status, Json(body)).into_response()
    }
}
