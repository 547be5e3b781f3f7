use std::collections::BTreeMap;

use thiserror::Error;

#[derive(Debug, Error)]
/// Ошибки клиентской библиотеки `posts-client`.
pub enum PostsClientError {
    /// Ошибка HTTP-транспорта (`reqwest`).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Токен отсутствует, некорректен или пользователь не владелец поста.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Пост или комментарий не найден. Содержит сообщение сервера.
    #[error("not found: {0}")]
    NotFound(String),

    /// Сервер отклонил запрос (ошибки валидации, повторный лайк и т.п.).
    #[error("request rejected with status {status}: {errors:?}")]
    Rejected {
        /// HTTP-статус ответа.
        status: u16,
        /// Тело ошибки: ключ -> сообщение.
        errors: BTreeMap<String, String>,
    },

    /// Для операции нужен JWT-токен, но он не установлен.
    #[error("token is required for this operation")]
    MissingToken,
}

/// Результат операций `posts-client`.
pub type PostsClientResult<T> = Result<T, PostsClientError>;

impl PostsClientError {
    pub(crate) fn from_http_status(
        status: reqwest::StatusCode,
        errors: BTreeMap<String, String>,
    ) -> Self {
        let summary = errors
            .values()
            .next()
            .cloned()
            .unwrap_or_else(|| format!("http status {status}"));

        match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                Self::Unauthorized(summary)
            }
            reqwest::StatusCode::NOT_FOUND => Self::NotFound(summary),
            _ => Self::Rejected {
                status: status.as_u16(),
                errors,
            },
        }
    }

    /// Ключ ошибки сервера, например `alreadyliked` или `text`.
    pub fn has_key(&self, key: &str) -> bool {
        match self {
            Self::Rejected { errors, .. } => errors.contains_key(key),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::PostsClientError;

    fn body(key: &str, message: &str) -> BTreeMap<String, String> {
        BTreeMap::from([(key.to_string(), message.to_string())])
    }

    #[test]
    fn status_codes_map_to_variants() {
        let err = PostsClientError::from_http_status(
            reqwest::StatusCode::NOT_FOUND,
            body("postnotfound", "No post found"),
        );
        assert!(matches!(err, PostsClientError::NotFound(ref m) if m == "No post found"));

        let err = PostsClientError::from_http_status(
            reqwest::StatusCode::UNAUTHORIZED,
            body("notauthorized", "User not authorized"),
        );
        assert!(matches!(err, PostsClientError::Unauthorized(_)));

        let err = PostsClientError::from_http_status(
            reqwest::StatusCode::BAD_REQUEST,
            body("alreadyliked", "User already liked this post"),
        );
        assert!(err.has_key("alreadyliked"));
        assert!(!err.has_key("notliked"));
    }

    #[test]
    fn empty_body_falls_back_to_status() {
        let err = PostsClientError::from_http_status(
            reqwest::StatusCode::NOT_FOUND,
            BTreeMap::new(),
        );
        match err {
            PostsClientError::NotFound(message) => assert!(message.contains("404")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
