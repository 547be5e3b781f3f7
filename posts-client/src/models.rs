use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Лайк поста. Один пользователь может лайкнуть пост только один раз.
pub struct Like {
    /// Идентификатор лайка.
    pub id: Uuid,
    /// Пользователь, поставивший лайк.
    pub user: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Комментарий к посту.
pub struct Comment {
    /// Идентификатор комментария.
    pub id: Uuid,
    /// Текст комментария.
    pub text: String,
    /// Отображаемое имя автора.
    pub name: Option<String>,
    /// Аватар автора.
    pub avatar: Option<String>,
    /// Автор комментария.
    pub user: Uuid,
    /// Дата и время создания (UTC).
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Публичная модель поста.
pub struct Post {
    /// Идентификатор поста.
    pub id: Uuid,
    /// Текст поста.
    pub text: String,
    /// Отображаемое имя автора.
    pub name: Option<String>,
    /// Аватар автора.
    pub avatar: Option<String>,
    /// Владелец поста.
    pub user: Uuid,
    /// Лайки, новые первыми.
    pub likes: Vec<Like>,
    /// Комментарии, новые первыми.
    pub comments: Vec<Comment>,
    /// Дата и время создания поста (UTC).
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize)]
/// Тело запроса для создания поста или комментария.
pub struct PostInput {
    /// Текст (10..=300 символов).
    pub text: String,
    /// Отображаемое имя.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Аватар.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl PostInput {
    /// Создаёт тело запроса только с текстом.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}
