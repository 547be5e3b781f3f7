use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::error::{PostsClientError, PostsClientResult};
use crate::models::{Post, PostInput};

const POSTS_PATH: &str = "/api/posts";

#[derive(Debug, Deserialize)]
struct ProbeDto {
    msg: String,
}

#[derive(Debug, Deserialize)]
struct SuccessDto {
    success: bool,
}

#[derive(Debug, Clone)]
/// HTTP-клиент для REST API `posts-server`.
///
/// Хранит JWT-токен и автоматически подставляет его в защищённые операции.
pub struct PostsClient {
    base_url: String,
    client: Client,
    token: Option<String>,
}

impl PostsClient {
    /// Создаёт клиент с базовым URL сервера, например `http://127.0.0.1:8080`.
    pub fn new(base_url: impl Into<String>) -> PostsClientResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
            token: None,
        })
    }

    /// Устанавливает JWT-токен.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Возвращает текущий JWT-токен, если он установлен.
    pub fn get_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Очищает сохранённый JWT-токен.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.endpoint(path))
    }

    fn authorized(&self, method: Method, path: &str) -> PostsClientResult<RequestBuilder> {
        let token = self.token.as_deref().ok_or(PostsClientError::MissingToken)?;
        Ok(self.request(method, path).bearer_auth(token))
    }

    async fn decode_error(response: reqwest::Response) -> PostsClientError {
        let status = response.status();
        let errors = response
            .json::<BTreeMap<String, String>>()
            .await
            .unwrap_or_default();
        PostsClientError::from_http_status(status, errors)
    }

    /// отправляет запрос и разбирает json-ответ либо ошибку сервера
    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> PostsClientResult<T> {
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }
        Ok(response.json::<T>().await?)
    }

    /// Проверяет доступность сервиса (`GET /api/posts/test`).
    pub async fn probe(&self) -> PostsClientResult<String> {
        let dto: ProbeDto = Self::send(self.request(Method::GET, &format!("{POSTS_PATH}/test"))).await?;
        Ok(dto.msg)
    }

    /// Возвращает все посты, новые первыми.
    pub async fn list_posts(&self) -> PostsClientResult<Vec<Post>> {
        Self::send(self.request(Method::GET, POSTS_PATH)).await
    }

    /// Возвращает пост по идентификатору.
    pub async fn get_post(&self, id: Uuid) -> PostsClientResult<Post> {
        Self::send(self.request(Method::GET, &format!("{POSTS_PATH}/{id}"))).await
    }

    /// Создаёт пост от имени владельца токена.
    pub async fn create_post(&self, input: &PostInput) -> PostsClientResult<Post> {
        Self::send(self.authorized(Method::POST, POSTS_PATH)?.json(input)).await
    }

    /// Удаляет пост. Удалить можно только свой пост.
    pub async fn delete_post(&self, id: Uuid) -> PostsClientResult<bool> {
        let dto: SuccessDto =
            Self::send(self.authorized(Method::DELETE, &format!("{POSTS_PATH}/{id}"))?).await?;
        Ok(dto.success)
    }

    /// Ставит лайк посту.
    pub async fn like_post(&self, id: Uuid) -> PostsClientResult<Post> {
        Self::send(self.authorized(Method::POST, &format!("{POSTS_PATH}/like/{id}"))?).await
    }

    /// Снимает лайк с поста.
    pub async fn unlike_post(&self, id: Uuid) -> PostsClientResult<Post> {
        Self::send(self.authorized(Method::POST, &format!("{POSTS_PATH}/unlike/{id}"))?).await
    }

    /// Добавляет комментарий к посту.
    pub async fn add_comment(&self, id: Uuid, input: &PostInput) -> PostsClientResult<Post> {
        Self::send(
            self.authorized(Method::POST, &format!("{POSTS_PATH}/comment/{id}"))?
                .json(input),
        )
        .await
    }

    /// Удаляет комментарий из поста.
    pub async fn delete_comment(&self, id: Uuid, comment_id: Uuid) -> PostsClientResult<Post> {
        Self::send(self.authorized(
            Method::DELETE,
            &format!("{POSTS_PATH}/comment/{id}/{comment_id}"),
        )?)
        .await
    }
}
