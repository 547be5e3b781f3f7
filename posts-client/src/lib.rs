//! Клиентская библиотека для работы с `posts-server` по HTTP.
//!
//! Клиент (`PostsClient`) хранит JWT-токен и автоматически использует его в
//! защищённых операциях: создание и удаление постов, лайки, комментарии.
//! Токены выдаёт внешний сервис аккаунтов.
#![warn(missing_docs)]

mod error;
mod http_client;
mod models;

pub use error::{PostsClientError, PostsClientResult};
pub use http_client::PostsClient;
pub use models::{Comment, Like, Post, PostInput};
