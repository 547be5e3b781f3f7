use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::data::post_repository::PostRepository;
use crate::domain::error::DomainError;
use crate::domain::post::Post;

/// Process-local post store, used for `STORAGE_BACKEND=memory` and in tests.
#[derive(Debug, Clone, Default)]
pub(crate) struct InMemoryPostRepository {
    posts: Arc<RwLock<HashMap<Uuid, Post>>>,
}

impl InMemoryPostRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list_posts(&self) -> Result<Vec<Post>, DomainError> {
        let mut posts: Vec<Post> = self.posts.read().await.values().cloned().collect();
        posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
        Ok(posts)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, DomainError> {
        let mut posts = self.posts.write().await;
        if posts.contains_key(&post.id) {
            return Err(DomainError::Store(format!("duplicate post id {}", post.id)));
        }
        posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn save(&self, post: Post) -> Result<Post, DomainError> {
        let mut posts = self.posts.write().await;
        let stored = posts.get_mut(&post.id).ok_or(DomainError::PostNotFound)?;
        *stored = post.clone();
        Ok(post)
    }

    async fn remove(&self, id: Uuid) -> Result<bool, DomainError> {
        Ok(self.posts.write().await.remove(&id).is_some())
    }
}
