use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::post::Post;

/// Document-style access to posts.
///
/// Lookups return `Ok(None)` for absent documents; `Err(DomainError::Store)`
/// is reserved for driver failures.
#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    /// All posts, newest `date` first.
    async fn list_posts(&self) -> Result<Vec<Post>, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError>;
    async fn insert(&self, post: Post) -> Result<Post, DomainError>;
    /// Replaces the stored document with `post` (last write wins).
    async fn save(&self, post: Post) -> Result<Post, DomainError>;
    async fn remove(&self, id: Uuid) -> Result<bool, DomainError>;
}
