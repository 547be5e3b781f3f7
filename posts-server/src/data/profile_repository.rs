use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::profile::Profile;

#[async_trait]
pub(crate) trait ProfileRepository: Send + Sync {
    async fn find_by_user(&self, user: Uuid) -> Result<Option<Profile>, DomainError>;
}
