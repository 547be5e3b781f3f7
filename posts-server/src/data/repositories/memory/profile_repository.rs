use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::data::profile_repository::ProfileRepository;
use crate::domain::error::DomainError;
use crate::domain::profile::Profile;

#[derive(Debug, Clone, Default)]
pub(crate) struct InMemoryProfileRepository {
    profiles: Arc<RwLock<HashMap<Uuid, Profile>>>,
}

impl InMemoryProfileRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    /// Keyed by owning user; a second profile for the same user replaces the first.
    pub(crate) async fn put(&self, profile: Profile) {
        self.profiles.write().await.insert(profile.user, profile);
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn find_by_user(&self, user: Uuid) -> Result<Option<Profile>, DomainError> {
        Ok(self.profiles.read().await.get(&user).cloned())
    }
}
