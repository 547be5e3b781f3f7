use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::data::post_repository::PostRepository;
use crate::data::profile_repository::ProfileRepository;
use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostInput};

pub(crate) struct PostService {
    posts: Arc<dyn PostRepository>,
    profiles: Arc<dyn ProfileRepository>,
    require_profile: bool,
}

impl PostService {
    pub(crate) fn new(
        posts: Arc<dyn PostRepository>,
        profiles: Arc<dyn ProfileRepository>,
        require_profile: bool,
    ) -> Self {
        Self {
            posts,
            profiles,
            require_profile,
        }
    }

    pub(crate) async fn list_posts(&self) -> Result<Vec<Post>, DomainError> {
        self.posts
            .list_posts()
            .await
            .map_err(|err| store_as(err, DomainError::NoPostsFound))
    }

    pub(crate) async fn get_post(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await
            .map_err(|err| store_as(err, DomainError::NoPostFound))?
            .ok_or(DomainError::NoPostFound)
    }

    pub(crate) async fn create_post(
        &self,
        caller: Uuid,
        input: PostInput,
    ) -> Result<Post, DomainError> {
        let post = Post::new(Uuid::new_v4(), input.checked()?, caller, Utc::now());
        let post = self
            .posts
            .insert(post)
            .await
            .map_err(|err| store_as(err, DomainError::PostNotFound))?;
        info!(post_id = %post.id, user = %caller, "post created");
        Ok(post)
    }

    pub(crate) async fn delete_post(&self, caller: Uuid, post_id: Uuid) -> Result<(), DomainError> {
        self.check_profile(caller).await?;
        let post = self.load_post(post_id).await?;

        if !post.is_owned_by(caller) {
            return Err(DomainError::NotAuthorized);
        }

        let removed = self
            .posts
            .remove(post_id)
            .await
            .map_err(|err| store_as(err, DomainError::PostNotFound))?;
        if !removed {
            return Err(DomainError::PostNotFound);
        }
        info!(%post_id, user = %caller, "post deleted");
        Ok(())
    }

    pub(crate) async fn like_post(&self, caller: Uuid, post_id: Uuid) -> Result<Post, DomainError> {
        self.check_profile(caller).await?;
        let mut post = self.load_post(post_id).await?;
        post.like(caller)?;
        self.persist(post).await
    }

    pub(crate) async fn unlike_post(
        &self,
        caller: Uuid,
        post_id: Uuid,
    ) -> Result<Post, DomainError> {
        self.check_profile(caller).await?;
        let mut post = self.load_post(post_id).await?;
        post.unlike(caller)?;
        self.persist(post).await
    }

    pub(crate) async fn add_comment(
        &self,
        caller: Uuid,
        post_id: Uuid,
        input: PostInput,
    ) -> Result<Post, DomainError> {
        // invalid input never reaches the store
        let input = input.checked()?;
        let mut post = self.load_post(post_id).await?;
        let comment_id = post.add_comment(input, caller, Utc::now());
        debug!(%post_id, %comment_id, "comment added");
        self.persist(post).await
    }

    /// Comment authorship is not checked: any authenticated caller may remove a comment.
    pub(crate) async fn delete_comment(
        &self,
        caller: Uuid,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Post, DomainError> {
        let mut post = self.load_post(post_id).await?;
        post.remove_comment(comment_id)?;
        debug!(%post_id, %comment_id, user = %caller, "comment removed");
        self.persist(post).await
    }

    /// Fails with `PostNotFound` unless the post exists.
    pub(crate) async fn ensure_post_exists(&self, id: Uuid) -> Result<(), DomainError> {
        self.load_post(id).await.map(|_| ())
    }

    async fn load_post(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await
            .map_err(|err| store_as(err, DomainError::PostNotFound))?
            .ok_or(DomainError::PostNotFound)
    }

    async fn persist(&self, post: Post) -> Result<Post, DomainError> {
        self.posts
            .save(post)
            .await
            .map_err(|err| store_as(err, DomainError::PostNotFound))
    }

    async fn check_profile(&self, caller: Uuid) -> Result<(), DomainError> {
        let profile = match self.profiles.find_by_user(caller).await {
            Ok(profile) => profile,
            Err(err) => {
                warn!(user = %caller, error = %err, "profile lookup failed");
                None
            }
        };

        match profile {
            Some(_) => Ok(()),
            None if self.require_profile => Err(DomainError::ProfileNotFound),
            None => {
                debug!(user = %caller, "caller has no profile");
                Ok(())
            }
        }
    }
}

/// Store failures are reported to callers as the operation's not-found error.
fn store_as(err: DomainError, not_found: DomainError) -> DomainError {
    match err {
        DomainError::Store(message) => {
            warn!(error = %message, "store failure reported as not found");
            not_found
        }
        other => other,
    }
}
