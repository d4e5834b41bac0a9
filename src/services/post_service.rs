use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::auth::AuthUser;
use crate::database::manager::DatabaseError;
use crate::database::models::{Post, PostCreate, PostListQuery, PostOut};
use crate::database::repository::PostStore;

#[derive(Debug, thiserror::Error)]
pub enum PostError {
    #[error("post with id number {0} not found")]
    NotFound(i64),
    #[error("Not authorized to perform requested action")]
    Forbidden,
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// List, read and ownership-gated mutation of posts.
#[derive(Clone)]
pub struct PostService {
    store: Arc<dyn PostStore>,
    enforce_update_ownership: bool,
}

impl PostService {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self {
            store,
            enforce_update_ownership: false,
        }
    }

    /// Make update refuse non-owners the same way delete does.
    pub fn with_update_ownership(mut self, enforce: bool) -> Self {
        self.enforce_update_ownership = enforce;
        self
    }

    pub async fn list(&self, query: &PostListQuery) -> Result<Vec<PostOut>, PostError> {
        debug!(limit = query.limit, skip = query.skip, search = %query.search, "listing posts");
        Ok(self.store.list(query).await?)
    }

    pub async fn get_one(&self, id: i64) -> Result<PostOut, PostError> {
        self.store
            .find_with_votes(Self::row_id(id)?)
            .await?
            .ok_or(PostError::NotFound(id))
    }

    pub async fn create(&self, payload: &PostCreate, user: &AuthUser) -> Result<Post, PostError> {
        let post = self.store.insert(user.id, payload).await?;
        info!(post_id = post.id, owner_id = user.id, "post created");
        Ok(post)
    }

    /// Existence is checked before ownership, so a missing id is NotFound for
    /// every caller.
    pub async fn delete(&self, id: i64, user: &AuthUser) -> Result<(), PostError> {
        let post = self
            .store
            .find(Self::row_id(id)?)
            .await?
            .ok_or(PostError::NotFound(id))?;
        Self::check_owner(&post, user)?;

        if !self.store.delete(post.id).await? {
            // Removed by a concurrent request between lookup and delete
            return Err(PostError::NotFound(id));
        }
        info!(post_id = id, owner_id = user.id, "post deleted");
        Ok(())
    }

    pub async fn update(&self, id: i64, payload: &PostCreate, user: &AuthUser) -> Result<Post, PostError> {
        let post = self
            .store
            .find(Self::row_id(id)?)
            .await?
            .ok_or(PostError::NotFound(id))?;
        if self.enforce_update_ownership {
            Self::check_owner(&post, user)?;
        } else if post.owner_id != user.id {
            warn!(post_id = id, owner_id = post.owner_id, caller_id = user.id, "post updated by non-owner");
        }

        let updated = self
            .store
            .update(post.id, payload)
            .await?
            .ok_or(PostError::NotFound(id))?;
        info!(post_id = id, caller_id = user.id, "post updated");
        Ok(updated)
    }

    pub async fn ping(&self) -> Result<(), PostError> {
        Ok(self.store.ping().await?)
    }

    /// Ids arrive as i64 from the path; anything past the int4 column range
    /// cannot name a row.
    fn row_id(id: i64) -> Result<i32, PostError> {
        i32::try_from(id).map_err(|_| PostError::NotFound(id))
    }

    fn check_owner(post: &Post, user: &AuthUser) -> Result<(), PostError> {
        if post.owner_id != user.id {
            warn!(post_id = post.id, owner_id = post.owner_id, caller_id = user.id, "ownership check failed");
            return Err(PostError::Forbidden);
        }
        Ok(())
    }
}
