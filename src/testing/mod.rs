use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{Post, PostCreate, PostListQuery, PostOut, Vote};
use crate::database::repository::PostStore;

/// In-process `PostStore` mirroring the SQL semantics: outer join on votes,
/// literal substring search, id ordering, then offset and limit.
pub struct MemoryPostStore {
    inner: RwLock<Tables>,
}

struct Tables {
    posts: Vec<Post>,
    votes: Vec<Vote>,
    next_id: i32,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Ids are handed out from `first_id` upward.
    pub fn starting_at(first_id: i32) -> Self {
        Self {
            inner: RwLock::new(Tables {
                posts: Vec::new(),
                votes: Vec::new(),
                next_id: first_id,
            }),
        }
    }

    pub async fn add_vote(&self, post_id: i32, user_id: i32) {
        self.inner.write().await.votes.push(Vote { post_id, user_id });
    }
}

impl Tables {
    fn with_votes(&self, post: &Post) -> PostOut {
        let votes = self.votes.iter().filter(|v| v.post_id == post.id).count() as i64;
        PostOut {
            post: post.clone(),
            votes,
        }
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn list(&self, query: &PostListQuery) -> Result<Vec<PostOut>, DatabaseError> {
        let tables = self.inner.read().await;
        let mut posts: Vec<&Post> = tables
            .posts
            .iter()
            .filter(|p| p.title.contains(query.search.as_str()))
            .collect();
        posts.sort_by_key(|p| p.id);

        Ok(posts
            .into_iter()
            .skip(query.skip as usize)
            .take(query.limit as usize)
            .map(|p| tables.with_votes(p))
            .collect())
    }

    async fn find_with_votes(&self, id: i32) -> Result<Option<PostOut>, DatabaseError> {
        let tables = self.inner.read().await;
        Ok(tables.posts.iter().find(|p| p.id == id).map(|p| tables.with_votes(p)))
    }

    async fn find(&self, id: i32) -> Result<Option<Post>, DatabaseError> {
        let tables = self.inner.read().await;
        Ok(tables.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, owner_id: i32, payload: &PostCreate) -> Result<Post, DatabaseError> {
        let mut tables = self.inner.write().await;
        let post = Post {
            id: tables.next_id,
            title: payload.title.clone(),
            content: payload.content.clone(),
            published: payload.published,
            owner_id,
            created_at: Utc::now(),
        };
        tables.next_id += 1;
        tables.posts.push(post.clone());
        Ok(post)
    }

    async fn update(&self, id: i32, payload: &PostCreate) -> Result<Option<Post>, DatabaseError> {
        let mut tables = self.inner.write().await;
        Ok(tables.posts.iter_mut().find(|p| p.id == id).map(|post| {
            post.title = payload.title.clone();
            post.content = payload.content.clone();
            post.published = payload.published;
            post.clone()
        }))
    }

    async fn delete(&self, id: i32) -> Result<bool, DatabaseError> {
        let mut tables = self.inner.write().await;
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != id);
        // votes cascade with their post
        tables.votes.retain(|v| v.post_id != id);
        Ok(tables.posts.len() < before)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
