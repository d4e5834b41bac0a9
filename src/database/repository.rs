use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Post, PostCreate, PostListQuery, PostOut};
use crate::database::query_builder::PostQuery;

/// Persistence seam for posts and their votes.
///
/// Mutating methods commit exactly once; a missing row is reported as
/// `None` / `false` rather than as an error so the caller decides what
/// "not found" means.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn list(&self, query: &PostListQuery) -> Result<Vec<PostOut>, DatabaseError>;

    async fn find_with_votes(&self, id: i32) -> Result<Option<PostOut>, DatabaseError>;

    async fn find(&self, id: i32) -> Result<Option<Post>, DatabaseError>;

    async fn insert(&self, owner_id: i32, payload: &PostCreate) -> Result<Post, DatabaseError>;

    /// Full overwrite of title, content and published. Returns the row as
    /// stored after the commit.
    async fn update(&self, id: i32, payload: &PostCreate) -> Result<Option<Post>, DatabaseError>;

    async fn delete(&self, id: i32) -> Result<bool, DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError>;
}

pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PgPostRepository {
    async fn list(&self, query: &PostListQuery) -> Result<Vec<PostOut>, DatabaseError> {
        let sql_result = PostQuery::new()
            .search(query.search.as_str())
            .limit(i64::from(query.limit))
            .offset(i64::from(query.skip))
            .to_sql();

        let rows = PostQuery::build_query_as::<PostOut>(&sql_result)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_with_votes(&self, id: i32) -> Result<Option<PostOut>, DatabaseError> {
        let sql_result = PostQuery::new().id(id).to_sql();

        let row = PostQuery::build_query_as::<PostOut>(&sql_result)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find(&self, id: i32) -> Result<Option<Post>, DatabaseError> {
        let post = sqlx::query_as::<_, Post>(
            "SELECT id, title, content, published, owner_id, created_at
             FROM posts
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn insert(&self, owner_id: i32, payload: &PostCreate) -> Result<Post, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let post = sqlx::query_as::<_, Post>(
            "INSERT INTO posts (title, content, published, owner_id)
             VALUES ($1, $2, $3, $4)
             RETURNING id, title, content, published, owner_id, created_at",
        )
        .bind(&payload.title)
        .bind(&payload.content)
        .bind(payload.published)
        .bind(owner_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(post)
    }

    async fn update(&self, id: i32, payload: &PostCreate) -> Result<Option<Post>, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let post = sqlx::query_as::<_, Post>(
            "UPDATE posts
             SET title = $1, content = $2, published = $3
             WHERE id = $4
             RETURNING id, title, content, published, owner_id, created_at",
        )
        .bind(&payload.title)
        .bind(&payload.content)
        .bind(payload.published)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(post)
    }

    async fn delete(&self, id: i32) -> Result<bool, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
