use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub owner_id: i32,
    pub created_at: DateTime<Utc>,
}

/// A post paired with the number of votes cast for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PostOut {
    #[serde(rename = "Post")]
    #[sqlx(flatten)]
    pub post: Post,
    pub votes: i64,
}

/// Request body for both creating and replacing a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostCreate {
    pub title: String,
    pub content: String,
    #[serde(default = "default_published")]
    pub published: bool,
}

fn default_published() -> bool {
    true
}

/// Pagination and title search for listing posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostListQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub skip: u32,
    #[serde(default)]
    pub search: String,
}

impl Default for PostListQuery {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            skip: 0,
            search: String::new(),
        }
    }
}

fn default_limit() -> u32 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn published_defaults_to_true() {
        let payload: PostCreate = serde_json::from_value(json!({"title": "A", "content": "x"})).unwrap();
        assert!(payload.published);

        let payload: PostCreate =
            serde_json::from_value(json!({"title": "A", "content": "x", "published": false})).unwrap();
        assert!(!payload.published);
    }

    #[test]
    fn list_query_defaults() {
        let query: PostListQuery = serde_json::from_value(json!({})).unwrap();
        assert_eq!(query, PostListQuery::default());
        assert_eq!(query.limit, 10);
        assert_eq!(query.skip, 0);
        assert_eq!(query.search, "");
    }

    #[test]
    fn missing_content_is_rejected() {
        assert!(serde_json::from_value::<PostCreate>(json!({"title": "A"})).is_err());
    }

    #[test]
    fn post_out_nests_post_under_capitalized_key() {
        let out = PostOut {
            post: Post {
                id: 1,
                title: "A".into(),
                content: "x".into(),
                published: true,
                owner_id: 3,
                created_at: Utc::now(),
            },
            votes: 2,
        };
        let value = serde_json::to_value(&out).unwrap();
        assert_eq!(value["Post"]["title"], "A");
        assert_eq!(value["Post"]["owner_id"], 3);
        assert_eq!(value["votes"], 2);
    }
}
