use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row per (user, post). Uniqueness of the pair belongs to the table's
/// primary key, not to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Vote {
    pub post_id: i32,
    pub user_id: i32,
}
