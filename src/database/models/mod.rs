pub mod post;
pub mod vote;

pub use post::{Post, PostCreate, PostListQuery, PostOut};
pub use vote::Vote;
