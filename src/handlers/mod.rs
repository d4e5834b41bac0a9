// handlers/mod.rs
//
// Public: GET /, GET /health, GET /posts/, GET /posts/:id
// Bearer token required: POST /posts/, PUT /posts/:id, DELETE /posts/:id
//
// Authentication is an extractor (`AuthUser`), so each handler states in its
// signature whether it needs a caller identity.
pub mod posts;
pub mod system;

pub use posts::{create_post, delete_post, get_post, list_posts, update_post};
pub use system::{health, root};
