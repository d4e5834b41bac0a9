use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Json, Path, Query, State};

use crate::app::AppState;
use crate::auth::AuthUser;
use crate::database::models::{Post, PostCreate, PostListQuery, PostOut};
use crate::middleware::{ApiResponse, ApiResult};

/// GET /posts/?limit&skip&search - posts with vote counts, no auth
pub async fn list_posts(
    State(state): State<AppState>,
    query: Result<Query<PostListQuery>, QueryRejection>,
) -> ApiResult<Vec<PostOut>> {
    let Query(query) = query?;
    let posts = state.posts.list(&query).await?;
    Ok(ApiResponse::success(posts))
}

/// POST /posts/ - create a post owned by the caller
pub async fn create_post(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<PostCreate>, JsonRejection>,
) -> ApiResult<Post> {
    let Json(payload) = payload?;
    let post = state.posts.create(&payload, &user).await?;
    Ok(ApiResponse::created(post))
}

/// GET /posts/:id - single post with vote count, no auth
pub async fn get_post(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<PostOut> {
    let Path(id) = id?;
    let post = state.posts.get_one(id).await?;
    Ok(ApiResponse::success(post))
}

/// DELETE /posts/:id - owner only, 204 on success
pub async fn delete_post(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    user: AuthUser,
) -> ApiResult<()> {
    let Path(id) = id?;
    state.posts.delete(id, &user).await?;
    Ok(ApiResponse::no_content())
}

/// PUT /posts/:id - full replacement of title, content and published
pub async fn update_post(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    user: AuthUser,
    payload: Result<Json<PostCreate>, JsonRejection>,
) -> ApiResult<Post> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let post = state.posts.update(id, &payload, &user).await?;
    Ok(ApiResponse::success(post))
}
