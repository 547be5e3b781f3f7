use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::post::{Comment, Like, Post, PostInput};
use crate::presentation::AppState;
use crate::presentation::http::app_error::{AppError, AppResult};
use crate::presentation::http::middleware::auth::AuthenticatedUser;

/// Body of create-post and add-comment. Fields are optional so that missing
/// ones reach validation instead of failing deserialization.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub(crate) struct PostInputDto {
    pub(crate) text: Option<String>,
    pub(crate) name: Option<String>,
    pub(crate) avatar: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct LikeDto {
    pub(crate) id: Uuid,
    pub(crate) user: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CommentDto {
    pub(crate) id: Uuid,
    pub(crate) text: String,
    pub(crate) name: Option<String>,
    pub(crate) avatar: Option<String>,
    pub(crate) user: Uuid,
    pub(crate) created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDto {
    pub(crate) id: Uuid,
    pub(crate) text: String,
    pub(crate) name: Option<String>,
    pub(crate) avatar: Option<String>,
    pub(crate) user: Uuid,
    pub(crate) likes: Vec<LikeDto>,
    pub(crate) comments: Vec<CommentDto>,
    pub(crate) date: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ProbeDto {
    pub(crate) msg: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct SuccessDto {
    pub(crate) success: bool,
}

impl From<PostInputDto> for PostInput {
    fn from(dto: PostInputDto) -> Self {
        Self {
            text: dto.text,
            name: dto.name,
            avatar: dto.avatar,
        }
    }
}

impl From<Like> for LikeDto {
    fn from(like: Like) -> Self {
        Self {
            id: like.id,
            user: like.user,
        }
    }
}

impl From<Comment> for CommentDto {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            text: comment.text,
            name: comment.name,
            avatar: comment.avatar,
            user: comment.user,
            created_at: comment.created_at,
        }
    }
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            text: post.text,
            name: post.name,
            avatar: post.avatar,
            user: post.user,
            likes: post.likes.into_iter().map(LikeDto::from).collect(),
            comments: post.comments.into_iter().map(CommentDto::from).collect(),
            date: post.date,
        }
    }
}

/// Path ids that are not UUIDs cannot name a stored document.
fn parse_id(raw: &str, not_found: DomainError) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::Domain(not_found))
}

#[utoipa::path(
    get,
    path = "/api/posts/test",
    tag = "posts",
    responses((status = 200, description = "Route probe", body = ProbeDto))
)]
pub(crate) async fn probe() -> Json<ProbeDto> {
    Json(ProbeDto {
        msg: "posts Works".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "posts",
    responses(
        (status = 200, description = "All posts, newest first", body = [PostDto]),
        (status = 404, description = "Posts could not be read")
    )
)]
pub(crate) async fn list_posts(State(state): State<AppState>) -> AppResult<Json<Vec<PostDto>>> {
    let posts = state.post_service.list_posts().await?;
    Ok(Json(posts.into_iter().map(PostDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    tag = "posts",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post found", body = PostDto),
        (status = 404, description = "Post not found")
    )
)]
pub(crate) async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<PostDto>> {
    let id = parse_id(&id, DomainError::NoPostFound)?;
    let post = state.post_service.get_post(id).await?;
    Ok(Json(PostDto::from(post)))
}

#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "posts",
    security(("bearer_auth" = [])),
    request_body = PostInputDto,
    responses(
        (status = 200, description = "Post created", body = PostDto),
        (status = 400, description = "Field errors"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post could not be stored")
    )
)]
pub(crate) async fn create_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    payload: Result<Json<PostInputDto>, JsonRejection>,
) -> AppResult<Json<PostDto>> {
    let Json(dto) = payload?;
    let post = state
        .post_service
        .create_post(auth.user_id, dto.into())
        .await?;
    Ok(Json(PostDto::from(post)))
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    tag = "posts",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post deleted", body = SuccessDto),
        (status = 401, description = "Caller does not own the post"),
        (status = 404, description = "Post not found")
    )
)]
pub(crate) async fn delete_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<SuccessDto>> {
    let id = parse_id(&id, DomainError::PostNotFound)?;
    state.post_service.delete_post(auth.user_id, id).await?;
    Ok(Json(SuccessDto { success: true }))
}

#[utoipa::path(
    post,
    path = "/api/posts/like/{id}",
    tag = "posts",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post liked", body = PostDto),
        (status = 400, description = "Already liked"),
        (status = 404, description = "Post not found")
    )
)]
pub(crate) async fn like_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<PostDto>> {
    let id = parse_id(&id, DomainError::PostNotFound)?;
    let post = state.post_service.like_post(auth.user_id, id).await?;
    Ok(Json(PostDto::from(post)))
}

#[utoipa::path(
    post,
    path = "/api/posts/unlike/{id}",
    tag = "posts",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Like removed", body = PostDto),
        (status = 400, description = "Not liked yet"),
        (status = 404, description = "Post not found")
    )
)]
pub(crate) async fn unlike_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<PostDto>> {
    let id = parse_id(&id, DomainError::PostNotFound)?;
    let post = state.post_service.unlike_post(auth.user_id, id).await?;
    Ok(Json(PostDto::from(post)))
}

#[utoipa::path(
    post,
    path = "/api/posts/comment/{id}",
    tag = "posts",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Post id")),
    request_body = PostInputDto,
    responses(
        (status = 200, description = "Comment added", body = PostDto),
        (status = 400, description = "Field errors"),
        (status = 404, description = "Post not found")
    )
)]
pub(crate) async fn add_comment(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<String>,
    payload: Result<Json<PostInputDto>, JsonRejection>,
) -> AppResult<Json<PostDto>> {
    let Json(dto) = payload?;
    let input = PostInput::from(dto);
    let Ok(id) = Uuid::parse_str(&id) else {
        // a bad body is reported before a malformed id
        input.checked()?;
        return Err(DomainError::PostNotFound.into());
    };
    let post = state
        .post_service
        .add_comment(auth.user_id, id, input)
        .await?;
    Ok(Json(PostDto::from(post)))
}

#[utoipa::path(
    delete,
    path = "/api/posts/comment/{id}/{comment_id}",
    tag = "posts",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Post id"),
        ("comment_id" = String, Path, description = "Comment id")
    ),
    responses(
        (status = 200, description = "Comment removed", body = PostDto),
        (status = 404, description = "Post or comment not found")
    )
)]
pub(crate) async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path((id, comment_id)): Path<(String, String)>,
) -> AppResult<Json<PostDto>> {
    let id = parse_id(&id, DomainError::PostNotFound)?;
    let Ok(comment_id) = Uuid::parse_str(&comment_id) else {
        state.post_service.ensure_post_exists(id).await?;
        return Err(DomainError::CommentNotExists.into());
    };

    let post = state
        .post_service
        .delete_comment(auth.user_id, id, comment_id)
        .await?;
    Ok(Json(PostDto::from(post)))
}
