use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use super::map_db_error;
use crate::data::post_repository::PostRepository;
use crate::domain::error::DomainError;
use crate::domain::post::{Comment, Like, Post};

#[derive(Debug, Clone)]
pub(crate) struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    text: String,
    name: Option<String>,
    avatar: Option<String>,
    user_id: Uuid,
    likes: Json<Vec<Like>>,
    comments: Json<Vec<Comment>>,
    date: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            text: row.text,
            name: row.name,
            avatar: row.avatar,
            user: row.user_id,
            likes: row.likes.0,
            comments: row.comments.0,
            date: row.date,
        }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list_posts(&self) -> Result<Vec<Post>, DomainError> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, text, name, avatar, user_id, likes, comments, date
            FROM posts
            ORDER BY date DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, text, name, avatar, user_id, likes, comments, date
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(Post::from))
    }

    async fn insert(&self, post: Post) -> Result<Post, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (id, text, name, avatar, user_id, likes, comments, date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, text, name, avatar, user_id, likes, comments, date
            "#,
        )
        .bind(post.id)
        .bind(&post.text)
        .bind(&post.name)
        .bind(&post.avatar)
        .bind(post.user)
        .bind(Json(&post.likes))
        .bind(Json(&post.comments))
        .bind(post.date)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.into())
    }

    async fn save(&self, post: Post) -> Result<Post, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
            SET text = $2,
                name = $3,
                avatar = $4,
                likes = $5,
                comments = $6
            WHERE id = $1
            RETURNING id, text, name, avatar, user_id, likes, comments, date
            "#,
        )
        .bind(post.id)
        .bind(&post.text)
        .bind(&post.name)
        .bind(&post.avatar)
        .bind(Json(&post.likes))
        .bind(Json(&post.comments))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        // the document may have been removed between read and save
        row.map(Post::from).ok_or(DomainError::PostNotFound)
    }

    async fn remove(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
