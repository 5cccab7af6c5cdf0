use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Post {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub caption: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Post plus the aggregates the feed and the notification deriver need.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct PostWithCounts {
    #[serde(flatten)]
    #[ts(flatten)]
    #[sqlx(flatten)]
    pub post: Post,
    pub author_name: String,
    pub likes: i64,
    pub comment_count: i64,
    pub liked_by_me: bool,
}

impl std::ops::Deref for PostWithCounts {
    type Target = Post;
    fn deref(&self) -> &Self::Target {
        &self.post
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreatePost {
    pub caption: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub owner_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Reply {
    pub id: Uuid,
    pub comment_id: Uuid,
    pub owner_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// One comment with its replies, as the client renders a thread.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CommentWithReplies {
    #[serde(flatten)]
    #[ts(flatten)]
    pub comment: Comment,
    pub replies: Vec<Reply>,
}

const POST_WITH_COUNTS_SELECT: &str = r#"SELECT
  p.id,
  p.owner_id,
  p.caption,
  p.image_url,
  p.created_at,
  u.name AS author_name,
  (SELECT COUNT(*) FROM post_likes pl WHERE pl.post_id = p.id) AS likes,
  (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id)     AS comment_count,
  EXISTS (
    SELECT 1 FROM post_likes pl WHERE pl.post_id = p.id AND pl.user_id = $1
  ) AS liked_by_me
FROM posts p
JOIN users u ON u.id = p.owner_id"#;

impl Post {
    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whole feed, newest first, with aggregates computed for `viewer_id`.
    pub async fn find_all_with_counts(
        pool: &SqlitePool,
        viewer_id: Uuid,
    ) -> Result<Vec<PostWithCounts>, sqlx::Error> {
        let sql = format!("{POST_WITH_COUNTS_SELECT} ORDER BY p.created_at DESC");
        sqlx::query_as::<_, PostWithCounts>(&sql)
            .bind(viewer_id)
            .fetch_all(pool)
            .await
    }

    pub async fn create(
        pool: &SqlitePool,
        owner_id: Uuid,
        data: &CreatePost,
        post_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO posts (id, owner_id, caption, image_url)
               VALUES ($1, $2, $3, $4)
               RETURNING *"#,
        )
        .bind(post_id)
        .bind(owner_id)
        .bind(&data.caption)
        .bind(&data.image_url)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Toggle the viewer's like. Returns (liked_now, like_count).
    pub async fn toggle_like(
        pool: &SqlitePool,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<(bool, i64), sqlx::Error> {
        let removed = sqlx::query("DELETE FROM post_likes WHERE post_id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .execute(pool)
            .await?
            .rows_affected();

        let liked_now = if removed == 0 {
            sqlx::query("INSERT INTO post_likes (post_id, user_id) VALUES ($1, $2)")
                .bind(post_id)
                .bind(user_id)
                .execute(pool)
                .await?;
            true
        } else {
            false
        };

        let likes = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM post_likes WHERE post_id = $1",
        )
        .bind(post_id)
        .fetch_one(pool)
        .await?;

        Ok((liked_now, likes))
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts")
            .fetch_one(pool)
            .await
    }
}

impl Comment {
    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_post_id_with_replies(
        pool: &SqlitePool,
        post_id: Uuid,
    ) -> Result<Vec<CommentWithReplies>, sqlx::Error> {
        let comments = sqlx::query_as::<_, Self>(
            "SELECT * FROM comments WHERE post_id = $1 ORDER BY created_at ASC",
        )
        .bind(post_id)
        .fetch_all(pool)
        .await?;

        let mut threads = Vec::with_capacity(comments.len());
        for comment in comments {
            let replies = Reply::find_by_comment_id(pool, comment.id).await?;
            threads.push(CommentWithReplies { comment, replies });
        }
        Ok(threads)
    }

    pub async fn create(
        pool: &SqlitePool,
        post_id: Uuid,
        owner_id: Uuid,
        content: &str,
        comment_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO comments (id, post_id, owner_id, content)
               VALUES ($1, $2, $3, $4)
               RETURNING *"#,
        )
        .bind(comment_id)
        .bind(post_id)
        .bind(owner_id)
        .bind(content)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

impl Reply {
    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM replies WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_comment_id(
        pool: &SqlitePool,
        comment_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM replies WHERE comment_id = $1 ORDER BY created_at ASC",
        )
        .bind(comment_id)
        .fetch_all(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        comment_id: Uuid,
        owner_id: Uuid,
        content: &str,
        reply_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO replies (id, comment_id, owner_id, content)
               VALUES ($1, $2, $3, $4)
               RETURNING *"#,
        )
        .bind(reply_id)
        .bind(comment_id)
        .bind(owner_id)
        .bind(content)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM replies WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
