use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use super::comment_repo::{build_comment_trees, count_reactions_for_posts, find_comments_for_posts};
use super::{ContentStore, FeedWindow};
use crate::error::Result;
use crate::models::{CommentNode, Direction, FeedPost, Gender, UserProfile};

#[derive(Debug, sqlx::FromRow)]
struct FeedPostRow {
    id: Uuid,
    text: Option<String>,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
    author_id: Uuid,
    username: String,
    full_name: String,
    profile_photo: Option<String>,
    gender: Option<String>,
}

impl From<FeedPostRow> for FeedPost {
    fn from(row: FeedPostRow) -> Self {
        FeedPost {
            id: row.id,
            author: UserProfile {
                id: row.author_id,
                username: row.username,
                full_name: row.full_name,
                profile_photo: row.profile_photo,
                gender: row.gender.as_deref().and_then(Gender::from_db),
            },
            text: row.text,
            image_url: row.image_url,
            created_at: row.created_at,
        }
    }
}

const OLDER_WINDOW_SQL: &str = r#"
    SELECT p.id, p.text, p.image_url, p.created_at,
           u.id AS author_id, u.username, u.full_name, u.profile_photo, u.gender
    FROM posts p
    JOIN users u ON u.id = p.user_id
    WHERE p.user_id = ANY($1)
      AND ($2::timestamptz IS NULL OR p.created_at < $2)
    ORDER BY p.created_at DESC, p.id DESC
    LIMIT $3
"#;

const NEWER_WINDOW_SQL: &str = r#"
    SELECT p.id, p.text, p.image_url, p.created_at,
           u.id AS author_id, u.username, u.full_name, u.profile_photo, u.gender
    FROM posts p
    JOIN users u ON u.id = p.user_id
    WHERE p.user_id = ANY($1)
      AND ($2::timestamptz IS NULL OR p.created_at > $2)
    ORDER BY p.created_at ASC, p.id ASC
    LIMIT $3
"#;

/// Content store backed by `posts`, `comments` and `post_reactions`.
#[derive(Clone)]
pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn fetch_window(
        &self,
        author_ids: &[Uuid],
        window: &FeedWindow,
    ) -> Result<Vec<FeedPost>> {
        if author_ids.is_empty() || window.limit <= 0 {
            return Ok(Vec::new());
        }

        let sql = match window.direction {
            Direction::Older => OLDER_WINDOW_SQL,
            Direction::Newer => NEWER_WINDOW_SQL,
        };

        let rows = sqlx::query_as::<_, FeedPostRow>(sql)
            .bind(author_ids)
            .bind(window.bound)
            .bind(window.limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(FeedPost::from).collect())
    }

    async fn exists_beyond(
        &self,
        author_ids: &[Uuid],
        bound: DateTime<Utc>,
        direction: Direction,
    ) -> Result<bool> {
        if author_ids.is_empty() {
            return Ok(false);
        }

        let sql = match direction {
            Direction::Older => {
                "SELECT EXISTS(SELECT 1 FROM posts WHERE user_id = ANY($1) AND created_at < $2)"
            }
            Direction::Newer => {
                "SELECT EXISTS(SELECT 1 FROM posts WHERE user_id = ANY($1) AND created_at > $2)"
            }
        };

        let exists: bool = sqlx::query_scalar(sql)
            .bind(author_ids)
            .bind(bound)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn count_posts(&self, author_ids: &[Uuid]) -> Result<i64> {
        if author_ids.is_empty() {
            return Ok(0);
        }

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE user_id = ANY($1)")
            .bind(author_ids)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn comment_trees(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<CommentNode>>> {
        let records = find_comments_for_posts(&self.pool, post_ids).await?;
        Ok(build_comment_trees(records))
    }

    async fn reaction_counts(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, i64>> {
        Ok(count_reactions_for_posts(&self.pool, post_ids).await?)
    }
}
