use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::FollowEdge;

/// Writes to the follow graph. The feed only reads it; this keeps the
/// uniqueness and no-self-edge rules next to the table they guard.
#[derive(Clone)]
pub struct FollowRepository {
    pool: PgPool,
}

impl FollowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Idempotent create; returns true if a new edge was inserted.
    pub async fn create_follow(&self, edge: FollowEdge) -> Result<bool> {
        let inserted = sqlx::query_as::<_, (Uuid,)>(
            r#"
            INSERT INTO follows (id, follower_id, followee_id, created_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (follower_id, followee_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(edge.follower_id)
        .bind(edge.followee_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(inserted.is_some())
    }

    /// Idempotent delete; returns true if an edge was removed.
    pub async fn delete_follow(&self, edge: FollowEdge) -> Result<bool> {
        let affected = sqlx::query(
            r#"
            DELETE FROM follows
            WHERE follower_id = $1 AND followee_id = $2
            "#,
        )
        .bind(edge.follower_id)
        .bind(edge.followee_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected > 0)
    }
}
