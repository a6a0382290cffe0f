use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::IdentityStore;
use crate::error::Result;
use crate::models::{Gender, UserProfile};

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    full_name: String,
    profile_photo: Option<String>,
    gender: Option<String>,
}

impl From<UserRow> for UserProfile {
    fn from(row: UserRow) -> Self {
        UserProfile {
            id: row.id,
            username: row.username,
            full_name: row.full_name,
            profile_photo: row.profile_photo,
            gender: row.gender.as_deref().and_then(Gender::from_db),
        }
    }
}

/// Identity store backed by the `users` and `follows` tables.
#[derive(Clone)]
pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn find_user(&self, user_id: Uuid) -> Result<Option<UserProfile>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, full_name, profile_photo, gender
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserProfile::from))
    }

    async fn following_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT followee_id
            FROM follows
            WHERE follower_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }
}
