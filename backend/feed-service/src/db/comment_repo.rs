use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::{CommentNode, UserSummary};

/// Flat comment row as stored; `parent_id` is `None` for first-level comments.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentRecord {
    pub id: Uuid,
    pub post_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub username: String,
    pub full_name: String,
    pub profile_photo: Option<String>,
}

/// Fetch every comment on `post_ids`, oldest first.
pub async fn find_comments_for_posts(
    pool: &PgPool,
    post_ids: &[Uuid],
) -> Result<Vec<CommentRecord>, sqlx::Error> {
    if post_ids.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_as::<_, CommentRecord>(
        r#"
        SELECT c.id, c.post_id, c.parent_id, c.text, c.created_at,
               u.id AS author_id, u.username, u.full_name, u.profile_photo
        FROM comments c
        JOIN users u ON u.id = c.user_id
        WHERE c.post_id = ANY($1)
        ORDER BY c.created_at ASC, c.id ASC
        "#,
    )
    .bind(post_ids)
    .fetch_all(pool)
    .await
}

/// Reaction totals per post; posts without reactions are absent from the map.
pub async fn count_reactions_for_posts(
    pool: &PgPool,
    post_ids: &[Uuid],
) -> Result<HashMap<Uuid, i64>, sqlx::Error> {
    if post_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = sqlx::query_as::<_, (Uuid, i64)>(
        r#"
        SELECT post_id, COUNT(*) AS reactions
        FROM post_reactions
        WHERE post_id = ANY($1)
        GROUP BY post_id
        "#,
    )
    .bind(post_ids)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().collect())
}

/// Group flat rows into per-post trees of first-level comments.
///
/// Input order is kept at every level. Replies whose parent is not among
/// `rows` are dropped.
pub fn build_comment_trees(rows: Vec<CommentRecord>) -> HashMap<Uuid, Vec<CommentNode>> {
    let mut replies: HashMap<Uuid, Vec<CommentRecord>> = HashMap::new();
    let mut roots = Vec::new();

    for row in rows {
        match row.parent_id {
            Some(parent) => replies.entry(parent).or_default().push(row),
            None => roots.push(row),
        }
    }

    let mut trees: HashMap<Uuid, Vec<CommentNode>> = HashMap::new();
    for root in roots {
        let post_id = root.post_id;
        let node = attach_replies(root, &mut replies);
        trees.entry(post_id).or_default().push(node);
    }

    trees
}

// Each reply list is removed once it is attached, so a malformed parent
// cycle cannot recurse forever.
fn attach_replies(
    record: CommentRecord,
    replies: &mut HashMap<Uuid, Vec<CommentRecord>>,
) -> CommentNode {
    let children = replies.remove(&record.id).unwrap_or_default();
    let subcomments = children
        .into_iter()
        .map(|child| attach_replies(child, replies))
        .collect();

    CommentNode {
        id: record.id,
        user: UserSummary {
            id: record.author_id,
            username: record.username,
            full_name: record.full_name,
            profile_photo: record.profile_photo,
        },
        post: record.post_id,
        parent: record.parent_id,
        text: record.text,
        created_at: record.created_at,
        subcomments,
    }
}
