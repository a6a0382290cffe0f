/// Database access layer
///
/// The feed reads through two repository traits so handlers and services
/// never touch SQL directly:
/// - `IdentityStore`: user profiles and the follow graph
/// - `ContentStore`: post range scans plus the comment/reaction projection
pub mod comment_repo;
pub mod follow_repo;
pub mod post_repo;
pub mod user_repo;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{CommentNode, Direction, FeedPost, UserProfile};

pub use comment_repo::build_comment_trees;
pub use follow_repo::FollowRepository;
pub use post_repo::PgContentStore;
pub use user_repo::PgIdentityStore;

/// Range scan parameters for one feed page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedWindow {
    /// Exclusive bound; `None` scans from the newest post
    pub bound: Option<DateTime<Utc>>,
    pub direction: Direction,
    pub limit: i64,
}

#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_user(&self, user_id: Uuid) -> Result<Option<UserProfile>>;

    /// Ids of every user that `user_id` follows.
    async fn following_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>>;
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Posts by `author_ids` inside `window`, ordered for its direction:
    /// descending for `Older`, ascending for `Newer`.
    async fn fetch_window(&self, author_ids: &[Uuid], window: &FeedWindow)
        -> Result<Vec<FeedPost>>;

    /// Whether any post by `author_ids` lies strictly beyond `bound` in `direction`.
    async fn exists_beyond(
        &self,
        author_ids: &[Uuid],
        bound: DateTime<Utc>,
        direction: Direction,
    ) -> Result<bool>;

    async fn count_posts(&self, author_ids: &[Uuid]) -> Result<i64>;

    /// First-level comments per post, each carrying its replies.
    async fn comment_trees(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<CommentNode>>>;

    async fn reaction_counts(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, i64>>;
}
