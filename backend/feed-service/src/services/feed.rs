//! Feed assembly
//!
//! One request runs these steps:
//! 1. resolve the viewer and their candidate author set
//! 2. range-scan one page in the cursor direction (limit + 1)
//! 3. for male viewers, reshape the page toward the configured female share
//! 4. hydrate posts with comment trees and reaction counts

use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::candidate::candidate_authors;
use super::gender_ratio::{self, RatioOutcome};
use crate::config::FeedConfig;
use crate::db::{ContentStore, FeedWindow, IdentityStore};
use crate::error::{AppError, Result};
use crate::metrics::feed::{record_page, record_reshape};
use crate::models::{Direction, FeedCursor, FeedPage, FeedPost, PostItem};

/// Parameters of one feed request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedRequest {
    pub viewer_id: Uuid,
    pub cursor: FeedCursor,
    pub page_size: usize,
}

/// Page metadata plus the rendered posts, in page order.
#[derive(Debug, Clone)]
pub struct AssembledFeed {
    pub page: FeedPage,
    pub results: Vec<PostItem>,
}

pub struct FeedService {
    identity: Arc<dyn IdentityStore>,
    content: Arc<dyn ContentStore>,
    config: FeedConfig,
}

impl FeedService {
    pub fn new(
        identity: Arc<dyn IdentityStore>,
        content: Arc<dyn ContentStore>,
        config: FeedConfig,
    ) -> Self {
        Self {
            identity,
            content,
            config,
        }
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub async fn assemble(&self, request: &FeedRequest) -> Result<AssembledFeed> {
        let viewer = self
            .identity
            .find_user(request.viewer_id)
            .await?
            .ok_or_else(|| AppError::Authentication("User not found".to_string()))?;

        let following = self.identity.following_ids(viewer.id).await?;
        let authors = candidate_authors(viewer.id, following);

        debug!(
            user_id = %viewer.id,
            authors = authors.len(),
            direction = request.cursor.direction.as_param(),
            page_size = request.page_size,
            "assembling feed"
        );

        let mut page = self
            .fetch_page(&authors, request.cursor, request.page_size)
            .await?;
        record_page(page.direction, request.page_size);

        if gender_ratio::applies_to(&viewer) && !page.items.is_empty() {
            let items = std::mem::take(&mut page.items);
            let RatioOutcome { mut items, applied } = {
                let mut rng = rand::thread_rng();
                gender_ratio::redistribute(items, self.config.female_ratio, &mut rng)
            };
            if applied && page.direction == Direction::Newer {
                items.reverse();
            }
            record_reshape(applied);
            page.items = items;
        }

        let results = self.hydrate(&page.items).await?;

        info!(
            user_id = %viewer.id,
            returned = results.len(),
            has_next = page.has_next,
            has_prev = page.has_prev,
            "feed page served"
        );

        Ok(AssembledFeed { page, results })
    }

    /// Fetch one page of posts by `authors` relative to `cursor`.
    ///
    /// Items are descending for `Older` and ascending for `Newer`. Cursors
    /// are taken from the page edges: `next_cursor` is the oldest item,
    /// `prev_cursor` the newest.
    pub async fn fetch_page(
        &self,
        authors: &[Uuid],
        cursor: FeedCursor,
        page_size: usize,
    ) -> Result<FeedPage> {
        let direction = match cursor.timestamp {
            Some(_) => cursor.direction,
            None => Direction::Older,
        };

        if authors.is_empty() {
            return Ok(empty_page(direction, 0));
        }

        let count = self.content.count_posts(authors).await?;

        let window = FeedWindow {
            bound: cursor.timestamp,
            direction,
            limit: page_size as i64 + 1,
        };
        let mut items = self.content.fetch_window(authors, &window).await?;

        let more_in_direction = items.len() > page_size;
        items.truncate(page_size);

        if items.is_empty() {
            return Ok(empty_page(direction, count));
        }

        let (oldest, newest) = page_edges(&items, direction);

        let (has_next, has_prev) = match direction {
            Direction::Older => {
                let has_prev = match cursor.timestamp {
                    Some(_) => {
                        self.content
                            .exists_beyond(authors, newest, Direction::Newer)
                            .await?
                    }
                    None => false,
                };
                (more_in_direction, has_prev)
            }
            Direction::Newer => {
                let has_next = self
                    .content
                    .exists_beyond(authors, oldest, Direction::Older)
                    .await?;
                (has_next, more_in_direction)
            }
        };

        Ok(FeedPage {
            items,
            direction,
            has_next,
            has_prev,
            next_cursor: Some(oldest),
            prev_cursor: Some(newest),
            count,
        })
    }

    async fn hydrate(&self, posts: &[FeedPost]) -> Result<Vec<PostItem>> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let post_ids: Vec<Uuid> = posts.iter().map(|post| post.id).collect();
        let mut comments = self.content.comment_trees(&post_ids).await?;
        let reactions = self.content.reaction_counts(&post_ids).await?;

        Ok(posts
            .iter()
            .map(|post| PostItem {
                id: post.id,
                user: post.author.summary(),
                text: post.text.clone(),
                image_url: post.image_url.clone(),
                created_at: post.created_at,
                comments: comments.remove(&post.id).unwrap_or_default(),
                reactions_count: reactions.get(&post.id).copied().unwrap_or(0),
            })
            .collect())
    }
}

fn empty_page(direction: Direction, count: i64) -> FeedPage {
    FeedPage {
        items: Vec::new(),
        direction,
        has_next: false,
        has_prev: false,
        next_cursor: None,
        prev_cursor: None,
        count,
    }
}

// (oldest, newest) created_at of a non-empty page
fn page_edges(
    items: &[FeedPost],
    direction: Direction,
) -> (chrono::DateTime<chrono::Utc>, chrono::DateTime<chrono::Utc>) {
    let first = items[0].created_at;
    let last = items[items.len() - 1].created_at;
    match direction {
        Direction::Older => (last, first),
        Direction::Newer => (first, last),
    }
}
