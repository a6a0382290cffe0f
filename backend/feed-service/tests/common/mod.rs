#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

use feed_service::config::FeedConfig;
use feed_service::db::comment_repo::CommentRecord;
use feed_service::db::{build_comment_trees, ContentStore, FeedWindow, IdentityStore};
use feed_service::error::Result;
use feed_service::models::{CommentNode, Direction, FeedPost, Gender, UserProfile};
use feed_service::services::FeedService;

/// Fixed base instant; posts are placed at `at(minutes)`.
pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap() + Duration::minutes(minutes)
}

/// In-memory users, follows, posts, comments and reactions.
#[derive(Default)]
pub struct SocialFixture {
    users: HashMap<Uuid, UserProfile>,
    follows: HashSet<(Uuid, Uuid)>,
    posts: Vec<FeedPost>,
    comments: Vec<CommentRecord>,
    reactions: HashMap<Uuid, i64>,
}

impl SocialFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&mut self, username: &str, gender: Option<Gender>) -> Uuid {
        let id = Uuid::new_v4();
        self.users.insert(
            id,
            UserProfile {
                id,
                username: username.to_string(),
                full_name: format!("{} Example", username),
                profile_photo: None,
                gender,
            },
        );
        id
    }

    pub fn follow(&mut self, follower: Uuid, followee: Uuid) {
        self.follows.insert((follower, followee));
    }

    pub fn add_post(&mut self, author: Uuid, created_at: DateTime<Utc>) -> Uuid {
        let id = Uuid::new_v4();
        let author = self.users[&author].clone();
        self.posts.push(FeedPost {
            id,
            text: Some(format!("{} at {}", author.username, created_at)),
            author,
            image_url: None,
            created_at,
        });
        id
    }

    pub fn add_comment(
        &mut self,
        post: Uuid,
        parent: Option<Uuid>,
        author: Uuid,
        created_at: DateTime<Utc>,
        text: &str,
    ) -> Uuid {
        let id = Uuid::new_v4();
        let user = &self.users[&author];
        self.comments.push(CommentRecord {
            id,
            post_id: post,
            parent_id: parent,
            text: text.to_string(),
            created_at,
            author_id: user.id,
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            profile_photo: user.profile_photo.clone(),
        });
        id
    }

    pub fn add_reactions(&mut self, post: Uuid, count: i64) {
        *self.reactions.entry(post).or_insert(0) += count;
    }

    pub fn into_service(self) -> FeedService {
        self.into_service_with(FeedConfig::default())
    }

    pub fn into_service_with(self, config: FeedConfig) -> FeedService {
        let store = Arc::new(self);
        FeedService::new(store.clone(), store, config)
    }

    fn by_authors<'a>(&'a self, author_ids: &'a [Uuid]) -> impl Iterator<Item = &'a FeedPost> {
        self.posts
            .iter()
            .filter(move |post| author_ids.contains(&post.author.id))
    }
}

#[async_trait]
impl IdentityStore for SocialFixture {
    async fn find_user(&self, user_id: Uuid) -> Result<Option<UserProfile>> {
        Ok(self.users.get(&user_id).cloned())
    }

    async fn following_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        Ok(self
            .follows
            .iter()
            .filter(|(follower, _)| *follower == user_id)
            .map(|(_, followee)| *followee)
            .collect())
    }
}

#[async_trait]
impl ContentStore for SocialFixture {
    async fn fetch_window(
        &self,
        author_ids: &[Uuid],
        window: &FeedWindow,
    ) -> Result<Vec<FeedPost>> {
        let mut posts: Vec<FeedPost> = self
            .by_authors(author_ids)
            .filter(|post| match (window.bound, window.direction) {
                (None, _) => true,
                (Some(bound), Direction::Older) => post.created_at < bound,
                (Some(bound), Direction::Newer) => post.created_at > bound,
            })
            .cloned()
            .collect();

        posts.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        if window.direction == Direction::Older {
            posts.reverse();
        }
        posts.truncate(window.limit.max(0) as usize);
        Ok(posts)
    }

    async fn exists_beyond(
        &self,
        author_ids: &[Uuid],
        bound: DateTime<Utc>,
        direction: Direction,
    ) -> Result<bool> {
        Ok(self.by_authors(author_ids).any(|post| match direction {
            Direction::Older => post.created_at < bound,
            Direction::Newer => post.created_at > bound,
        }))
    }

    async fn count_posts(&self, author_ids: &[Uuid]) -> Result<i64> {
        Ok(self.by_authors(author_ids).count() as i64)
    }

    async fn comment_trees(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<CommentNode>>> {
        let mut records: Vec<CommentRecord> = self
            .comments
            .iter()
            .filter(|c| post_ids.contains(&c.post_id))
            .cloned()
            .collect();
        records.sort_by_key(|c| c.created_at);
        Ok(build_comment_trees(records))
    }

    async fn reaction_counts(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, i64>> {
        Ok(self
            .reactions
            .iter()
            .filter(|(post, _)| post_ids.contains(post))
            .map(|(post, count)| (*post, *count))
            .collect())
    }
}
