use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Gender choices recorded on a user profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Others,
}

impl Gender {
    /// Unknown or empty values map to `None` (unspecified).
    pub fn from_db(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            "others" => Some(Self::Others),
            _ => None,
        }
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Others => "others",
        }
    }
}

/// Identity-store view of a user.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub profile_photo: Option<String>,
    pub gender: Option<Gender>,
}

impl UserProfile {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            full_name: self.full_name.clone(),
            profile_photo: self.profile_photo.clone(),
        }
    }
}

/// Reduced profile projection embedded in posts and comments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub profile_photo: Option<String>,
}

/// Directed follow relation: `follower_id` follows `followee_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FollowEdge {
    pub follower_id: Uuid,
    pub followee_id: Uuid,
}

impl FollowEdge {
    pub fn new(follower_id: Uuid, followee_id: Uuid) -> Result<Self> {
        if follower_id == followee_id {
            return Err(AppError::InvalidInput("Cannot follow yourself".to_string()));
        }
        Ok(Self {
            follower_id,
            followee_id,
        })
    }
}

/// A post together with the author fields the feed needs.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedPost {
    pub id: Uuid,
    pub author: UserProfile,
    pub text: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Scan direction relative to the cursor timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// `created_at < cursor`, newest first
    #[default]
    Older,
    /// `created_at > cursor`, oldest first
    Newer,
}

impl Direction {
    /// Wire value of the `type` query parameter.
    pub fn as_param(&self) -> &'static str {
        match self {
            Self::Older => "old",
            Self::Newer => "new",
        }
    }
}

/// Position marker resolved from a feed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeedCursor {
    pub timestamp: Option<DateTime<Utc>>,
    pub direction: Direction,
}

/// One page of the feed before it is rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedPage {
    pub items: Vec<FeedPost>,
    pub direction: Direction,
    /// Older posts exist beyond this page
    pub has_next: bool,
    /// Newer posts exist beyond this page
    pub has_prev: bool,
    /// created_at of the oldest fetched item
    pub next_cursor: Option<DateTime<Utc>>,
    /// created_at of the newest fetched item
    pub prev_cursor: Option<DateTime<Utc>>,
    /// Size of the whole candidate set
    pub count: i64,
}

/// Comment with its direct replies nested under `subcomments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CommentNode {
    pub id: Uuid,
    pub user: UserSummary,
    pub post: Uuid,
    pub parent: Option<Uuid>,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[schema(no_recursion)]
    pub subcomments: Vec<CommentNode>,
}

/// Post as rendered in `results`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PostItem {
    pub id: Uuid,
    pub user: UserSummary,
    pub text: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub comments: Vec<CommentNode>,
    pub reactions_count: i64,
}

/// Paginated response body of `GET /feed/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FeedEnvelope {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<PostItem>,
}
