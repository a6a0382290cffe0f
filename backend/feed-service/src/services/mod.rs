//! Service layer for feed-service
//!
//! - cursor: timestamp/type query resolution
//! - candidate: author set for a viewer
//! - gender_ratio: page reshaping for male viewers
//! - envelope: `{count, next, previous, results}` construction
//! - feed: request orchestration over the repository traits

pub mod candidate;
pub mod cursor;
pub mod envelope;
pub mod feed;
pub mod gender_ratio;

pub use candidate::candidate_authors;
pub use cursor::parse_timestamp;
pub use feed::{AssembledFeed, FeedRequest, FeedService};
pub use gender_ratio::{redistribute, RatioOutcome};
