pub mod feed;
pub mod health;

pub use feed::{get_feed, FeedHandlerState, FeedQueryParams};
pub use health::{health_check, liveness, readiness};
