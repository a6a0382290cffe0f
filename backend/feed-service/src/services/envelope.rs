use chrono::{DateTime, SecondsFormat, Utc};

use crate::models::{Direction, FeedEnvelope, FeedPage, PostItem};

impl FeedEnvelope {
    /// Wrap rendered posts with `count` and the neighbouring page links.
    ///
    /// `base_url` is the absolute feed URL without a query string; links
    /// always carry a freshly built query.
    pub fn build(page: &FeedPage, results: Vec<PostItem>, base_url: &str) -> Self {
        let next = page
            .next_cursor
            .filter(|_| page.has_next)
            .map(|cursor| page_link(base_url, cursor, Direction::Older));
        let previous = page
            .prev_cursor
            .filter(|_| page.has_prev)
            .map(|cursor| page_link(base_url, cursor, Direction::Newer));

        FeedEnvelope {
            count: page.count,
            next,
            previous,
            results,
        }
    }
}

/// `<base>?timestamp=<rfc3339>&type=<old|new>` with the timestamp percent-encoded.
pub fn page_link(base_url: &str, cursor: DateTime<Utc>, direction: Direction) -> String {
    let timestamp = cursor.to_rfc3339_opts(SecondsFormat::Micros, false);
    format!(
        "{}?timestamp={}&type={}",
        base_url,
        urlencoding::encode(&timestamp),
        direction.as_param()
    )
}
