use actix_web::{get, web, HttpRequest, HttpResponse};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;
use utoipa::IntoParams;

use crate::error::Result;
use crate::middleware::UserId;
use crate::models::{FeedCursor, FeedEnvelope};
use crate::services::{FeedRequest, FeedService};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FeedQueryParams {
    /// Cursor timestamp (RFC 3339); ignored when unparseable
    pub timestamp: Option<String>,
    /// `old` (default) or `new`
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Page size, 1..=100 (default 20)
    pub page_size: Option<String>,
}

impl FeedQueryParams {
    fn requested_page_size(&self) -> Option<usize> {
        // Non-numeric values fall back to the default
        self.page_size
            .as_deref()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
    }
}

pub struct FeedHandlerState {
    pub service: Arc<FeedService>,
    /// Replaces scheme://host from the connection when building page links
    pub public_base_url: Option<String>,
}

/// Home feed of the authenticated user
#[utoipa::path(
    get,
    path = "/feed/",
    tag = "feed",
    params(FeedQueryParams),
    responses(
        (status = 200, description = "One page of the feed", body = FeedEnvelope),
        (status = 401, description = "Missing or invalid access token"),
    ),
    security(("bearer_auth" = []))
)]
#[get("/")]
pub async fn get_feed(
    user: UserId,
    query: web::Query<FeedQueryParams>,
    http_req: HttpRequest,
    state: web::Data<FeedHandlerState>,
) -> Result<HttpResponse> {
    let cursor = FeedCursor::from_params(query.timestamp.as_deref(), query.kind.as_deref());
    let page_size = state
        .service
        .config()
        .page_size(query.requested_page_size());

    debug!(
        user_id = %user.0,
        timestamp = ?cursor.timestamp,
        direction = cursor.direction.as_param(),
        page_size,
        "feed request"
    );

    let request = FeedRequest {
        viewer_id: user.0,
        cursor,
        page_size,
    };
    let feed = state.service.assemble(&request).await?;

    let base_url = feed_base_url(&http_req, state.public_base_url.as_deref());
    let envelope = FeedEnvelope::build(&feed.page, feed.results, &base_url);

    Ok(HttpResponse::Ok().json(envelope))
}

fn feed_base_url(req: &HttpRequest, public_base_url: Option<&str>) -> String {
    match public_base_url {
        Some(base) => format!("{}{}", base.trim_end_matches('/'), req.path()),
        None => {
            let conn = req.connection_info();
            format!("{}://{}{}", conn.scheme(), conn.host(), req.path())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn page_size_parsing_is_lenient() {
        let params = |raw: Option<&str>| FeedQueryParams {
            page_size: raw.map(str::to_string),
            ..FeedQueryParams::default()
        };
        assert_eq!(params(Some("15")).requested_page_size(), Some(15));
        assert_eq!(params(Some(" 7 ")).requested_page_size(), Some(7));
        assert_eq!(params(Some("lots")).requested_page_size(), None);
        assert_eq!(params(Some("-3")).requested_page_size(), None);
        assert_eq!(params(None).requested_page_size(), None);
    }

    #[test]
    fn base_url_prefers_public_override() {
        let req = TestRequest::get()
            .uri("/feed/?timestamp=x")
            .insert_header(("Host", "internal:8000"))
            .to_http_request();

        assert_eq!(feed_base_url(&req, None), "http://internal:8000/feed/");
        assert_eq!(
            feed_base_url(&req, Some("https://api.unilink.app/")),
            "https://api.unilink.app/feed/"
        );
    }
}
