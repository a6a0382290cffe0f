/// OpenAPI documentation for Unilink Feed Service
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models::{CommentNode, FeedEnvelope, PostItem, UserSummary};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Unilink Feed Service API",
        version = "1.0.0",
        description = "Timestamp-paginated home feed built from the posts of followed users and the viewer's own posts.",
        license(
            name = "MIT"
        )
    ),
    paths(
        handlers::feed::get_feed,
        handlers::health::health_check,
        handlers::health::liveness,
        handlers::health::readiness,
    ),
    components(schemas(FeedEnvelope, PostItem, CommentNode, UserSummary)),
    tags(
        (name = "feed", description = "Home feed"),
        (name = "health", description = "Service health checks"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("HS256 access token from the identity service"))
                        .build(),
                ),
            )
        }
    }
}

impl ApiDoc {
    pub fn openapi_json_path() -> &'static str {
        "/api/v1/openapi.json"
    }
}
