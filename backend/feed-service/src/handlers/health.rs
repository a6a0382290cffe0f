use actix_web::{get, web, HttpResponse};
use serde_json::json;
use sqlx::PgPool;

/// Service liveness summary
#[utoipa::path(get, path = "/api/v1/health", tag = "health", responses((status = 200, description = "Service is up")))]
#[get("/api/v1/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "feed-service",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[utoipa::path(get, path = "/api/v1/health/live", tag = "health", responses((status = 200, description = "Process is alive")))]
#[get("/api/v1/health/live")]
pub async fn liveness() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "alive" }))
}

/// Ready once PostgreSQL answers `SELECT 1`
#[utoipa::path(
    get,
    path = "/api/v1/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Database reachable"),
        (status = 503, description = "Database unreachable"),
    )
)]
#[get("/api/v1/health/ready")]
pub async fn readiness(pool: web::Data<PgPool>) -> HttpResponse {
    match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(json!({ "status": "ready" })),
        Err(e) => {
            tracing::warn!(error = %e, "readiness probe failed");
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "unavailable",
                "reason": "database unreachable",
            }))
        }
    }
}
