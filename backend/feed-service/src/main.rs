use actix_cors::Cors;
use actix_web::{dev::Service, http::header, web, App, HttpServer};
use anyhow::Context;
use std::io;
use std::sync::Arc;
use std::time::Instant;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use feed_service::config::Config;
use feed_service::db::{PgContentStore, PgIdentityStore};
use feed_service::handlers::{get_feed, health_check, liveness, readiness, FeedHandlerState};
use feed_service::metrics;
use feed_service::middleware::JwtAuthMiddleware;
use feed_service::openapi::ApiDoc;
use feed_service::security::JwtKeys;
use feed_service::services::FeedService;

async fn openapi_json(
    doc: web::Data<utoipa::openapi::OpenApi>,
) -> actix_web::Result<actix_web::HttpResponse> {
    let body = serde_json::to_string(&*doc).map_err(|e| {
        tracing::error!("OpenAPI serialization failed: {}", e);
        actix_web::error::ErrorInternalServerError("OpenAPI serialization error")
    })?;

    Ok(actix_web::HttpResponse::Ok()
        .content_type("application/json")
        .body(body))
}

fn build_cors(allowed_origins: &str) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
        .max_age(3600);

    for origin in allowed_origins.split(',').map(str::trim) {
        if origin == "*" {
            cors = cors.allow_any_origin();
        } else if !origin.is_empty() {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}

async fn connect_database(config: &Config) -> anyhow::Result<sqlx::PgPool> {
    let db_cfg = config.database.pool_config("feed-service");
    db_cfg.log_config();

    let pool = db_pool::create_pool(db_cfg)
        .await
        .context("failed to create database pool")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run database migrations")?;

    Ok(pool)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_thread_ids(true)
                .with_line_number(true)
                .with_file(true)
                .with_target(true),
        )
        .init();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {:#}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting feed-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let pool = match connect_database(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database initialization failed: {:#}", e);
            eprintln!("ERROR: Failed to initialize database: {:#}", e);
            std::process::exit(1);
        }
    };

    let service = Arc::new(FeedService::new(
        Arc::new(PgIdentityStore::new(pool.clone())),
        Arc::new(PgContentStore::new(pool.clone())),
        config.feed.clone(),
    ));
    let feed_state = web::Data::new(FeedHandlerState {
        service,
        public_base_url: config.app.public_base_url.clone(),
    });
    let jwt_keys = Arc::new(JwtKeys::from_secret(&config.auth.jwt_secret));
    let db_data = web::Data::new(pool);
    let openapi_doc = ApiDoc::openapi();
    let allowed_origins = config.cors.allowed_origins.clone();

    let bind_addr = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("HTTP server listening on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(build_cors(&allowed_origins))
            .wrap(TracingLogger::default())
            .wrap_fn(|req, srv| {
                let method = req.method().to_string();
                let path = req
                    .match_pattern()
                    .unwrap_or_else(|| req.path().to_string());
                let start = Instant::now();

                let fut = srv.call(req);
                async move {
                    match fut.await {
                        Ok(res) => {
                            metrics::observe_http_request(
                                &method,
                                &path,
                                res.status().as_u16(),
                                start.elapsed(),
                            );
                            Ok(res)
                        }
                        Err(err) => {
                            let status = err.as_response_error().status_code().as_u16();
                            metrics::observe_http_request(&method, &path, status, start.elapsed());
                            Err(err)
                        }
                    }
                }
            })
            .app_data(web::Data::new(openapi_doc.clone()))
            .app_data(db_data.clone())
            .app_data(feed_state.clone())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url(ApiDoc::openapi_json_path(), openapi_doc.clone()),
            )
            .route(ApiDoc::openapi_json_path(), web::get().to(openapi_json))
            .route("/metrics", web::get().to(metrics::serve_metrics))
            .service(health_check)
            .service(liveness)
            .service(readiness)
            .service(
                web::scope("/feed")
                    .wrap(JwtAuthMiddleware::new(jwt_keys.clone()))
                    .service(get_feed),
            )
    })
    .bind(bind_addr)?
    .shutdown_timeout(30)
    .run()
    .await
}
