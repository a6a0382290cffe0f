/// Configuration management for Feed Service
///
/// Everything is read from environment variables (optionally seeded from a
/// `.env` file by the binary).
use serde::{Deserialize, Serialize};

/// Hard ceiling for `page_size`, regardless of configuration.
pub const PAGE_SIZE_CEILING: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub cors: CorsConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub feed: FeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    pub host: String,
    pub port: u16,
    /// Overrides the scheme://host used in pagination links
    #[serde(default)]
    pub public_base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Pool settings for `service_name`. Timeouts and `DB_MIN_CONNECTIONS`
    /// come from the `DB_*` variables; the URL and pool size always come
    /// from this section, so `DB_MAX_CONNECTIONS` is ignored.
    pub fn pool_config(&self, service_name: &str) -> db_pool::DbConfig {
        let mut pool = db_pool::DbConfig::from_env(service_name)
            .unwrap_or_else(|_| db_pool::DbConfig::with_url(service_name, &self.url));
        pool.database_url = self.url.clone();
        pool.max_connections = self.max_connections;
        pool
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 secret shared with the identity service that issues access tokens
    pub jwt_secret: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .finish()
    }
}

/// Feed pagination and shaping settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    pub default_page_size: usize,
    pub max_page_size: usize,
    /// Share of female-authored posts targeted for male viewers
    pub female_ratio: f64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: PAGE_SIZE_CEILING,
            female_ratio: 0.7,
        }
    }
}

impl FeedConfig {
    /// Resolve a requested page size against the configured default and ceiling.
    pub fn page_size(&self, requested: Option<usize>) -> usize {
        let max = self.max_page_size.clamp(1, PAGE_SIZE_CEILING);
        requested
            .unwrap_or(self.default_page_size)
            .clamp(1, max)
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let production = app_env.eq_ignore_ascii_case("production");

        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if production => return Err("JWT_SECRET must be set in production".to_string()),
            _ => "development-only-secret".to_string(),
        };

        let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
            Ok(value) => value,
            Err(_) if production => {
                return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
            }
            Err(_) => "http://localhost:3000".to_string(),
        };

        let defaults = FeedConfig::default();
        let female_ratio = parse_env_or_default("FEED_FEMALE_RATIO", defaults.female_ratio)?;
        if !(0.0..=1.0).contains(&female_ratio) {
            return Err(format!(
                "FEED_FEMALE_RATIO must be within 0.0..=1.0, got {}",
                female_ratio
            ));
        }

        Ok(Config {
            app: AppConfig {
                env: app_env,
                host: std::env::var("FEED_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("FEED_SERVICE_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8000),
                public_base_url: std::env::var("PUBLIC_BASE_URL")
                    .ok()
                    .map(|url| url.trim_end_matches('/').to_string())
                    .filter(|url| !url.is_empty()),
            },
            cors: CorsConfig { allowed_origins },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/unilink".to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(10),
            },
            auth: AuthConfig { jwt_secret },
            feed: FeedConfig {
                default_page_size: std::env::var("FEED_DEFAULT_PAGE_SIZE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.default_page_size),
                max_page_size: std::env::var("FEED_MAX_PAGE_SIZE")
                    .ok()
                    .and_then(|v| v.parse::<usize>().ok())
                    .map(|v| v.min(PAGE_SIZE_CEILING))
                    .unwrap_or(defaults.max_page_size),
                female_ratio,
            },
        })
    }
}

fn parse_env_or_default(key: &str, default: f64) -> Result<f64, String> {
    match std::env::var(key) {
        Ok(val) => val
            .parse()
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e)),
        Err(_) => Ok(default),
    }
}
