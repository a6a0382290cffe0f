pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod security;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
