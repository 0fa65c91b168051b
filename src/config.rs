// src/config.rs

use dotenvy::dotenv;
use std::env;

/// Minimum number of options a question must offer.
pub const MIN_OPTION_COUNT: usize = 2;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self { database_url, rust_log }
    }
}
