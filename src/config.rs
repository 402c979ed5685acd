// src/config.rs

use std::{env, net::SocketAddr};

use dotenvy::dotenv;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://surveys.db?mode=rwc";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("BIND_ADDR is not a socket address: {0}")]
    BindAddr(#[from] std::net::AddrParseError),

    #[error("API_URL is not a valid url: {0}")]
    ApiUrl(#[from] url::ParseError),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,
    pub bind_addr: SocketAddr,
    /// Origins allowed by CORS.
    pub allowed_origins: Vec<String>,
    /// Base url the transport client talks to.
    pub api_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            .parse()?;

        let allowed_origins = parse_origins(
            &env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string()),
        );

        let api_url = env::var("API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        url::Url::parse(&api_url)?;

        Ok(Self {
            database_url,
            rust_log,
            bind_addr,
            allowed_origins,
            api_url,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            rust_log: "info".to_string(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            allowed_origins: parse_origins(DEFAULT_ALLOWED_ORIGINS),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
