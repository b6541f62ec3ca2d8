use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

pub const TMDB_BASE: &str = "https://api.themoviedb.org/3";
pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

pub const ITEMS_PER_PAGE: u64 = 20;
pub const MAX_CAST_MEMBERS: usize = 5;
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// TMDB company id for Cartoon Network. Every catalog page is scoped to it.
pub const STUDIO_COMPANY_ID: &str = "7899";
pub const CATALOG_SORT: &str = "popularity.desc";

pub const DEFAULT_PORT: u16 = 7000;

#[derive(Debug, Clone)]
pub struct Config {
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let tmdb_api_key = env::var("TMDB_API_KEY")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow::anyhow!("TMDB_API_KEY environment variable is required"))?;
        let port = match env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got '{}'", raw))?,
            Err(_) => DEFAULT_PORT,
        };
        Ok(Self {
            tmdb_api_key,
            tmdb_base_url: TMDB_BASE.to_string(),
            port,
        })
    }
}
