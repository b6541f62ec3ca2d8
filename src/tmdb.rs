use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::time::Duration;

use crate::config::{Config, CATALOG_SORT, REQUEST_TIMEOUT, STUDIO_COMPANY_ID};
use crate::error::UpstreamError;
use crate::models::ContentKind;

pub type UpstreamResult<T> = std::result::Result<T, UpstreamError>;

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

#[async_trait]
pub trait TmdbApi: Send + Sync {
    async fn discover(&self, kind: ContentKind, page: u64) -> UpstreamResult<DiscoverPage>;
    async fn details(&self, kind: ContentKind, id: u64) -> UpstreamResult<ItemDetail>;
    async fn credits(&self, kind: ContentKind, id: u64) -> UpstreamResult<Credits>;
}

impl TmdbClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(api_key, base_url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let user_agent = format!("cartoonlink/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to build TMDB HTTP client")?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.tmdb_api_key.clone(), config.tmdb_base_url.clone())
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> UpstreamResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let res = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;
        let status = res.status();
        let text = res.text().await.map_err(|e| self.request_error(e))?;
        if !status.is_success() {
            let body = serde_json::from_str::<Value>(&text)
                .unwrap_or_else(|_| Value::String(text.clone()));
            return Err(UpstreamError::http(status.as_u16(), Some(body)));
        }
        serde_json::from_str(&text)
            .map_err(|e| UpstreamError::transport(format!("JSON parse failed for {}: {}", path, e)))
    }

    fn request_error(&self, err: reqwest::Error) -> UpstreamError {
        if err.is_timeout() {
            return UpstreamError::transport(format!(
                "timeout of {}ms exceeded",
                self.timeout.as_millis()
            ));
        }
        UpstreamError::transport(err.without_url().to_string())
    }
}

#[async_trait]
impl TmdbApi for TmdbClient {
    async fn discover(&self, kind: ContentKind, page: u64) -> UpstreamResult<DiscoverPage> {
        let path = format!("/discover/{}", kind.tmdb_family());
        let params = [
            ("page", page.to_string()),
            ("sort_by", CATALOG_SORT.to_string()),
            ("with_companies", STUDIO_COMPANY_ID.to_string()),
        ];
        self.get_json(&path, &params).await
    }

    async fn details(&self, kind: ContentKind, id: u64) -> UpstreamResult<ItemDetail> {
        let path = format!("/{}/{id}", kind.tmdb_family());
        self.get_json(&path, &[]).await
    }

    async fn credits(&self, kind: ContentKind, id: u64) -> UpstreamResult<Credits> {
        let path = format!("/{}/{id}/credits", kind.tmdb_family());
        self.get_json(&path, &[]).await
    }
}

/// TMDB sends explicit `null` for some fields; treat it like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscoverPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<DiscoverItem>,
}

/// One discover result. TV results carry `name`/`first_air_date` instead of
/// `title`/`release_date`; only the movie-shaped fields are read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscoverItem {
    pub id: u64,
    pub title: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_average: f64,
    pub release_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemDetail {
    pub id: u64,
    pub title: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_average: f64,
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<Genre>,
    pub runtime: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub original_language: String,
    pub production_countries: Option<Vec<ProductionCountry>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Genre {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductionCountry {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credits {
    #[serde(default, deserialize_with = "null_as_default")]
    pub cast: Vec<CastMember>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CastMember {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrewMember {
    pub name: String,
    pub job: Option<String>,
}
