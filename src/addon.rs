use std::sync::Arc;
use tracing::{debug, info};

use crate::config::{ITEMS_PER_PAGE, MAX_CAST_MEMBERS};
use crate::error::{classify, AddonError, OperationContext};
use crate::ids::{format_external_id, parse_external_id};
use crate::images::{background_url, poster_url};
use crate::models::{ContentKind, MetaDetail, MetaPreview};
use crate::tmdb::{Credits, DiscoverItem, ItemDetail, TmdbApi};

pub const POSTER_SHAPE: &str = "regular";
pub const UNKNOWN_DIRECTOR: &str = "Unknown";

/// Catalog and meta handlers backed by TMDB.
#[derive(Clone)]
pub struct Addon {
    tmdb: Arc<dyn TmdbApi>,
}

impl Addon {
    pub fn new(tmdb: Arc<dyn TmdbApi>) -> Self {
        Self { tmdb }
    }

    pub async fn list_catalog(
        &self,
        kind: ContentKind,
        skip: Option<u64>,
    ) -> Result<Vec<MetaPreview>, AddonError> {
        let page = page_for_skip(skip);
        info!("Fetching {} catalog page {}", kind, page);
        let data = self
            .tmdb
            .discover(kind, page)
            .await
            .map_err(|e| classify(e, OperationContext::Catalog))?;
        Ok(data
            .results
            .into_iter()
            .map(|item| preview_from_discover(kind, item))
            .collect())
    }

    pub async fn get_detail(
        &self,
        kind: ContentKind,
        external_id: &str,
    ) -> Result<MetaDetail, AddonError> {
        let tmdb_id = parse_external_id(external_id)?;
        debug!(kind = %kind, tmdb_id, "Fetching detail and credits");
        let (detail, credits) = tokio::try_join!(
            self.tmdb.details(kind, tmdb_id),
            self.tmdb.credits(kind, tmdb_id),
        )
        .map_err(|e| classify(e, OperationContext::Meta))?;
        Ok(merge_detail(kind, detail, credits))
    }
}

/// Upstream pages are 1-indexed and hold `ITEMS_PER_PAGE` results.
pub fn page_for_skip(skip: Option<u64>) -> u64 {
    skip.map(|s| s / ITEMS_PER_PAGE + 1).unwrap_or(1)
}

/// Year from the leading digits of a `YYYY-MM-DD` date.
pub fn release_year(date: Option<&str>) -> Option<i32> {
    let year = date?.get(..4)?;
    if !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    year.parse().ok()
}

// Series go through the same movie-shaped fields (`title`, `release_date`).
// TMDB TV payloads use `name`/`first_air_date`, so these can come back empty.
// Kept as-is until the expected series mapping is confirmed.
fn preview_from_discover(kind: ContentKind, item: DiscoverItem) -> MetaPreview {
    MetaPreview {
        id: format_external_id(kind, item.id),
        kind,
        name: item.title.unwrap_or_default(),
        poster: poster_url(item.poster_path.as_deref()),
        background: background_url(item.backdrop_path.as_deref()),
        poster_shape: POSTER_SHAPE.to_string(),
        imdb_rating: item.vote_average,
        year: release_year(item.release_date.as_deref()),
        description: item.overview.unwrap_or_default(),
    }
}

fn merge_detail(kind: ContentKind, detail: ItemDetail, credits: Credits) -> MetaDetail {
    let cast = credits
        .cast
        .iter()
        .take(MAX_CAST_MEMBERS)
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let director = credits
        .crew
        .into_iter()
        .find(|c| c.job.as_deref() == Some("Director"))
        .map(|c| c.name)
        .unwrap_or_else(|| UNKNOWN_DIRECTOR.to_string());
    let genres = detail
        .genres
        .iter()
        .map(|g| g.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let country = detail
        .production_countries
        .and_then(|c| c.into_iter().next())
        .map(|c| c.name);

    MetaDetail {
        preview: MetaPreview {
            id: format_external_id(kind, detail.id),
            kind,
            name: detail.title.unwrap_or_default(),
            poster: poster_url(detail.poster_path.as_deref()),
            background: background_url(detail.backdrop_path.as_deref()),
            poster_shape: POSTER_SHAPE.to_string(),
            imdb_rating: detail.vote_average,
            year: release_year(detail.release_date.as_deref()),
            description: detail.overview.unwrap_or_default(),
        },
        genres,
        cast,
        director,
        runtime: detail.runtime,
        language: detail.original_language,
        country,
    }
}
