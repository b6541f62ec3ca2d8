use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use cartoonlink::addon::Addon;
use cartoonlink::error::AddonError;
use cartoonlink::models::ContentKind;
use cartoonlink::tmdb::{TmdbApi, TmdbClient};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const API_KEY: &str = "test-key";

#[derive(Clone, Default)]
struct Upstream {
    queries: Arc<Mutex<Vec<(String, HashMap<String, String>)>>>,
    detail_status: Option<u16>,
    credits_delay: Option<Duration>,
}

async fn discover(
    State(up): State<Upstream>,
    Path(family): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    up.queries
        .lock()
        .unwrap()
        .push((format!("/discover/{family}"), params));
    if family == "tv" {
        return Json(json!({
            "page": 1,
            "results": [{
                "id": 2004,
                "name": "The Powerpuff Girls",
                "first_air_date": "1998-11-18",
                "overview": "Sugar, spice",
                "poster_path": "/ppg.jpg",
                "backdrop_path": null,
                "vote_average": 7.3
            }]
        }))
        .into_response();
    }
    Json(json!({
        "page": 2,
        "results": [{
            "id": 15060,
            "title": "Scooby-Doo",
            "release_date": "2002-06-14",
            "overview": "Mystery Inc.",
            "poster_path": "/scooby.jpg",
            "backdrop_path": "/scooby-bg.jpg",
            "vote_average": 6.4
        }, {
            "id": 16000,
            "title": "Unrated Special",
            "release_date": null,
            "overview": null,
            "poster_path": null,
            "backdrop_path": null,
            "vote_average": null
        }]
    }))
    .into_response()
}

async fn detail(
    State(up): State<Upstream>,
    Path((family, id)): Path<(String, u64)>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    up.queries
        .lock()
        .unwrap()
        .push((format!("/{family}/{id}"), params));
    if let Some(code) = up.detail_status {
        let status = StatusCode::from_u16(code).unwrap();
        return (status, Json(json!({ "status_code": 25, "status_message": "limit" })))
            .into_response();
    }
    Json(json!({
        "id": id,
        "title": "Samurai Jack",
        "overview": "Gotta get back",
        "release_date": "2001-08-10",
        "genres": [{ "id": 16, "name": "Animation" }],
        "runtime": 90,
        "original_language": "en",
        "production_countries": [{ "iso_3166_1": "US", "name": "United States of America" }],
        "vote_average": 8.1
    }))
    .into_response()
}

async fn credits(
    State(up): State<Upstream>,
    Path((_family, id)): Path<(String, u64)>,
) -> Response {
    if let Some(delay) = up.credits_delay {
        tokio::time::sleep(delay).await;
    }
    Json(json!({
        "id": id,
        "cast": [{ "name": "Phil LaMarr" }, { "name": "Mako" }],
        "crew": [{ "name": "Genndy Tartakovsky", "job": "Director" }]
    }))
    .into_response()
}

async fn spawn_upstream(up: Upstream) -> String {
    let app = Router::new()
        .route("/discover/:family", get(discover))
        .route("/:family/:id", get(detail))
        .route("/:family/:id/credits", get(credits))
        .with_state(up);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn addon_against(up: Upstream) -> Addon {
    let base = spawn_upstream(up).await;
    Addon::new(Arc::new(TmdbClient::new(API_KEY, base).unwrap()))
}

#[tokio::test]
async fn discover_sends_page_sort_and_company_filter() {
    let up = Upstream::default();
    let addon = addon_against(up.clone()).await;

    let metas = addon
        .list_catalog(ContentKind::Movie, Some(20))
        .await
        .unwrap();
    assert_eq!(metas.len(), 2);
    assert_eq!(metas[0].id, "tmdb:15060");
    assert_eq!(metas[0].year, Some(2002));
    assert_eq!(metas[1].id, "tmdb:16000");
    assert_eq!(metas[1].imdb_rating, 0.0);
    assert!(metas[1].poster.is_none());

    let queries = up.queries.lock().unwrap();
    let (path, params) = &queries[0];
    assert_eq!(path, "/discover/movie");
    assert_eq!(params.get("api_key").map(String::as_str), Some(API_KEY));
    assert_eq!(params.get("page").map(String::as_str), Some("2"));
    assert_eq!(
        params.get("sort_by").map(String::as_str),
        Some("popularity.desc")
    );
    assert_eq!(params.get("with_companies").map(String::as_str), Some("7899"));
}

#[tokio::test]
async fn series_discover_reads_movie_shaped_fields() {
    let up = Upstream::default();
    let addon = addon_against(up.clone()).await;

    let metas = addon.list_catalog(ContentKind::Series, None).await.unwrap();
    assert_eq!(up.queries.lock().unwrap()[0].0, "/discover/tv");
    assert_eq!(metas[0].id, "tmdb:2004");
    assert_eq!(metas[0].name, "");
    assert_eq!(metas[0].year, None);
    assert_eq!(
        metas[0].poster.as_deref(),
        Some("https://image.tmdb.org/t/p/w500/ppg.jpg")
    );
}

#[tokio::test]
async fn detail_hits_family_endpoints() {
    let up = Upstream::default();
    let addon = addon_against(up.clone()).await;

    let meta = addon
        .get_detail(ContentKind::Series, "tmdb:2004")
        .await
        .unwrap();
    assert_eq!(up.queries.lock().unwrap()[0].0, "/tv/2004");
    assert_eq!(meta.preview.id, "tmdb:2004");
    assert_eq!(meta.cast, "Phil LaMarr, Mako");
    assert_eq!(meta.director, "Genndy Tartakovsky");
    assert_eq!(meta.country.as_deref(), Some("United States of America"));
}

#[tokio::test]
async fn upstream_429_is_rate_limited_even_when_credits_succeed() {
    let addon = addon_against(Upstream {
        detail_status: Some(429),
        ..Default::default()
    })
    .await;
    let err = addon
        .get_detail(ContentKind::Movie, "tmdb:1")
        .await
        .unwrap_err();
    assert!(matches!(err, AddonError::RateLimited));
}

#[tokio::test]
async fn upstream_500_keeps_status_and_body() {
    let base = spawn_upstream(Upstream {
        detail_status: Some(500),
        ..Default::default()
    })
    .await;
    let client = TmdbClient::new(API_KEY, base).unwrap();
    let err = client.details(ContentKind::Movie, 1).await.unwrap_err();
    assert_eq!(err.status, Some(500));
    assert!(err.message.contains("500"));
    assert_eq!(
        err.body.as_ref().and_then(|b| b.get("status_message")),
        Some(&json!("limit"))
    );
}

#[tokio::test]
async fn slow_upstream_times_out_as_upstream_failure() {
    let base = spawn_upstream(Upstream {
        credits_delay: Some(Duration::from_secs(5)),
        ..Default::default()
    })
    .await;
    let client = TmdbClient::with_timeout(API_KEY, base, Duration::from_millis(200)).unwrap();
    let addon = Addon::new(Arc::new(client));
    let err = addon
        .get_detail(ContentKind::Movie, "tmdb:1")
        .await
        .unwrap_err();
    match err {
        AddonError::UpstreamOperationFailed { message, .. } => {
            assert_eq!(message, "timeout of 200ms exceeded");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn unreachable_upstream_is_upstream_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let addon = Addon::new(Arc::new(
        TmdbClient::new(API_KEY, format!("http://{}", addr)).unwrap(),
    ));
    let err = addon
        .list_catalog(ContentKind::Movie, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AddonError::UpstreamOperationFailed { .. }));
}
