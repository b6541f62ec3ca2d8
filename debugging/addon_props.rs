//! Run the catalog or meta handler against live TMDB and print the records.
//! Usage:
//!   cargo run --bin addon_props -- catalog <movie|series> [skip]
//!   cargo run --bin addon_props -- meta <movie|series> <tmdb:id>
//! Requires TMDB_API_KEY in the environment (.env supported).

use anyhow::{Context, Result};
use cartoonlink::addon::Addon;
use cartoonlink::config::Config;
use cartoonlink::models::{CatalogResponse, ContentKind, MetaResponse};
use cartoonlink::tmdb::TmdbClient;
use dotenvy::dotenv;
use std::env;
use std::sync::Arc;

fn usage() -> ! {
    eprintln!("Usage: cargo run --bin addon_props -- catalog <movie|series> [skip]");
    eprintln!("       cargo run --bin addon_props -- meta <movie|series> <tmdb:id>");
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        usage();
    }

    let kind: ContentKind = args[2].parse()?;
    let config = Config::from_env()?;
    let addon = Addon::new(Arc::new(TmdbClient::from_config(&config)?));

    let output = match args[1].as_str() {
        "catalog" => {
            let skip = args
                .get(3)
                .map(|s| s.parse::<u64>().context("skip must be a non-negative integer"))
                .transpose()?;
            let metas = addon.list_catalog(kind, skip).await?;
            serde_json::to_string_pretty(&CatalogResponse { metas })?
        }
        "meta" => {
            let Some(id) = args.get(3) else { usage() };
            let meta = addon.get_detail(kind, id).await?;
            serde_json::to_string_pretty(&MetaResponse { meta })?
        }
        _ => usage(),
    };
    println!("{}", output);
    Ok(())
}
