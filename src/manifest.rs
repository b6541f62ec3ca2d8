//! Addon manifest served at `/manifest.json`.
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::ids::ID_NAMESPACE;
use crate::models::ContentKind;

pub const ADDON_ID: &str = "org.cartoon_network";
pub const MOVIE_CATALOG_ID: &str = "cartoon_network_movie";
pub const SERIES_CATALOG_ID: &str = "cartoon_network_series";

const ADDON_NAME: &str = "Cartoon Network";
const ADDON_DESCRIPTION: &str = "The Cartoon Network Stremio Addon lets you stream a wide range of Cartoon Network shows directly within Stremio. It's a community-made, unofficial addon.";
const ADDON_LOGO: &str = "https://raw.githubusercontent.com/johnchrisdc/stremio-cartoon-network/refs/heads/main/potato-inc.png";
const ADDONS_CONFIG_ISSUER: &str = "https://stremio-addons.net";
const ADDONS_CONFIG_SIGNATURE: &str = "eyJhbGciOiJkaXIiLCJlbmMiOiJBMTI4Q0JDLUhTMjU2In0..OCazw3GP0SIkE3Htmo9H1w.3p6AhQCXb8-sIxbD4sSmMbW-aCkIvNDEduDB6rViiDBiGOuHYGMMG8G6JByATbBkMXziLlttduL3qTrDWZB4FyUYZ84p-8pL8gRKkHdqOn_z58OUz0WSRMts-XrO58_K.SFb81L0ZYkbQVSj5iNOByQ";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub id: &'static str,
    pub version: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub types: Vec<ContentKind>,
    pub catalogs: Vec<CatalogDescriptor>,
    pub resources: Vec<&'static str>,
    pub id_prefixes: Vec<&'static str>,
    pub logo: &'static str,
    pub stremio_addons_config: AddonsConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDescriptor {
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub id: &'static str,
    pub name: &'static str,
    pub extra: Vec<CatalogExtra>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogExtra {
    pub name: &'static str,
    pub is_required: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddonsConfig {
    pub issuer: &'static str,
    pub signature: &'static str,
}

pub static MANIFEST: Lazy<Manifest> = Lazy::new(|| Manifest {
    id: ADDON_ID,
    version: "1.0.0",
    name: ADDON_NAME,
    description: ADDON_DESCRIPTION,
    types: vec![ContentKind::Movie, ContentKind::Series],
    catalogs: vec![
        catalog(ContentKind::Movie, MOVIE_CATALOG_ID),
        catalog(ContentKind::Series, SERIES_CATALOG_ID),
    ],
    resources: vec!["catalog", "meta"],
    id_prefixes: vec![ID_NAMESPACE],
    logo: ADDON_LOGO,
    stremio_addons_config: AddonsConfig {
        issuer: ADDONS_CONFIG_ISSUER,
        signature: ADDONS_CONFIG_SIGNATURE,
    },
});

fn catalog(kind: ContentKind, id: &'static str) -> CatalogDescriptor {
    CatalogDescriptor {
        kind,
        id,
        name: ADDON_NAME,
        extra: vec![CatalogExtra {
            name: "skip",
            is_required: false,
        }],
    }
}

/// True when the manifest declares a catalog with this kind and id.
pub fn has_catalog(kind: ContentKind, id: &str) -> bool {
    MANIFEST
        .catalogs
        .iter()
        .any(|c| c.kind == kind && c.id == id)
}
