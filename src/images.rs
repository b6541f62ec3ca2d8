use crate::config::IMAGE_BASE;

pub const POSTER_SIZE: &str = "w500";
pub const BACKGROUND_SIZE: &str = "original";

/// Builds a TMDB image URL for `path` at `size`. Missing or empty paths yield `None`.
pub fn image_url(path: Option<&str>, size: &str) -> Option<String> {
    path.filter(|p| !p.is_empty())
        .map(|p| format!("{IMAGE_BASE}/{size}{p}"))
}

pub fn poster_url(path: Option<&str>) -> Option<String> {
    image_url(path, POSTER_SIZE)
}

pub fn background_url(path: Option<&str>) -> Option<String> {
    image_url(path, BACKGROUND_SIZE)
}
