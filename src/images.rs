//! Image URL resolution. Total functions: an absent path fragment yields the
//! context's placeholder, never an error.

use crate::config::TmdbConfig;

pub const PLACEHOLDER_POSTER: &str = "/images/placeholder-poster.svg";
pub const PLACEHOLDER_BACKDROP: &str = "/images/placeholder-backdrop.svg";

/// Poster and profile images share the poster placeholder.
pub fn image_url(config: &TmdbConfig, path: Option<&str>, size: &str) -> String {
    match path {
        Some(p) => format!("{}/{}{}", config.image_base_url, size, p),
        None => PLACEHOLDER_POSTER.to_string(),
    }
}

pub fn backdrop_url(config: &TmdbConfig, path: Option<&str>, size: &str) -> String {
    match path {
        Some(p) => format!("{}/{}{}", config.image_base_url, size, p),
        None => PLACEHOLDER_BACKDROP.to_string(),
    }
}
