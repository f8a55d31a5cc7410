use std::env;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Upstream endpoints and credentials, read once at startup and passed
/// explicitly to whatever needs them.
#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub base_url: String,
    pub image_base_url: String,
    pub api_key: String,
}

impl TmdbConfig {
    /// Missing `TMDB_API_KEY` degrades to an empty key; requests made with it
    /// fail upstream with 401 rather than here.
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("TMDB_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            image_base_url: env::var("TMDB_IMAGE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_IMAGE_BASE_URL.to_string()),
            api_key: env::var("TMDB_API_KEY").unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    Trending,
    Popular,
    TopRated,
    Upcoming,
}

/// One of the four fixed home-page categories.
#[derive(Debug, Clone, Copy)]
pub struct MediaSection {
    pub id: SectionId,
    pub title: &'static str,
}

pub const MEDIA_SECTIONS: [MediaSection; 4] = [
    MediaSection {
        id: SectionId::Trending,
        title: "Trending Now",
    },
    MediaSection {
        id: SectionId::Popular,
        title: "Popular",
    },
    MediaSection {
        id: SectionId::TopRated,
        title: "Top Rated",
    },
    MediaSection {
        id: SectionId::Upcoming,
        title: "Coming Soon",
    },
];
