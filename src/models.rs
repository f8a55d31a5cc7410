//! Value shapes received verbatim from TMDb. Nothing here is created or
//! mutated locally; fields mirror what the upstream API returns.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub original_title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: String,
    pub vote_average: f64,
    pub vote_count: i64,
    pub popularity: f64,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
    pub adult: bool,
    pub original_language: String,
    pub video: bool,
    // Only present on trending responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

/// Movie summary superset returned by `/movie/{id}`. Genre ids are replaced
/// with resolved genre objects; the appended collections are present only
/// when requested via `append_to_response`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: i64,
    pub title: String,
    pub original_title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: String,
    pub vote_average: f64,
    pub vote_count: i64,
    pub popularity: f64,
    pub adult: bool,
    pub original_language: String,
    pub video: bool,
    pub genres: Vec<Genre>,
    pub runtime: Option<i64>,
    pub tagline: Option<String>,
    pub status: String,
    pub budget: i64,
    pub revenue: i64,
    pub production_companies: Vec<ProductionCompany>,
    pub spoken_languages: Vec<SpokenLanguage>,
    pub homepage: Option<String>,
    pub imdb_id: Option<String>,
    pub belongs_to_collection: Option<Collection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub videos: Option<VideoList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<Credits>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similar: Option<Page<Movie>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenreList {
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoList {
    pub results: Vec<Video>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub iso_639_1: String,
    pub iso_3166_1: String,
    pub key: String,
    pub name: String,
    pub site: String,
    pub size: i64,
    #[serde(rename = "type")]
    pub video_type: String,
    pub official: bool,
    pub published_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credits {
    pub cast: Vec<CastMember>,
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastMember {
    pub id: i64,
    pub name: String,
    pub character: String,
    pub profile_path: Option<String>,
    pub order: i64,
    #[serde(default)]
    pub known_for_department: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: i64,
    pub name: String,
    pub job: String,
    pub department: String,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionCompany {
    pub id: i64,
    pub name: String,
    pub logo_path: Option<String>,
    pub origin_country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpokenLanguage {
    pub english_name: String,
    pub iso_639_1: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub id: i64,
    pub name: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
}

/// Paginated response envelope. `page` is 1-indexed; `results` never exceeds
/// the upstream page size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub page: i64,
    pub results: Vec<T>,
    pub total_pages: i64,
    pub total_results: i64,
}

impl<T> Page<T> {
    /// The envelope served for a blank search without contacting upstream.
    pub fn empty() -> Self {
        Self {
            page: 1,
            results: Vec::new(),
            total_pages: 0,
            total_results: 0,
        }
    }
}
