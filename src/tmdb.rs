use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::fmt;

use crate::config::TmdbConfig;
use crate::models::{Genre, GenreList, Movie, MovieDetail, Page};

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    config: TmdbConfig,
}

/// Non-success answer from TMDb. Carried inside the anyhow chain so callers
/// can classify by status (the not-found mapping) without string matching.
#[derive(Debug, Clone)]
pub struct UpstreamStatus {
    pub status: u16,
    pub status_text: String,
    pub endpoint: String,
}

impl UpstreamStatus {
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

impl fmt::Display for UpstreamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TMDb API error: {} {} -> {}",
            self.status, self.status_text, self.endpoint
        )
    }
}

impl std::error::Error for UpstreamStatus {}

#[async_trait]
pub trait TmdbApi: Send + Sync {
    async fn trending(&self, page: u32) -> Result<Page<Movie>>;
    async fn popular(&self, page: u32) -> Result<Page<Movie>>;
    async fn top_rated(&self, page: u32) -> Result<Page<Movie>>;
    async fn upcoming(&self, page: u32) -> Result<Page<Movie>>;
    async fn details(&self, movie_id: i64) -> Result<MovieDetail>;
    async fn search(&self, query: &str, page: u32) -> Result<Page<Movie>>;
    async fn genres(&self) -> Result<Vec<Genre>>;
    async fn by_genre(&self, genre_id: i64, page: u32) -> Result<Page<Movie>>;
}

impl TmdbClient {
    pub fn new(config: TmdbConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn from_env() -> Self {
        Self::new(TmdbConfig::from_env())
    }

    /// `api_key` and `language` are set first; caller params are applied
    /// afterwards and replace by name, so an explicit caller value for either
    /// fixed key wins.
    fn build_url(&self, endpoint: &str, params: &[(&str, String)]) -> String {
        let mut pairs: Vec<(&str, String)> = vec![
            ("api_key", self.config.api_key.clone()),
            ("language", "en-US".to_string()),
        ];
        for (key, value) in params {
            match pairs.iter_mut().find(|pair| pair.0 == *key) {
                Some(pair) => pair.1 = value.clone(),
                None => pairs.push((*key, value.clone())),
            }
        }
        let query = pairs
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}{}?{}", self.config.base_url, endpoint, query)
    }

    /// One GET, no retries. Non-success statuses become [`UpstreamStatus`];
    /// success bodies decode as JSON with no further validation.
    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = self.build_url(endpoint, params);
        let res = self
            .client
            .get(&url)
            .send()
            .await
            .context("request failed")?;
        let status = res.status();
        if !status.is_success() {
            return Err(UpstreamStatus {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
                endpoint: endpoint.to_string(),
            }
            .into());
        }
        let text = res.text().await.context("reading body failed")?;
        let parsed: T = serde_json::from_str(&text).context("JSON parse failed")?;
        Ok(parsed)
    }
}

#[async_trait]
impl TmdbApi for TmdbClient {
    async fn trending(&self, page: u32) -> Result<Page<Movie>> {
        self.get("/trending/movie/week", &[("page", page.to_string())])
            .await
    }

    async fn popular(&self, page: u32) -> Result<Page<Movie>> {
        self.get("/movie/popular", &[("page", page.to_string())])
            .await
    }

    async fn top_rated(&self, page: u32) -> Result<Page<Movie>> {
        self.get("/movie/top_rated", &[("page", page.to_string())])
            .await
    }

    async fn upcoming(&self, page: u32) -> Result<Page<Movie>> {
        self.get("/movie/upcoming", &[("page", page.to_string())])
            .await
    }

    /// Videos, credits, and similar titles come back in one combined
    /// response (fewer round trips).
    async fn details(&self, movie_id: i64) -> Result<MovieDetail> {
        let endpoint = format!("/movie/{movie_id}");
        self.get(
            &endpoint,
            &[("append_to_response", "videos,credits,similar".to_string())],
        )
        .await
    }

    async fn search(&self, query: &str, page: u32) -> Result<Page<Movie>> {
        self.get(
            "/search/movie",
            &[
                ("query", query.to_string()),
                ("page", page.to_string()),
                ("include_adult", "false".to_string()),
            ],
        )
        .await
    }

    async fn genres(&self) -> Result<Vec<Genre>> {
        let data: GenreList = self.get("/genre/movie/list", &[]).await?;
        Ok(data.genres)
    }

    async fn by_genre(&self, genre_id: i64, page: u32) -> Result<Page<Movie>> {
        self.get(
            "/discover/movie",
            &[
                ("with_genres", genre_id.to_string()),
                ("sort_by", "popularity.desc".to_string()),
                ("page", page.to_string()),
            ],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TmdbClient {
        TmdbClient::new(TmdbConfig {
            base_url: "https://api.example.test/3".to_string(),
            image_base_url: "https://image.example.test/t/p".to_string(),
            api_key: "secret".to_string(),
        })
    }

    #[test]
    fn fixed_params_come_first() {
        let url = client().build_url("/movie/popular", &[("page", "2".to_string())]);
        assert_eq!(
            url,
            "https://api.example.test/3/movie/popular?api_key=secret&language=en-US&page=2"
        );
    }

    #[test]
    fn caller_language_replaces_default_in_place() {
        let url = client().build_url("/movie/popular", &[("language", "fr-FR".to_string())]);
        assert_eq!(
            url,
            "https://api.example.test/3/movie/popular?api_key=secret&language=fr-FR"
        );
    }

    #[test]
    fn caller_api_key_replaces_default() {
        let url = client().build_url("/movie/popular", &[("api_key", "other".to_string())]);
        assert!(url.contains("api_key=other"));
        assert!(!url.contains("api_key=secret"));
    }

    #[test]
    fn reserved_characters_survive_the_round_trip() {
        let query = "fast & furious";
        let url = client().build_url("/search/movie", &[("query", query.to_string())]);
        assert!(url.contains("query=fast%20%26%20furious"));

        let encoded = url.split("query=").nth(1).unwrap();
        let decoded = urlencoding::decode(encoded).unwrap();
        assert_eq!(decoded, query);
    }

    #[test]
    fn no_caller_params_still_injects_fixed_ones() {
        let url = client().build_url("/genre/movie/list", &[]);
        assert_eq!(
            url,
            "https://api.example.test/3/genre/movie/list?api_key=secret&language=en-US"
        );
    }
}
