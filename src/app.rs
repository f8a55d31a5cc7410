use crate::config::{TmdbConfig, MEDIA_SECTIONS};
use crate::detail;
use crate::images;
use crate::models::{Movie, Page};
use crate::tmdb::{TmdbApi, TmdbClient, UpstreamStatus};
use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::{net::SocketAddr, sync::Arc};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{error, info};

// Freshness hint for whatever cache sits in front; stale-within-window
// responses are acceptable. Not a local cache.
const CACHE_CONTROL_VALUE: &str = "public, max-age=3600";

#[derive(Clone)]
pub struct AppState {
    pub tmdb: Arc<dyn TmdbApi>,
    pub config: Arc<TmdbConfig>,
}

pub async fn run_server() -> Result<()> {
    let config = TmdbConfig::from_env();
    let tmdb: Arc<dyn TmdbApi> = Arc::new(TmdbClient::new(config.clone()));
    let state = AppState {
        tmdb,
        config: Arc::new(config),
    };

    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 3080));
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/home", get(home))
        .route("/api/search", get(search))
        .route("/api/movie/:id", get(movie_detail))
        .route("/api/genres", get(genres))
        .route("/api/genres/:id", get(movies_by_genre))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_VALUE),
        ))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

#[derive(Deserialize)]
struct SearchParams {
    q: Option<String>,
    page: Option<u32>,
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let query = params.q.as_deref().unwrap_or("").trim().to_string();
    if query.is_empty() {
        // Blank input never reaches upstream.
        return Json(Page::<Movie>::empty()).into_response();
    }

    match state.tmdb.search(&query, params.page.unwrap_or(1)).await {
        Ok(data) => Json(data).into_response(),
        Err(e) => {
            error!("Search failed for '{}': {:#}", query, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to search movies"})),
            )
                .into_response()
        }
    }
}

/// Assembles the four media sections plus the hero strip (trending) in one
/// response. Section fetches are independent and run concurrently.
async fn home(State(state): State<AppState>) -> Response {
    let fetched = tokio::try_join!(
        state.tmdb.trending(1),
        state.tmdb.popular(1),
        state.tmdb.top_rated(1),
        state.tmdb.upcoming(1),
    );

    let (trending, popular, top_rated, upcoming) = match fetched {
        Ok(pages) => pages,
        Err(e) => {
            error!("Failed to assemble home sections: {:#}", e);
            return generic_error();
        }
    };

    let hero = trending.results.clone();
    let pages = [trending, popular, top_rated, upcoming];
    let sections: Vec<serde_json::Value> = MEDIA_SECTIONS
        .iter()
        .zip(pages)
        .map(|(section, page)| {
            json!({
                "id": section.id,
                "title": section.title,
                "results": page.results,
            })
        })
        .collect();

    Json(json!({ "hero": hero, "sections": sections })).into_response()
}

async fn movie_detail(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Ok(movie_id) = id.parse::<i64>() else {
        return not_found();
    };

    let movie = match state.tmdb.details(movie_id).await {
        Ok(movie) => movie,
        Err(e) => {
            if e.downcast_ref::<UpstreamStatus>()
                .is_some_and(UpstreamStatus::is_not_found)
            {
                return not_found();
            }
            error!("Failed to fetch movie {}: {:#}", movie_id, e);
            return generic_error();
        }
    };

    let trailer_key = detail::trailer_key(&movie).map(str::to_string);
    let director = detail::director(&movie).cloned();
    let cast = detail::top_cast(&movie).to_vec();
    let similar = detail::similar_movies(&movie).to_vec();
    let poster_url = images::image_url(&state.config, movie.poster_path.as_deref(), "w500");
    let backdrop_url =
        images::backdrop_url(&state.config, movie.backdrop_path.as_deref(), "original");

    Json(json!({
        "movie": movie,
        "trailer_key": trailer_key,
        "director": director,
        "cast": cast,
        "similar": similar,
        "poster_url": poster_url,
        "backdrop_url": backdrop_url,
    }))
    .into_response()
}

async fn genres(State(state): State<AppState>) -> Response {
    match state.tmdb.genres().await {
        Ok(list) => Json(json!({ "genres": list })).into_response(),
        Err(e) => {
            error!("Failed to fetch genres: {:#}", e);
            generic_error()
        }
    }
}

#[derive(Deserialize)]
struct PageParam {
    page: Option<u32>,
}

async fn movies_by_genre(
    State(state): State<AppState>,
    Path(genre_id): Path<i64>,
    Query(params): Query<PageParam>,
) -> Response {
    match state
        .tmdb
        .by_genre(genre_id, params.page.unwrap_or(1))
        .await
    {
        Ok(data) => Json(data).into_response(),
        Err(e) => {
            error!("Failed to fetch genre {}: {:#}", genre_id, e);
            generic_error()
        }
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": "Movie not found"})),
    )
        .into_response()
}

fn generic_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "Something went wrong"})),
    )
        .into_response()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        term.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
