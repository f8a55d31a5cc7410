use streamvault::config::TmdbConfig;
use streamvault::tmdb::{TmdbApi, TmdbClient, UpstreamStatus};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> TmdbClient {
    TmdbClient::new(TmdbConfig {
        base_url: server.uri(),
        image_base_url: "https://image.tmdb.org/t/p".to_string(),
        api_key: "test-key".to_string(),
    })
}

fn envelope_body() -> serde_json::Value {
    serde_json::json!({
        "page": 1,
        "results": [{
            "id": 9340,
            "title": "The Goonies",
            "original_title": "The Goonies",
            "overview": "A young boy and his friends...",
            "poster_path": "/p.jpg",
            "backdrop_path": null,
            "release_date": "1985-06-07",
            "vote_average": 7.5,
            "vote_count": 6000,
            "popularity": 30.0,
            "genre_ids": [12],
            "adult": false,
            "original_language": "en",
            "video": false
        }],
        "total_pages": 1,
        "total_results": 1
    })
}

#[tokio::test]
async fn search_injects_fixed_params_and_encodes_the_query() {
    let server = MockServer::start().await;

    // wiremock matches against the decoded query string, so a match on the
    // original text proves the encode/decode round trip.
    Mock::given(method("GET"))
        .and(path("/search/movie"))
        .and(query_param("api_key", "test-key"))
        .and(query_param("language", "en-US"))
        .and(query_param("query", "fast & furious"))
        .and(query_param("include_adult", "false"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope_body()))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .search("fast & furious", 1)
        .await
        .unwrap();
    assert_eq!(response.total_results, 1);
    assert_eq!(response.results[0].id, 9340);
}

#[tokio::test]
async fn non_success_fails_with_the_status_and_makes_one_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/popular"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).popular(1).await.unwrap_err();
    let status = err
        .downcast_ref::<UpstreamStatus>()
        .expect("error carries the upstream status");
    assert_eq!(status.status, 500);
    assert_eq!(status.status_text, "Internal Server Error");
    assert_eq!(status.endpoint, "/movie/popular");
    // expect(1) on the mock verifies no retry happened.
}

#[tokio::test]
async fn missing_movie_is_classified_as_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/999"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "status_code": 34,
            "status_message": "The resource you requested could not be found.",
            "success": false
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).details(999).await.unwrap_err();
    let status = err.downcast_ref::<UpstreamStatus>().unwrap();
    assert!(status.is_not_found());
}

#[tokio::test]
async fn details_requests_one_combined_response() {
    let server = MockServer::start().await;

    let mut body = serde_json::json!({
        "id": 603,
        "title": "The Matrix",
        "original_title": "The Matrix",
        "overview": "Set in the 22nd century...",
        "poster_path": "/p.jpg",
        "backdrop_path": "/b.jpg",
        "release_date": "1999-03-31",
        "vote_average": 8.2,
        "vote_count": 24000,
        "popularity": 85.6,
        "adult": false,
        "original_language": "en",
        "video": false,
        "genres": [{"id": 28, "name": "Action"}],
        "runtime": 136,
        "tagline": null,
        "status": "Released",
        "budget": 63000000,
        "revenue": 463517383,
        "production_companies": [],
        "spoken_languages": [],
        "homepage": null,
        "imdb_id": "tt0133093",
        "belongs_to_collection": null
    });
    body["videos"] = serde_json::json!({"results": []});
    body["credits"] = serde_json::json!({"cast": [], "crew": []});
    body["similar"] = envelope_body();

    Mock::given(method("GET"))
        .and(path("/movie/603"))
        .and(query_param("append_to_response", "videos,credits,similar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;

    let detail = client_for(&server).details(603).await.unwrap();
    assert_eq!(detail.id, 603);
    assert!(detail.videos.is_some());
    assert!(detail.credits.is_some());
    assert_eq!(detail.similar.unwrap().results[0].id, 9340);
}

#[tokio::test]
async fn genres_unwraps_the_list_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/genre/movie/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "genres": [{"id": 28, "name": "Action"}, {"id": 12, "name": "Adventure"}]
        })))
        .mount(&server)
        .await;

    let genres = client_for(&server).genres().await.unwrap();
    assert_eq!(genres.len(), 2);
    assert_eq!(genres[0].name, "Action");
}

#[tokio::test]
async fn by_genre_discovers_sorted_by_popularity() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .and(query_param("with_genres", "878"))
        .and(query_param("sort_by", "popularity.desc"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope_body()))
        .mount(&server)
        .await;

    let response = client_for(&server).by_genre(878, 3).await.unwrap();
    assert_eq!(response.results.len(), 1);
}

#[tokio::test]
async fn trending_hits_the_weekly_window() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/trending/movie/week"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope_body()))
        .mount(&server)
        .await;

    let response = client_for(&server).trending(1).await.unwrap();
    assert_eq!(response.results[0].title, "The Goonies");
}

#[tokio::test]
async fn malformed_body_is_a_decode_failure_not_an_upstream_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/top_rated"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server).top_rated(1).await.unwrap_err();
    assert!(err.downcast_ref::<UpstreamStatus>().is_none());
    assert!(format!("{err:#}").contains("JSON parse failed"));
}
