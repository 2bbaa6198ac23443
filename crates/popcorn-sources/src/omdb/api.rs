use popcorn_models::lenient::{parse_rating, parse_runtime_minutes};
use popcorn_models::{MovieDetail, SearchResultSummary};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use crate::error::SourceError;

#[derive(Debug, Deserialize)]
struct OmdbSearchResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Search", default)]
    search: Vec<OmdbSearchItem>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmdbSearchItem {
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Poster", default)]
    poster: String,
}

#[derive(Debug, Deserialize)]
struct OmdbTitle {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
    #[serde(rename = "imdbID", default)]
    imdb_id: String,
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Director", default)]
    director: String,
    #[serde(rename = "Poster", default)]
    poster: String,
    #[serde(rename = "Plot", default)]
    plot: String,
    #[serde(rename = "Genre", default)]
    genre: String,
    #[serde(rename = "Actors", default)]
    actors: String,
    /// Either a numeric string ("7.9"), a number, or "N/A"
    #[serde(rename = "imdbRating", default)]
    imdb_rating: serde_json::Value,
    /// Formatted as "<N> min"
    #[serde(rename = "Runtime", default)]
    runtime: String,
}

async fn send(client: &Client, base_url: &str, params: &[(&str, &str)]) -> Result<reqwest::Response, SourceError> {
    let response = client
        .get(base_url)
        .query(params)
        .header("Accept", "application/json")
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(SourceError::Status { status: status.as_u16(), body });
    }

    Ok(response)
}

/// Search titles by free text (`s=<query>`)
pub async fn search_titles(
    client: &Client,
    base_url: &str,
    api_key: &str,
    query: &str,
) -> Result<Vec<SearchResultSummary>, SourceError> {
    debug!(query = %query, "Searching OMDb");
    let response = send(client, base_url, &[("s", query), ("apikey", api_key)]).await?;
    let payload: OmdbSearchResponse = response.json().await?;

    if payload.response != "True" {
        let message = payload.error.unwrap_or_else(|| "Movie not found".to_string());
        debug!(query = %query, error = %message, "OMDb search returned no match");
        return Err(SourceError::NotFound(message));
    }

    let results: Vec<SearchResultSummary> = payload
        .search
        .into_iter()
        .map(|item| SearchResultSummary {
            imdb_id: item.imdb_id,
            title: item.title,
            year: item.year,
            poster_url: item.poster,
        })
        .collect();

    debug!(query = %query, count = results.len(), "OMDb search succeeded");
    Ok(results)
}

/// Fetch the full record for one title id (`i=<id>`)
pub async fn get_title(
    client: &Client,
    base_url: &str,
    api_key: &str,
    imdb_id: &str,
) -> Result<MovieDetail, SourceError> {
    debug!(imdb_id = %imdb_id, "Fetching OMDb title");
    let response = send(client, base_url, &[("i", imdb_id), ("apikey", api_key)]).await?;
    let title: OmdbTitle = response.json().await?;

    if title.response != "True" {
        let message = title.error.unwrap_or_else(|| "Movie not found".to_string());
        return Err(SourceError::NotFound(message));
    }

    let runtime_minutes = parse_runtime_minutes(&title.runtime);
    if runtime_minutes == 0 && !title.runtime.is_empty() {
        warn!(imdb_id = %imdb_id, runtime = %title.runtime, "Could not parse runtime, using 0");
    }

    Ok(MovieDetail {
        imdb_id: if title.imdb_id.is_empty() { imdb_id.to_string() } else { title.imdb_id },
        title: title.title,
        year: title.year,
        director: title.director,
        poster_url: title.poster,
        plot: title.plot,
        genre: title.genre,
        actors: title.actors,
        critic_rating: parse_rating(&title.imdb_rating),
        runtime_minutes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[tokio::test]
    async fn test_search_titles_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("s".into(), "Titanic".into()),
                Matcher::UrlEncoded("apikey".into(), "key".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "Response": "True",
                    "totalResults": "1",
                    "Search": [
                        {"imdbID": "tt0120338", "Title": "Titanic", "Year": "1997", "Poster": "https://example.com/p.jpg", "Type": "movie"}
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = Client::new();
        let url = format!("{}/", server.url());
        let results = search_titles(&client, &url, "key", "Titanic").await.unwrap();

        mock.assert_async().await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].imdb_id, "tt0120338");
        assert_eq!(results[0].year, "1997");
    }

    #[tokio::test]
    async fn test_search_titles_not_found() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"Response": "False", "Error": "Movie not found!"}).to_string())
            .create_async()
            .await;

        let client = Client::new();
        let url = format!("{}/", server.url());
        let err = search_titles(&client, &url, "key", "zzzzzNoMatch").await.unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_search_titles_server_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("unavailable")
            .create_async()
            .await;

        let client = Client::new();
        let url = format!("{}/", server.url());
        let err = search_titles(&client, &url, "key", "Titanic").await.unwrap_err();

        assert!(matches!(err, SourceError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_get_title_parses_detail() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/")
            .match_query(Matcher::UrlEncoded("i".into(), "tt0120338".into()))
            .with_status(200)
            .with_body(
                json!({
                    "Response": "True",
                    "imdbID": "tt0120338",
                    "Title": "Titanic",
                    "Year": "1997",
                    "Director": "James Cameron",
                    "Poster": "https://example.com/p.jpg",
                    "Plot": "A seventeen-year-old aristocrat falls in love.",
                    "Genre": "Drama, Romance",
                    "Actors": "Leonardo DiCaprio, Kate Winslet",
                    "imdbRating": "7.9",
                    "Runtime": "194 min"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = Client::new();
        let url = format!("{}/", server.url());
        let detail = get_title(&client, &url, "key", "tt0120338").await.unwrap();

        assert_eq!(detail.title, "Titanic");
        assert_eq!(detail.director, "James Cameron");
        assert_eq!(detail.critic_rating, 7.9);
        assert_eq!(detail.runtime_minutes, 194);
    }

    #[tokio::test]
    async fn test_get_title_unknown_id() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"Response": "False", "Error": "Incorrect IMDb ID."}).to_string())
            .create_async()
            .await;

        let client = Client::new();
        let url = format!("{}/", server.url());
        let err = get_title(&client, &url, "key", "tt_bogus").await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Incorrect IMDb ID.");
    }
}
