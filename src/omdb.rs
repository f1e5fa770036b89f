use std::{num::NonZeroU32, sync::Arc};

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde::Deserialize;

use crate::error::AppResult;

/// Metadata record returned by a successful title lookup.
#[derive(Clone, Debug, PartialEq)]
pub struct MovieLookup {
    pub title: String,
    pub director: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub poster_url: Option<String>,
}

/// Best-effort client for the OMDb title search. A missing api key means the
/// client is unconfigured and every lookup is a miss.
pub struct OmdbClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl OmdbClient {
    pub fn new(client: reqwest::Client, api_key: String, base_url: String, rps: u32) -> Self {
        if api_key.trim().is_empty() {
            tracing::warn!("no OMDB_API_KEY provided, movie metadata lookups disabled");
        }

        let limiter =
            Arc::new(RateLimiter::direct(Quota::per_second(NonZeroU32::new(rps.max(1)).unwrap())));
        Self { client, api_key, base_url, limiter }
    }

    pub async fn lookup(&self, title: &str) -> AppResult<Option<MovieLookup>> {
        if self.api_key.trim().is_empty() {
            return Ok(None);
        }

        self.limiter.until_ready().await;

        let resp: OmdbResponse = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str()), ("t", title), ("plot", "short")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(resp.into_lookup())
    }
}

#[derive(Debug, Deserialize)]
struct OmdbResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Director")]
    director: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
}

impl OmdbResponse {
    fn into_lookup(self) -> Option<MovieLookup> {
        if self.response != "True" {
            return None;
        }

        Some(MovieLookup {
            title: present(self.title)?,
            director: present(self.director),
            year: self.year.as_deref().and_then(parse_year),
            rating: present(self.imdb_rating).and_then(|s| s.parse().ok()),
            poster_url: present(self.poster),
        })
    }
}

/// OMDb marks absent fields as "N/A" rather than omitting them.
fn present(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let s = s.trim();
        (!s.is_empty() && s != "N/A").then(|| s.to_string())
    })
}

/// Takes the leading year from values like "1994" or "1994–1998".
fn parse_year(value: &str) -> Option<i32> {
    let digits: String = value.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> OmdbResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn maps_a_full_hit() {
        let resp = parse(
            r#"{
                "Title": "The Shawshank Redemption",
                "Year": "1994",
                "Director": "Frank Darabont",
                "imdbRating": "9.3",
                "Poster": "https://img.example/shawshank.jpg",
                "Response": "True"
            }"#,
        );

        let lookup = resp.into_lookup().unwrap();
        assert_eq!(lookup.title, "The Shawshank Redemption");
        assert_eq!(lookup.director.as_deref(), Some("Frank Darabont"));
        assert_eq!(lookup.year, Some(1994));
        assert_eq!(lookup.rating, Some(9.3));
        assert_eq!(lookup.poster_url.as_deref(), Some("https://img.example/shawshank.jpg"));
    }

    #[test]
    fn missing_title_is_a_miss() {
        let resp = parse(r#"{"Response": "False", "Error": "Movie not found!"}"#);
        assert!(resp.into_lookup().is_none());
    }

    #[test]
    fn not_available_fields_become_none() {
        let resp = parse(
            r#"{
                "Title": "Obscure Short",
                "Year": "N/A",
                "Director": "N/A",
                "imdbRating": "N/A",
                "Poster": "N/A",
                "Response": "True"
            }"#,
        );

        let lookup = resp.into_lookup().unwrap();
        assert_eq!(lookup.director, None);
        assert_eq!(lookup.year, None);
        assert_eq!(lookup.rating, None);
        assert_eq!(lookup.poster_url, None);
    }

    #[test]
    fn series_year_span_takes_leading_year() {
        assert_eq!(parse_year("1994–1998"), Some(1994));
        assert_eq!(parse_year("2020"), Some(2020));
        assert_eq!(parse_year("N/A"), None);
    }
}
