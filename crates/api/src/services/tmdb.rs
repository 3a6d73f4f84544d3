//! TMDB catalog matching.
//!
//! Extracted movie titles are matched against TMDB's `/search/movie`
//! endpoint. The first search result is taken as canonical; titles with
//! no result pass through unenriched.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use domain::models::ExtractedMovie;

use crate::config::TmdbConfig;

const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w342";

/// Errors that can occur while talking to TMDB.
#[derive(Debug, Error)]
pub enum TmdbError {
    #[error("TMDB API key is not configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    id: i64,
    title: String,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    poster_path: Option<String>,
}

/// TMDB search client.
#[derive(Clone)]
pub struct TmdbService {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TmdbService {
    /// Creates a new TMDB service. An empty API key is accepted; matching
    /// is skipped until one is configured.
    pub fn new(config: &TmdbConfig) -> Result<Self, TmdbError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Searches for a single movie by title and optional year. Returns
    /// the first result, or None when TMDB has no match.
    pub async fn search_movie(
        &self,
        title: &str,
        year: Option<i32>,
    ) -> Result<Option<TmdbMatch>, TmdbError> {
        if !self.is_configured() {
            return Err(TmdbError::MissingApiKey);
        }

        let url = format!("{}/search/movie", self.base_url);
        let mut request = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("query", title)]);
        if let Some(year) = year {
            request = request.query(&[("year", year.to_string())]);
        }

        let response = request.send().await?.error_for_status()?;
        let body: SearchResponse = response.json().await?;

        Ok(body.results.into_iter().next().map(|result| TmdbMatch {
            tmdb_id: result.id,
            title: result.title,
            year: result
                .release_date
                .as_deref()
                .and_then(parse_release_year),
            poster_path: result.poster_path,
        }))
    }

    /// Resolves extracted movies against the catalog. Matched entries
    /// take on TMDB's canonical title and year; titles without a match
    /// (or any lookup failure) pass through unchanged.
    pub async fn match_movies(&self, movies: &mut [ExtractedMovie]) {
        if !self.is_configured() {
            debug!("TMDB not configured, skipping catalog matching");
            return;
        }

        for movie in movies.iter_mut() {
            match self.search_movie(&movie.title, movie.year).await {
                Ok(Some(found)) => apply_match(movie, found),
                Ok(None) => {
                    debug!(title = %movie.title, "No TMDB match");
                }
                Err(e) => {
                    warn!(title = %movie.title, "TMDB lookup failed: {}", e);
                }
            }
        }
    }
}

/// Canonical match data from a TMDB search result.
#[derive(Debug, Clone)]
pub struct TmdbMatch {
    pub tmdb_id: i64,
    pub title: String,
    pub year: Option<i32>,
    pub poster_path: Option<String>,
}

/// Overwrites an extracted movie with the catalog's canonical data. The
/// extracted year survives only when the catalog has no release date.
fn apply_match(movie: &mut ExtractedMovie, found: TmdbMatch) {
    movie.matched = true;
    movie.title = found.title;
    movie.year = found.year.or(movie.year);
    movie.tmdb_id = Some(found.tmdb_id);
    movie.poster_path = found.poster_path;
}

/// Builds a full poster URL from a TMDB poster path.
pub fn poster_url(poster_path: &str) -> String {
    format!("{}{}", POSTER_BASE_URL, poster_path)
}

fn parse_release_year(release_date: &str) -> Option<i32> {
    release_date.split('-').next()?.parse().ok()
}
