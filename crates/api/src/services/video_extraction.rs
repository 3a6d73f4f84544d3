//! Video extraction service.
//!
//! Parses supported video URLs, fetches lightweight metadata via oEmbed,
//! and asks Gemini to pull movie mentions out of the video. Results are
//! cached per trimmed URL in a capacity-bounded, TTL-expiring map.

use lazy_static::lazy_static;
use regex::Regex;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use domain::models::{Confidence, ExtractedMovie, Platform, VideoMetadata};

use crate::config::GeminiConfig;
use crate::error::ApiError;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const OEMBED_URL: &str = "https://www.youtube.com/oembed";

lazy_static! {
    static ref WATCH_RE: Regex =
        Regex::new(r"youtube\.com/watch\?v=([a-zA-Z0-9_-]{11})").unwrap();
    static ref SHORT_RE: Regex =
        Regex::new(r"(?:youtube\.com/shorts/|youtu\.be/)([a-zA-Z0-9_-]{11})").unwrap();
}

/// Errors that can occur during video extraction.
#[derive(Debug, Error)]
pub enum VideoExtractionError {
    #[error("Unsupported or invalid video URL")]
    InvalidUrl,

    #[error("Video analysis is not configured")]
    MissingApiKey,

    #[error("Analysis service is rate limited, try again later")]
    RateLimited,

    #[error("Analysis service rejected the API key")]
    InvalidApiKey,

    #[error("Analysis model is unavailable")]
    ModelUnavailable,

    #[error("Could not extract movies from video: {0}")]
    ExtractionFailed(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<VideoExtractionError> for ApiError {
    fn from(err: VideoExtractionError) -> Self {
        match err {
            VideoExtractionError::InvalidUrl => {
                ApiError::Validation("Unsupported or invalid video URL".into())
            }
            VideoExtractionError::MissingApiKey => {
                ApiError::Upstream("Video analysis is not configured".into())
            }
            VideoExtractionError::RateLimited => {
                ApiError::Upstream("Analysis service is rate limited, try again later".into())
            }
            VideoExtractionError::InvalidApiKey => {
                ApiError::Upstream("Analysis service rejected the API key".into())
            }
            VideoExtractionError::ModelUnavailable => {
                ApiError::Upstream("Analysis model is unavailable".into())
            }
            VideoExtractionError::ExtractionFailed(msg) => ApiError::ExtractionFailed(msg),
            VideoExtractionError::Http(e) => ApiError::Upstream(format!("Analysis error: {}", e)),
        }
    }
}

/// A parsed, supported video URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedVideo {
    pub platform: Platform,
    pub video_id: String,
}

/// Parses a video URL into a platform and video id. Runs before any
/// network call so malformed input fails fast.
pub fn parse_video_url(url: &str) -> Result<ParsedVideo, VideoExtractionError> {
    let url = url.trim();
    let captures = WATCH_RE.captures(url).or_else(|| SHORT_RE.captures(url));
    match captures {
        Some(caps) => Ok(ParsedVideo {
            platform: Platform::Youtube,
            video_id: caps[1].to_string(),
        }),
        None => Err(VideoExtractionError::InvalidUrl),
    }
}

/// Scans text for the first bracketed JSON array. Model output often
/// wraps the array in prose or markdown fences.
pub fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

#[derive(Debug, Deserialize)]
struct RawExtractedMovie {
    title: String,
    #[serde(default)]
    year: Option<i32>,
    #[serde(default)]
    confidence: Option<String>,
}

impl RawExtractedMovie {
    fn into_extracted(self) -> ExtractedMovie {
        let confidence = match self.confidence.as_deref() {
            Some(c) if c.eq_ignore_ascii_case("high") => Confidence::High,
            Some(c) if c.eq_ignore_ascii_case("low") => Confidence::Low,
            _ => Confidence::Medium,
        };
        ExtractedMovie {
            title: self.title,
            year: self.year,
            confidence,
            matched: false,
            tmdb_id: None,
            poster_path: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct OembedResponse {
    #[serde(default)]
    title: String,
    #[serde(default)]
    author_name: String,
}

struct CacheEntry {
    movies: Vec<ExtractedMovie>,
    metadata: VideoMetadata,
    inserted_at: Instant,
}

/// Capacity-bounded cache keyed by trimmed video URL. Entries expire
/// after the configured TTL; the oldest entry is evicted when full.
struct ExtractionCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    capacity: usize,
    ttl: Duration,
}

impl ExtractionCache {
    fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity,
            ttl,
        }
    }

    async fn get(&self, key: &str) -> Option<(VideoMetadata, Vec<ExtractedMovie>)> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        if entry.inserted_at.elapsed() > self.ttl {
            return None;
        }
        Some((entry.metadata.clone(), entry.movies.clone()))
    }

    async fn put(&self, key: String, metadata: VideoMetadata, movies: Vec<ExtractedMovie>) {
        let mut entries = self.entries.write().await;

        // Drop expired entries; then evict the oldest if still full.
        entries.retain(|_, e| e.inserted_at.elapsed() <= self.ttl);
        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            if let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, e)| e.inserted_at)
                .map(|(k, _)| k.clone())
            {
                entries.remove(&oldest);
            }
        }

        entries.insert(
            key,
            CacheEntry {
                movies,
                metadata,
                inserted_at: Instant::now(),
            },
        );
    }
}

fn extraction_prompt() -> &'static str {
    "You are a movie identification assistant. Analyze this video and list \
     every movie that is mentioned, shown, or reviewed. Respond with ONLY a \
     JSON array, no other text. Each element must have the shape \
     {\"title\": string, \"year\": number or null, \"confidence\": \
     \"high\" | \"medium\" | \"low\"}. Use \"high\" only when the movie is \
     clearly identified by name. If no movies are present, respond with []."
}

/// A completed analysis: video metadata plus the extracted movies.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub metadata: VideoMetadata,
    pub movies: Vec<ExtractedMovie>,
    pub from_cache: bool,
}

/// Gemini-backed video extraction service.
pub struct VideoExtractionService {
    client: Client,
    api_key: String,
    model: String,
    cache: ExtractionCache,
}

impl VideoExtractionService {
    /// Creates a new video extraction service. An empty API key is
    /// accepted; analysis requests fail with MissingApiKey until one is
    /// configured.
    pub fn new(config: &GeminiConfig) -> Result<Self, VideoExtractionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            cache: ExtractionCache::new(
                config.cache_capacity,
                Duration::from_secs(config.cache_ttl_secs),
            ),
        })
    }

    /// Looks up a prior extraction for this URL.
    pub async fn cached(&self, video_url: &str) -> Option<(VideoMetadata, Vec<ExtractedMovie>)> {
        self.cache.get(video_url.trim()).await
    }

    /// Stores a finished extraction for this URL. Metadata is kept
    /// alongside the movies so a later hit replays the full result.
    pub async fn store(
        &self,
        video_url: &str,
        metadata: VideoMetadata,
        movies: Vec<ExtractedMovie>,
    ) {
        self.cache
            .put(video_url.trim().to_string(), metadata, movies)
            .await;
    }

    /// Fetches video metadata via oEmbed. Best effort: failures degrade
    /// to empty metadata rather than aborting the analysis.
    pub async fn fetch_metadata(&self, video_url: &str) -> VideoMetadata {
        let result = self
            .client
            .get(OEMBED_URL)
            .query(&[("url", video_url), ("format", "json")])
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                match response.json::<OembedResponse>().await {
                    Ok(body) => VideoMetadata {
                        title: body.title,
                        description: body.author_name,
                        platform: Platform::Youtube,
                    },
                    Err(e) => {
                        debug!("oEmbed response parse failed: {}", e);
                        VideoMetadata::empty()
                    }
                }
            }
            Ok(response) => {
                debug!("oEmbed returned status {}", response.status());
                VideoMetadata::empty()
            }
            Err(e) => {
                debug!("oEmbed request failed: {}", e);
                VideoMetadata::empty()
            }
        }
    }

    /// Analyzes a video URL end to end: parse, metadata, Gemini analysis
    /// with one fallback to text-only analysis of the metadata.
    pub async fn analyze(&self, video_url: &str) -> Result<AnalysisOutcome, VideoExtractionError> {
        parse_video_url(video_url)?;

        if let Some((metadata, movies)) = self.cached(video_url).await {
            debug!(url = %video_url.trim(), "Extraction cache hit");
            return Ok(AnalysisOutcome {
                metadata,
                movies,
                from_cache: true,
            });
        }

        if self.api_key.is_empty() {
            return Err(VideoExtractionError::MissingApiKey);
        }

        let metadata = self.fetch_metadata(video_url).await;

        let movies = match self.analyze_video_content(video_url).await {
            Ok(movies) => movies,
            Err(e @ VideoExtractionError::RateLimited)
            | Err(e @ VideoExtractionError::InvalidApiKey)
            | Err(e @ VideoExtractionError::ModelUnavailable) => return Err(e),
            Err(e) => {
                warn!("Video analysis failed, falling back to text: {}", e);
                self.analyze_text_content(&metadata).await?
            }
        };

        info!(
            url = %video_url.trim(),
            extracted = movies.len(),
            "Video analysis complete"
        );

        Ok(AnalysisOutcome {
            metadata,
            movies,
            from_cache: false,
        })
    }

    /// Primary path: send the video itself to Gemini as a file_data part.
    async fn analyze_video_content(
        &self,
        video_url: &str,
    ) -> Result<Vec<ExtractedMovie>, VideoExtractionError> {
        let body = json!({
            "contents": [{
                "parts": [
                    { "text": extraction_prompt() },
                    { "file_data": { "file_uri": video_url.trim() } }
                ]
            }]
        });
        self.generate_content(&body).await
    }

    /// Fallback path: analyze only the title and description text.
    async fn analyze_text_content(
        &self,
        metadata: &VideoMetadata,
    ) -> Result<Vec<ExtractedMovie>, VideoExtractionError> {
        if metadata.is_empty() {
            return Err(VideoExtractionError::ExtractionFailed(
                "Nothing to analyze for this video".into(),
            ));
        }

        let body = json!({
            "contents": [{
                "parts": [{
                    "text": format!(
                        "{}\n\nVideo title: {}\nVideo description: {}",
                        extraction_prompt(),
                        metadata.title,
                        metadata.description
                    )
                }]
            }]
        });
        self.generate_content(&body).await
    }

    async fn generate_content(
        &self,
        body: &serde_json::Value,
    ) -> Result<Vec<ExtractedMovie>, VideoExtractionError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            GEMINI_BASE_URL, self.model, self.api_key
        );

        let response = self.client.post(&url).json(body).send().await?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => return Err(VideoExtractionError::RateLimited),
            StatusCode::FORBIDDEN => return Err(VideoExtractionError::InvalidApiKey),
            StatusCode::NOT_FOUND => return Err(VideoExtractionError::ModelUnavailable),
            status if !status.is_success() => {
                return Err(VideoExtractionError::ExtractionFailed(format!(
                    "Analysis service returned status {}",
                    status
                )));
            }
            _ => {}
        }

        let parsed: GeminiResponse = response.json().await?;
        let text: String = parsed
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        let array = extract_json_array(&text).ok_or_else(|| {
            VideoExtractionError::ExtractionFailed("No movie list found in analysis output".into())
        })?;

        let raw: Vec<RawExtractedMovie> = serde_json::from_str(array).map_err(|e| {
            VideoExtractionError::ExtractionFailed(format!("Malformed movie list: {}", e))
        })?;

        Ok(raw
            .into_iter()
            .filter(|m| !m.title.trim().is_empty())
            .map(RawExtractedMovie::into_extracted)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_watch_url() {
        let parsed = parse_video_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap();
        assert_eq!(parsed.platform, Platform::Youtube);
        assert_eq!(parsed.video_id, "dQw4w9WgXcQ");
    }

    #[test]
    fn test_parse_short_url() {
        let parsed = parse_video_url("https://youtu.be/dQw4w9WgXcQ").unwrap();
        assert_eq!(parsed.video_id, "dQw4w9WgXcQ");
    }

    #[test]
    fn test_parse_shorts_url() {
        let parsed = parse_video_url("https://www.youtube.com/shorts/abcDEF12345").unwrap();
        assert_eq!(parsed.video_id, "abcDEF12345");
    }

    #[test]
    fn test_parse_url_with_whitespace() {
        let parsed = parse_video_url("  https://youtu.be/dQw4w9WgXcQ  ").unwrap();
        assert_eq!(parsed.video_id, "dQw4w9WgXcQ");
    }

    #[test]
    fn test_parse_rejects_other_hosts() {
        assert!(matches!(
            parse_video_url("https://vimeo.com/123456"),
            Err(VideoExtractionError::InvalidUrl)
        ));
    }

    #[test]
    fn test_parse_rejects_short_video_id() {
        assert!(parse_video_url("https://www.youtube.com/watch?v=short").is_err());
    }

    #[test]
    fn test_extract_json_array_plain() {
        let text = r#"[{"title":"Heat"}]"#;
        assert_eq!(extract_json_array(text), Some(text));
    }

    #[test]
    fn test_extract_json_array_with_prose() {
        let text = "Here are the movies:\n```json\n[{\"title\":\"Heat\"}]\n```\nEnjoy!";
        assert_eq!(extract_json_array(text), Some("[{\"title\":\"Heat\"}]"));
    }

    #[test]
    fn test_extract_json_array_spans_newlines() {
        let text = "[\n  {\"title\": \"Heat\"},\n  {\"title\": \"Alien\"}\n]";
        assert_eq!(extract_json_array(text), Some(text));
    }

    #[test]
    fn test_extract_json_array_missing() {
        assert_eq!(extract_json_array("no array here"), None);
        assert_eq!(extract_json_array("] backwards ["), None);
    }

    #[test]
    fn test_raw_movie_confidence_mapping() {
        let raw = RawExtractedMovie {
            title: "Heat".to_string(),
            year: Some(1995),
            confidence: Some("HIGH".to_string()),
        };
        assert_eq!(raw.into_extracted().confidence, Confidence::High);

        let raw = RawExtractedMovie {
            title: "Heat".to_string(),
            year: None,
            confidence: Some("bogus".to_string()),
        };
        assert_eq!(raw.into_extracted().confidence, Confidence::Medium);

        let raw = RawExtractedMovie {
            title: "Heat".to_string(),
            year: None,
            confidence: None,
        };
        assert_eq!(raw.into_extracted().confidence, Confidence::Medium);
    }

    #[test]
    fn test_gemini_response_parsing() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [{"text": "[{\"title\":\"Heat\",\"confidence\":\"high\"}]"}]
                }
            }]
        }"#;
        let parsed: GeminiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.candidates.len(), 1);
        assert!(parsed.candidates[0].content.parts[0].text.contains("Heat"));
    }

    fn test_movie(title: &str) -> ExtractedMovie {
        ExtractedMovie {
            title: title.to_string(),
            year: None,
            confidence: Confidence::High,
            matched: false,
            tmdb_id: None,
            poster_path: None,
        }
    }

    fn test_metadata(title: &str, description: &str) -> VideoMetadata {
        VideoMetadata {
            title: title.to_string(),
            description: description.to_string(),
            platform: Platform::Youtube,
        }
    }

    #[tokio::test]
    async fn test_cache_round_trip() {
        let cache = ExtractionCache::new(4, Duration::from_secs(60));
        cache
            .put(
                "url-a".to_string(),
                test_metadata("Title A", ""),
                vec![test_movie("Heat")],
            )
            .await;

        let (metadata, movies) = cache.get("url-a").await.unwrap();
        assert_eq!(metadata.title, "Title A");
        assert_eq!(movies.len(), 1);
        assert!(cache.get("url-b").await.is_none());
    }

    #[tokio::test]
    async fn test_cache_expiry() {
        let cache = ExtractionCache::new(4, Duration::from_millis(10));
        cache
            .put(
                "url".to_string(),
                VideoMetadata::empty(),
                vec![test_movie("Heat")],
            )
            .await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(cache.get("url").await.is_none());
    }

    #[tokio::test]
    async fn test_cache_capacity_eviction() {
        let cache = ExtractionCache::new(2, Duration::from_secs(60));
        cache
            .put("url-1".to_string(), VideoMetadata::empty(), vec![])
            .await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        cache
            .put("url-2".to_string(), VideoMetadata::empty(), vec![])
            .await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        cache
            .put("url-3".to_string(), VideoMetadata::empty(), vec![])
            .await;

        // Oldest entry was evicted; newest two remain.
        assert!(cache.get("url-1").await.is_none());
        assert!(cache.get("url-2").await.is_some());
        assert!(cache.get("url-3").await.is_some());
    }

    #[tokio::test]
    async fn test_service_trims_cache_key() {
        let config = GeminiConfig::default();
        let service = VideoExtractionService::new(&config).unwrap();
        service
            .store(
                "  https://youtu.be/dQw4w9WgXcQ ",
                VideoMetadata::empty(),
                vec![],
            )
            .await;
        assert!(service
            .cached("https://youtu.be/dQw4w9WgXcQ")
            .await
            .is_some());
    }

    #[tokio::test]
    async fn test_cache_hit_replays_full_metadata() {
        let config = GeminiConfig::default();
        let service = VideoExtractionService::new(&config).unwrap();
        let url = "https://youtu.be/dQw4w9WgXcQ";
        service
            .store(
                url,
                test_metadata("Top 10 Thrillers", "My favorite thrillers ranked"),
                vec![test_movie("Heat")],
            )
            .await;

        let outcome = service.analyze(url).await.unwrap();
        assert!(outcome.from_cache);
        assert_eq!(outcome.metadata.title, "Top 10 Thrillers");
        assert_eq!(outcome.metadata.description, "My favorite thrillers ranked");
        assert_eq!(outcome.movies.len(), 1);
    }

    #[tokio::test]
    async fn test_analyze_rejects_invalid_url_before_network() {
        let config = GeminiConfig::default();
        let service = VideoExtractionService::new(&config).unwrap();
        let result = service.analyze("https://example.com/video").await;
        assert!(matches!(result, Err(VideoExtractionError::InvalidUrl)));
    }

    #[tokio::test]
    async fn test_analyze_requires_api_key() {
        let config = GeminiConfig::default();
        let service = VideoExtractionService::new(&config).unwrap();
        let result = service.analyze("https://youtu.be/dQw4w9WgXcQ").await;
        assert!(matches!(result, Err(VideoExtractionError::MissingApiKey)));
    }
}
