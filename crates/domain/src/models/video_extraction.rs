//! AI video extraction models: analysis requests, extracted movies and
//! the destinations they can be added to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::pagination::PageInfo;
use uuid::Uuid;
use validator::Validate;

/// Supported video platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
}

/// How confident the model is that a mention is a real movie reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// A movie the model pulled out of a video, optionally enriched with
/// metadata from the movie database.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedMovie {
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    pub confidence: Confidence,
    /// Whether the title was resolved against the movie catalog.
    #[serde(default)]
    pub matched: bool,
    #[serde(default)]
    pub tmdb_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
}

/// Which list a set of extracted movies was added to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListDestinationKind {
    Personal,
    Space,
}

/// Target list for an add-to-list request. Space destinations carry the
/// space id; personal destinations do not.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDestination {
    #[serde(rename = "type")]
    pub kind: ListDestinationKind,
    #[serde(default)]
    pub list_id: Option<Uuid>,
}

/// Record of one completed add-to-list action on an extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddedToList {
    #[serde(rename = "type")]
    pub kind: ListDestinationKind,
    pub list_id: Uuid,
    pub movie_ids: Vec<i64>,
    pub added_at: DateTime<Utc>,
}

/// Request body for analyzing a video URL.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeVideoRequest {
    #[validate(url(message = "Invalid URL format"))]
    pub video_url: String,
}

/// Request body for adding extracted movies to a list.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddToListRequest {
    #[validate(length(min = 1, message = "At least one movie id is required"))]
    pub movie_ids: Vec<i64>,
    pub destination: ListDestination,
}

/// Response after adding movies to a list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToListResponse {
    pub message: String,
    pub added_count: usize,
}

/// A stored extraction as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResponse {
    pub id: Uuid,
    pub video_url: String,
    pub video_title: String,
    pub video_description: String,
    pub platform: Platform,
    pub extracted_movies: Vec<ExtractedMovie>,
    pub added_to_lists: Vec<AddedToList>,
    pub created_at: DateTime<Utc>,
}

/// Response for the analyze endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeVideoResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction: Option<ExtractionResponse>,
}

/// Paginated extraction history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionHistoryResponse {
    pub extractions: Vec<ExtractionResponse>,
    pub pagination: PageInfo,
}

/// Basic metadata fetched for a video before analysis.
#[derive(Debug, Clone)]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,
    pub platform: Platform,
}

impl VideoMetadata {
    /// Metadata placeholder for videos the oEmbed lookup could not
    /// describe.
    pub fn empty() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            platform: Platform::Youtube,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.description.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Confidence::High).unwrap(),
            "\"high\""
        );
    }

    #[test]
    fn test_extracted_movie_deserializes_partial() {
        let json = serde_json::json!({
            "title": "Alien",
            "confidence": "medium"
        });
        let movie: ExtractedMovie = serde_json::from_value(json).unwrap();
        assert_eq!(movie.title, "Alien");
        assert_eq!(movie.confidence, Confidence::Medium);
        assert!(movie.year.is_none());
        assert!(!movie.matched);
        assert!(movie.tmdb_id.is_none());
    }

    #[test]
    fn test_list_destination_type_tag() {
        let json = serde_json::json!({ "type": "personal" });
        let destination: ListDestination = serde_json::from_value(json).unwrap();
        assert_eq!(destination.kind, ListDestinationKind::Personal);
        assert!(destination.list_id.is_none());

        let json = serde_json::json!({
            "type": "space",
            "listId": Uuid::new_v4().to_string()
        });
        let destination: ListDestination = serde_json::from_value(json).unwrap();
        assert_eq!(destination.kind, ListDestinationKind::Space);
        assert!(destination.list_id.is_some());
    }

    #[test]
    fn test_add_to_list_request_empty_ids() {
        let request = AddToListRequest {
            movie_ids: vec![],
            destination: ListDestination {
                kind: ListDestinationKind::Personal,
                list_id: None,
            },
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_added_to_list_round_trip() {
        let entry = AddedToList {
            kind: ListDestinationKind::Space,
            list_id: Uuid::new_v4(),
            movie_ids: vec![550, 603],
            added_at: Utc::now(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "space");
        let back: AddedToList = serde_json::from_value(json).unwrap();
        assert_eq!(back.movie_ids, vec![550, 603]);
    }
}
