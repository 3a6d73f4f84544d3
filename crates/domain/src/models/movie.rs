//! The embedded movie record value type shared by personal lists and spaces.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A movie entry embedded in a personal list or a space list.
///
/// Movie records have no identity of their own; they are owned entirely by
/// the containing list. `id` is a client- or catalog-supplied string used
/// for removal and deduplication of extraction imports, while duplicate
/// detection at insert time keys on the exact title.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieRecord {
    pub id: String,

    #[validate(custom(function = "shared::validation::validate_movie_title"))]
    pub title: String,

    #[serde(default)]
    pub year: String,

    #[serde(default)]
    pub genre: Vec<String>,

    #[serde(default)]
    pub plot: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub actors: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<i64>,
}

/// Partial update for a movie in a personal list.
///
/// Only the whitelisted fields below are merged; anything else in the
/// request body is ignored. Identity fields (`id`, `title`) are not
/// updatable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMovieRequest {
    pub plot: Option<String>,
    pub runtime: Option<String>,
    pub director: Option<String>,
    pub actors: Option<Vec<String>>,
    pub genre: Option<Vec<String>>,
    pub rating: Option<String>,
    pub year: Option<String>,
    pub poster_url: Option<String>,
    pub tmdb_id: Option<i64>,
}

impl UpdateMovieRequest {
    /// Merge the provided fields onto an existing movie record.
    pub fn apply_to(&self, movie: &mut MovieRecord) {
        if let Some(plot) = &self.plot {
            movie.plot = plot.clone();
        }
        if let Some(runtime) = &self.runtime {
            movie.runtime = Some(runtime.clone());
        }
        if let Some(director) = &self.director {
            movie.director = Some(director.clone());
        }
        if let Some(actors) = &self.actors {
            movie.actors = Some(actors.clone());
        }
        if let Some(genre) = &self.genre {
            movie.genre = genre.clone();
        }
        if let Some(rating) = &self.rating {
            movie.rating = Some(rating.clone());
        }
        if let Some(year) = &self.year {
            movie.year = year.clone();
        }
        if let Some(poster_url) = &self.poster_url {
            movie.poster_url = Some(poster_url.clone());
        }
        if let Some(tmdb_id) = self.tmdb_id {
            movie.tmdb_id = Some(tmdb_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn sample_movie() -> MovieRecord {
        MovieRecord {
            id: "603".to_string(),
            title: "The Matrix".to_string(),
            year: "1999".to_string(),
            genre: vec!["Sci-Fi".to_string()],
            plot: "A hacker learns the truth.".to_string(),
            poster_url: None,
            rating: None,
            director: Some("The Wachowskis".to_string()),
            runtime: None,
            actors: None,
            tmdb_id: Some(603),
        }
    }

    #[test]
    fn test_movie_record_serde_camel_case() {
        let movie = sample_movie();
        let json = serde_json::to_value(&movie).unwrap();
        assert_eq!(json["tmdbId"], 603);
        assert_eq!(json["title"], "The Matrix");
        // Absent optionals are omitted entirely
        assert!(json.get("posterUrl").is_none());
    }

    #[test]
    fn test_movie_record_deserialize_minimal() {
        let movie: MovieRecord =
            serde_json::from_str(r#"{"id": "1", "title": "Dune"}"#).unwrap();
        assert_eq!(movie.title, "Dune");
        assert_eq!(movie.year, "");
        assert!(movie.genre.is_empty());
        assert!(movie.tmdb_id.is_none());
    }

    #[test]
    fn test_movie_record_title_required() {
        let movie: MovieRecord =
            serde_json::from_str(r#"{"id": "1", "title": "   "}"#).unwrap();
        assert!(movie.validate().is_err());
    }

    #[test]
    fn test_update_merges_whitelisted_fields() {
        let mut movie = sample_movie();
        let update = UpdateMovieRequest {
            plot: Some("Updated plot".to_string()),
            rating: Some("8.7".to_string()),
            tmdb_id: Some(604),
            ..Default::default()
        };

        update.apply_to(&mut movie);

        assert_eq!(movie.plot, "Updated plot");
        assert_eq!(movie.rating.as_deref(), Some("8.7"));
        assert_eq!(movie.tmdb_id, Some(604));
        // Untouched fields retain values
        assert_eq!(movie.title, "The Matrix");
        assert_eq!(movie.director.as_deref(), Some("The Wachowskis"));
    }

    #[test]
    fn test_update_empty_is_noop() {
        let mut movie = sample_movie();
        let before = movie.clone();
        UpdateMovieRequest::default().apply_to(&mut movie);
        assert_eq!(movie, before);
    }

    #[test]
    fn test_update_ignores_unknown_fields_on_deserialize() {
        let update: UpdateMovieRequest =
            serde_json::from_str(r#"{"plot": "p", "title": "nope", "id": "nope"}"#).unwrap();
        let mut movie = sample_movie();
        update.apply_to(&mut movie);
        assert_eq!(movie.plot, "p");
        assert_eq!(movie.title, "The Matrix");
    }
}
