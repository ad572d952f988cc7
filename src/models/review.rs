use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

use crate::domain::MovieId;

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewDraft {
    pub movie_id: MovieId,
    #[serde(default, rename = "user_rating", alias = "rating")]
    pub rating: Option<f64>,
    #[serde(default)]
    pub text: Option<String>,
}

impl ReviewDraft {
    /// Trims the text and treats an empty result as absent.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.text = self
            .text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        self
    }
}

/// Review joined with the author's username and the movie title.
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct ReviewRow {
    pub id: i32,
    pub movie_id: i32,
    pub user_id: i32,
    pub user_name: String,
    pub movie_title: String,
    #[serde(rename = "user_rating")]
    pub rating: Option<f64>,
    pub text: Option<String>,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_drops_blank_text() {
        let draft = ReviewDraft {
            movie_id: MovieId::new(1),
            rating: None,
            text: Some("   ".to_string()),
        }
        .normalized();
        assert!(draft.text.is_none());
    }

    #[test]
    fn normalized_trims_text() {
        let draft = ReviewDraft {
            movie_id: MovieId::new(1),
            rating: Some(4.0),
            text: Some("  great  ".to_string()),
        }
        .normalized();
        assert_eq!(draft.text.as_deref(), Some("great"));
    }

    #[test]
    fn draft_accepts_both_rating_spellings() {
        let a: ReviewDraft =
            serde_json::from_str(r#"{"movie_id": 3, "user_rating": 4.5}"#).unwrap();
        let b: ReviewDraft = serde_json::from_str(r#"{"movie_id": 3, "rating": 4.5}"#).unwrap();
        assert_eq!(a.rating, Some(4.5));
        assert_eq!(b.rating, Some(4.5));
        assert_eq!(a.movie_id, MovieId::new(3));
    }
}
