use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

/// Everything a client supplies to create a movie.
///
/// Association fields carry identifiers of existing reference rows; none of them
/// are created implicitly.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieDraft {
    pub title: String,
    pub year: i32,
    pub runtime: Option<i32>,
    pub plot: Option<String>,
    pub tagline: Option<String>,
    pub budget: Option<i64>,
    pub gross: Option<i64>,
    pub rating: Option<f64>,
    pub votes: Option<i64>,
    pub metascore: Option<i32>,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
    #[serde(default)]
    pub director_ids: Vec<i32>,
    #[serde(default)]
    pub writer_ids: Vec<i32>,
    #[serde(default)]
    pub actor_ids: Vec<i32>,
    #[serde(default)]
    pub language_ids: Vec<i32>,
    pub country_id: Option<i32>,
    #[serde(default)]
    pub roles: Vec<RoleDraft>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleDraft {
    pub person_id: i32,
    pub character: String,
}

/// Row of the movie listing, rating computed by the grouped query.
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct MovieSummary {
    pub id: i32,
    pub title: String,
    pub year: i32,
    pub plot: Option<String>,
    pub average_rating: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedRef {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CastRole {
    pub person_id: i32,
    pub person_name: String,
    pub character: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MovieDetail {
    pub id: i32,
    pub title: String,
    pub year: i32,
    pub runtime: Option<i32>,
    pub plot: Option<String>,
    pub tagline: Option<String>,
    pub budget: Option<i64>,
    pub gross: Option<i64>,
    pub rating: Option<f64>,
    pub votes: Option<i64>,
    pub metascore: Option<i32>,
    pub country: Option<NamedRef>,
    pub genres: Vec<NamedRef>,
    pub languages: Vec<NamedRef>,
    pub directors: Vec<NamedRef>,
    pub writers: Vec<NamedRef>,
    pub actors: Vec<NamedRef>,
    pub roles: Vec<CastRole>,
    pub average_rating: f64,
    pub created_at: String,
}
