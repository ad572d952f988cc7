pub mod prelude;

pub mod countries;
pub mod genres;
pub mod languages;
pub mod movie_credits;
pub mod movie_genres;
pub mod movie_languages;
pub mod movies;
pub mod people;
pub mod reviews;
pub mod roles;
pub mod users;
