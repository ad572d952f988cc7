pub use super::countries::Entity as Countries;
pub use super::genres::Entity as Genres;
pub use super::languages::Entity as Languages;
pub use super::movie_credits::Entity as MovieCredits;
pub use super::movie_genres::Entity as MovieGenres;
pub use super::movie_languages::Entity as MovieLanguages;
pub use super::movies::Entity as Movies;
pub use super::people::Entity as People;
pub use super::reviews::Entity as Reviews;
pub use super::roles::Entity as Roles;
pub use super::users::Entity as Users;
