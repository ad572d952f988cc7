pub mod movie;
pub mod reference;
pub mod review;
pub mod user;
