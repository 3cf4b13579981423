pub mod category;
pub mod comment;
pub mod genre;
pub mod review;
pub mod signup;
pub mod title;
pub mod token;
pub mod user;
