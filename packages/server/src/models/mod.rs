pub mod auth;
pub mod category;
pub mod comment;
pub mod post;
pub mod shared;
pub mod subcategory;
pub mod tag;
pub mod user;
