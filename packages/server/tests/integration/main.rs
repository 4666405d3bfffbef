mod common;

mod auth;
mod posts;
mod taxonomy;
