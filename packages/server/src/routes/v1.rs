use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/user", user_routes())
        .nest("/categories", category_routes())
        .nest("/subcategories", subcategory_routes())
        .nest("/tags", tag_routes())
        .nest("/posts", post_routes())
        .nest("/comments", comment_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/me", get(handlers::auth::me))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::user::get_profile))
        .route("/username", put(handlers::user::update_username))
        .route(
            "/avatar",
            put(handlers::user::update_avatar).layer(handlers::post::upload_body_limit()),
        )
}

fn category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::category::list_categories).post(handlers::category::create_category),
        )
        .route(
            "/{id}",
            get(handlers::category::get_category)
                .put(handlers::category::update_category)
                .delete(handlers::category::delete_category),
        )
}

fn subcategory_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::subcategory::list_subcategories)
                .post(handlers::subcategory::create_subcategory),
        )
        .route(
            "/category/{category_id}",
            get(handlers::subcategory::list_subcategories_by_category),
        )
        .route(
            "/{category_id}/{subcategory_id}",
            get(handlers::subcategory::get_subcategory)
                .put(handlers::subcategory::update_subcategory)
                .delete(handlers::subcategory::delete_subcategory),
        )
}

fn tag_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::tag::list_tags).post(handlers::tag::create_tag),
        )
        .route("/{id}", delete(handlers::tag::delete_tag))
}

fn post_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::post::list_posts)
                .post(handlers::post::create_post)
                .layer(handlers::post::upload_body_limit()),
        )
        .route("/mine", get(handlers::post::list_my_posts))
        .route("/saved", get(handlers::post::list_saved_posts))
        .route("/search", get(handlers::post::search_posts))
        .route(
            "/{id}",
            get(handlers::post::get_post).delete(handlers::post::delete_post),
        )
        .route("/{id}/like", post(handlers::post::toggle_like))
        .route("/{id}/save", post(handlers::post::toggle_save))
        .route(
            "/{id}/comments",
            get(handlers::comment::list_comments).post(handlers::comment::create_comment),
        )
}

fn comment_routes() -> Router<AppState> {
    Router::new().route("/{id}", delete(handlers::comment::delete_comment))
}
