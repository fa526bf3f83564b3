//! axum routing for the auth and book endpoints.
//!
//! | Method      | Path          | Gated |
//! |-------------|---------------|-------|
//! | POST        | `/login`      | no    |
//! | POST        | `/register`   | no    |
//! | POST        | `/logout`     | yes   |
//! | GET, POST   | `/books`      | yes   |
//! | GET, PUT, PATCH, DELETE | `/books/{id}` | yes |
//!
//! Gated routes sit behind [`auth::require_auth`], which resolves the
//! `Authorization: Bearer` header of each request on its own. There is no
//! process-wide token.

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::auth_service::AuthService;
use crate::book_service::BookService;

pub mod auth;
pub mod books;
mod error;

pub use error::ErrorBody;

/// State shared by every handler.
#[derive(Debug, Clone, FromRef)]
pub struct AppState {
    pub auth: AuthService,
    pub books: BookService,
}

impl AppState {
    pub fn new(auth: AuthService, books: BookService) -> Self {
        Self { auth, books }
    }
}

/// Builds the application router with all routes nested under `prefix`.
///
/// `prefix` is either empty or starts with `/` and has no trailing slash, as
/// produced by [`Config`](crate::Config).
pub fn router(state: AppState, prefix: &str) -> Router {
    let public = Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register));

    let gated = Router::new()
        .route("/logout", post(auth::logout))
        .route("/books", get(books::index).post(books::store))
        .route(
            "/books/{id}",
            get(books::show)
                .put(books::update)
                .patch(books::update)
                .delete(books::destroy),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    let api = public.merge(gated);
    let app = if prefix.is_empty() {
        api
    } else {
        Router::new().nest(prefix, api)
    };

    app.layer(TraceLayer::new_for_http()).with_state(state)
}
