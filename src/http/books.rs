//! Handlers for the `/books` resource.
//!
//! All of these run behind [`require_auth`](super::auth::require_auth).

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};

use crate::book_service::{BookChanges, BookService, NewBook};
use crate::entity::book;
use crate::error::{Error, Result};

/// `GET /books`
pub async fn index(State(books): State<BookService>) -> Result<Json<Vec<book::Model>>> {
    Ok(Json(books.list().await?))
}

/// `GET /books/{id}`
pub async fn show(
    State(books): State<BookService>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<book::Model>> {
    let id = book_id(id?)?;
    Ok(Json(books.get(id).await?))
}

/// `POST /books`
pub async fn store(
    State(books): State<BookService>,
    payload: Result<Json<NewBook>, JsonRejection>,
) -> Result<(StatusCode, Json<book::Model>)> {
    let Json(input) = payload?;
    let book = books.create(input).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// `PUT /books/{id}` and `PATCH /books/{id}`
pub async fn update(
    State(books): State<BookService>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<BookChanges>, JsonRejection>,
) -> Result<Json<book::Model>> {
    let id = book_id(id?)?;
    let Json(changes) = payload?;
    Ok(Json(books.update(id, changes).await?))
}

/// `DELETE /books/{id}`
pub async fn destroy(
    State(books): State<BookService>,
    id: Result<Path<String>, PathRejection>,
) -> Result<StatusCode> {
    let id = book_id(id?)?;
    books.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// An id that is not an `i32` cannot match any book.
fn book_id(Path(raw): Path<String>) -> Result<i32> {
    raw.parse().map_err(|_| Error::UnknownKey {
        entity: "book",
        key: raw,
    })
}
