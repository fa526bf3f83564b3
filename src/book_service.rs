use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, NotSet, QueryOrder, Set,
};
use serde::{Deserialize, Deserializer};
use tracing::info;

use crate::entity::book::{self, Entity as BookEntity};
use crate::error::{Error, Result};
use crate::timestamp;

const MAX_TITLE_LEN: usize = 255;
const MAX_AUTHOR_LEN: usize = 255;
const MAX_ISBN_LEN: usize = 32;
const MAX_DESCRIPTION_LEN: usize = 10_000;
const MAX_PUBLISHED_YEAR: i32 = 9999;

/// Fields for a new book. Only `title` is required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub isbn: Option<String>,
    pub published_year: Option<i32>,
}

/// A partial update.
///
/// The outer `Option` says whether a field was sent at all: `None` keeps the
/// stored value. `Some(None)` (a JSON `null`) clears an optional field, as
/// does a blank string for the text fields. `title` cannot be cleared.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookChanges {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub author: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub isbn: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub published_year: Option<Option<i32>>,
}

// Only called for keys that are in the payload, so `null` lands as `Some(None)`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// CRUD over the `books` table.
///
/// Every call touches at most one row and is atomic against it. Concurrent
/// updates to the same book are last-write-wins. Callers are expected to
/// have authenticated the request already; the service itself does not
/// narrow access per user.
#[derive(Debug, Clone)]
pub struct BookService {
    conn: DatabaseConnection,
}

impl BookService {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// All books, ordered by id.
    pub async fn list(&self) -> Result<Vec<book::Model>> {
        let books = BookEntity::find()
            .order_by_asc(book::Column::Id)
            .all(&self.conn)
            .await?;
        Ok(books)
    }

    pub async fn get(&self, id: i32) -> Result<book::Model> {
        BookEntity::find_by_id(id)
            .one(&self.conn)
            .await?
            .ok_or(Error::NotFound { entity: "book", id })
    }

    /// Validates `input` and inserts it with a generated id.
    pub async fn create(&self, input: NewBook) -> Result<book::Model> {
        let title = required_text("title", &input.title, MAX_TITLE_LEN)?;
        let author = optional_text("author", input.author.as_deref(), MAX_AUTHOR_LEN)?;
        let description =
            optional_text("description", input.description.as_deref(), MAX_DESCRIPTION_LEN)?;
        let isbn = optional_text("isbn", input.isbn.as_deref(), MAX_ISBN_LEN)?;
        let published_year = input.published_year.map(validate_year).transpose()?;

        let now = timestamp::now();
        let book = book::ActiveModel {
            id: NotSet,
            title: Set(title),
            author: Set(author),
            description: Set(description),
            isbn: Set(isbn),
            published_year: Set(published_year),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.conn)
        .await?;

        info!(book_id = book.id, "book created");
        Ok(book)
    }

    /// Overwrites the provided fields of book `id`.
    pub async fn update(&self, id: i32, changes: BookChanges) -> Result<book::Model> {
        // Validate before the lookup so a bad payload never costs a round trip
        let title = changes
            .title
            .map(|t| required_text("title", t.as_deref().unwrap_or_default(), MAX_TITLE_LEN))
            .transpose()?;
        let author = changes
            .author
            .map(|a| optional_text("author", a.as_deref(), MAX_AUTHOR_LEN))
            .transpose()?;
        let description = changes
            .description
            .map(|d| optional_text("description", d.as_deref(), MAX_DESCRIPTION_LEN))
            .transpose()?;
        let isbn = changes
            .isbn
            .map(|i| optional_text("isbn", i.as_deref(), MAX_ISBN_LEN))
            .transpose()?;
        let published_year = changes
            .published_year
            .map(|y| y.map(validate_year).transpose())
            .transpose()?;

        let existing = self.get(id).await?;
        let mut active = existing.into_active_model();

        if let Some(title) = title {
            active.title = Set(title);
        }
        if let Some(author) = author {
            active.author = Set(author);
        }
        if let Some(description) = description {
            active.description = Set(description);
        }
        if let Some(isbn) = isbn {
            active.isbn = Set(isbn);
        }
        if let Some(year) = published_year {
            active.published_year = Set(year);
        }
        active.updated_at = Set(timestamp::now());

        let book = active.update(&self.conn).await?;
        info!(book_id = book.id, "book updated");
        Ok(book)
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        let result = BookEntity::delete_by_id(id).exec(&self.conn).await?;
        if result.rows_affected == 0 {
            return Err(Error::NotFound { entity: "book", id });
        }

        info!(book_id = id, "book deleted");
        Ok(())
    }
}

fn required_text(field: &str, value: &str, max: usize) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::invalid_input(format!("the {field} field is required")));
    }
    check_length(field, value, max)?;
    Ok(value.to_owned())
}

// Blank optional text is stored as NULL.
fn optional_text(field: &str, value: Option<&str>, max: usize) -> Result<Option<String>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => {
            check_length(field, value, max)?;
            Ok(Some(value.to_owned()))
        }
        None => Ok(None),
    }
}

fn check_length(field: &str, value: &str, max: usize) -> Result<()> {
    if value.chars().count() > max {
        return Err(Error::invalid_input(format!(
            "the {field} may not be longer than {max} characters"
        )));
    }
    Ok(())
}

fn validate_year(year: i32) -> Result<i32> {
    if (0..=MAX_PUBLISHED_YEAR).contains(&year) {
        Ok(year)
    } else {
        Err(Error::invalid_input(format!(
            "the published_year must be between 0 and {MAX_PUBLISHED_YEAR}"
        )))
    }
}
