//! BookService integration tests against an in-memory database.
#![cfg(all(feature = "sqlite", feature = "migration"))]

mod common;

use book_catalog::{BookChanges, BookService, Error, NewBook};

fn dune() -> NewBook {
    NewBook {
        title: "Dune".into(),
        author: Some("Frank Herbert".into()),
        description: Some("Spice, sand and sandworms.".into()),
        isbn: Some("978-0441013593".into()),
        published_year: Some(1965),
    }
}

#[tokio::test]
async fn create_then_get_round_trips() {
    let books = BookService::new(common::setup_db().await);

    let created = books.create(dune()).await.unwrap();
    assert_eq!(created.id, 1);
    assert_eq!(created.title, "Dune");
    assert_eq!(created.author.as_deref(), Some("Frank Herbert"));
    assert_eq!(created.published_year, Some(1965));
    assert_eq!(created.created_at, created.updated_at);

    let fetched = books.get(created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn title_only_is_enough() {
    let books = BookService::new(common::setup_db().await);

    let created = books
        .create(NewBook {
            title: "  Dune ".into(),
            author: Some("   ".into()),
            ..NewBook::default()
        })
        .await
        .unwrap();

    assert_eq!(created.title, "Dune");
    assert_eq!(created.author, None);
    assert_eq!(created.description, None);
}

#[tokio::test]
async fn invalid_books_are_not_stored() {
    let books = BookService::new(common::setup_db().await);

    let err = books.create(NewBook::default()).await.unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));

    let err = books
        .create(NewBook {
            published_year: Some(-50),
            ..dune()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));

    assert!(books.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn list_returns_every_book_in_id_order() {
    let books = BookService::new(common::setup_db().await);

    for title in ["Dune", "Hyperion", "Solaris"] {
        books
            .create(NewBook {
                title: title.into(),
                ..NewBook::default()
            })
            .await
            .unwrap();
    }

    let titles: Vec<_> = books
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|b| (b.id, b.title))
        .collect();
    assert_eq!(
        titles,
        vec![
            (1, "Dune".to_owned()),
            (2, "Hyperion".to_owned()),
            (3, "Solaris".to_owned())
        ]
    );
}

#[tokio::test]
async fn update_overwrites_only_provided_fields() {
    let books = BookService::new(common::setup_db().await);
    let created = books.create(dune()).await.unwrap();

    let updated = books
        .update(
            created.id,
            BookChanges {
                title: Some(Some("Dune Messiah".into())),
                published_year: Some(Some(1969)),
                isbn: Some(Some("".into())),
                ..BookChanges::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Dune Messiah");
    assert_eq!(updated.published_year, Some(1969));
    assert_eq!(updated.isbn, None);
    assert_eq!(updated.author, created.author);
    assert_eq!(updated.description, created.description);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);

    assert_eq!(books.get(created.id).await.unwrap(), updated);
}

#[tokio::test]
async fn update_rejects_a_blank_title() {
    let books = BookService::new(common::setup_db().await);
    let created = books.create(dune()).await.unwrap();

    let err = books
        .update(
            created.id,
            BookChanges {
                title: Some(Some("   ".into())),
                ..BookChanges::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));

    let err = books
        .update(
            created.id,
            BookChanges {
                title: Some(None),
                ..BookChanges::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));

    assert_eq!(books.get(created.id).await.unwrap().title, "Dune");
}

#[tokio::test]
async fn update_with_null_clears_optional_fields() {
    let books = BookService::new(common::setup_db().await);
    let created = books.create(dune()).await.unwrap();

    let updated = books
        .update(
            created.id,
            BookChanges {
                published_year: Some(None),
                author: Some(None),
                ..BookChanges::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.published_year, None);
    assert_eq!(updated.author, None);
    assert_eq!(updated.isbn, created.isbn);
    assert_eq!(books.get(created.id).await.unwrap(), updated);
}

#[tokio::test]
async fn missing_ids_are_not_found() {
    let books = BookService::new(common::setup_db().await);

    assert!(matches!(books.get(9).await, Err(Error::NotFound { id: 9, .. })));
    assert!(matches!(
        books.update(9, BookChanges::default()).await,
        Err(Error::NotFound { id: 9, .. })
    ));
    assert!(matches!(books.delete(9).await, Err(Error::NotFound { id: 9, .. })));
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let books = BookService::new(common::setup_db().await);
    let created = books.create(dune()).await.unwrap();

    books.delete(created.id).await.unwrap();

    assert!(matches!(books.get(created.id).await, Err(Error::NotFound { .. })));
    assert!(matches!(books.delete(created.id).await, Err(Error::NotFound { .. })));
}
