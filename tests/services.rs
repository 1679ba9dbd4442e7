//! Service-level integration tests

mod common;

use std::sync::Arc;

use common::{open_stores, services, FakeMetadata};
use home_library::{
    models::{Book, BookKind, Member},
    repository::{CatalogStore, MembershipStore},
    services::circulation,
    AppError,
};
use tempfile::TempDir;

const ORWELL: &str = "978-0451524935";

#[test]
fn test_persistence_round_trip_reproduces_variants() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("library.json");

    let mut catalog = CatalogStore::open(&path);
    catalog.add(Book::plain("1984", "George Orwell", ORWELL)).unwrap();
    catalog
        .add(Book::electronic("Digital Book", "A", "222", "EPUB"))
        .unwrap();
    catalog.save().unwrap();

    let fresh = CatalogStore::open(&path);
    let books = fresh.list();
    assert_eq!(books.len(), 2);
    assert_eq!(books[0], Book::plain("1984", "George Orwell", ORWELL));
    assert_eq!(books[1].title, "Digital Book");
    assert_eq!(
        books[1].kind,
        BookKind::Electronic {
            file_format: "EPUB".to_string()
        }
    );
}

#[test]
fn test_end_to_end_borrow_scenario() {
    let dir = TempDir::new().unwrap();
    let mut stores = open_stores(&dir);
    stores
        .catalog
        .add(Book::plain("1984", "George Orwell", ORWELL))
        .unwrap();
    stores
        .membership
        .add(Member::new("Ada Lovelace", "M001", "ada@example.com"))
        .unwrap();

    circulation::borrow(&mut stores.catalog, &mut stores.membership, "M001", ORWELL).unwrap();
    assert!(stores.catalog.find(ORWELL).unwrap().is_borrowed());
    assert_eq!(
        stores.membership.find("M001").unwrap().borrowed_books(),
        [ORWELL]
    );

    let err = circulation::borrow(&mut stores.catalog, &mut stores.membership, "M001", ORWELL)
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyBorrowed(_)));
    assert_eq!(
        stores.membership.find("M001").unwrap().borrowed_books(),
        [ORWELL]
    );

    // both files reflect the loan
    let catalog = CatalogStore::open(dir.path().join("library.json"));
    let membership = MembershipStore::open(dir.path().join("members.json"));
    assert!(catalog.find(ORWELL).unwrap().is_borrowed());
    assert_eq!(membership.find("M001").unwrap().borrowed_books(), [ORWELL]);
}

#[tokio::test]
async fn test_add_book_from_isbn() {
    let dir = TempDir::new().unwrap();
    let metadata = Arc::new(FakeMetadata::default().with(
        "9780743273565",
        "The Great Gatsby",
        "F. Scott Fitzgerald",
    ));
    let services = services(&dir, metadata.clone());

    let book = services
        .catalog
        .add_book_from_isbn(" 9780743273565 ")
        .await
        .unwrap();
    assert_eq!(book.title, "The Great Gatsby");
    assert_eq!(book.author, "F. Scott Fitzgerald");
    assert_eq!(book.isbn, "9780743273565");
    assert_eq!(book.kind, BookKind::Plain);
    assert_eq!(services.catalog.count_books().await, 1);
}

#[tokio::test]
async fn test_add_book_from_isbn_duplicate_skips_lookup() {
    let dir = TempDir::new().unwrap();
    let metadata = Arc::new(FakeMetadata::default());
    let services = services(&dir, metadata.clone());
    services
        .catalog
        .add_book(Book::plain("Test Book", "Test Author", "1234567890"))
        .await
        .unwrap();

    let err = services
        .catalog
        .add_book_from_isbn("1234567890")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("already exists"));
    assert_eq!(metadata.calls(), 0);
}

#[tokio::test]
async fn test_add_book_from_isbn_not_found_or_empty() {
    let dir = TempDir::new().unwrap();
    let metadata = Arc::new(FakeMetadata::default());
    let services = services(&dir, metadata.clone());

    let err = services
        .catalog
        .add_book_from_isbn("9999999999")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::MetadataNotFound(_)));
    assert!(err.to_string().contains("not found in Open Library"));

    let err = services.catalog.add_book_from_isbn("   ").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(metadata.calls(), 1);
    assert_eq!(services.catalog.count_books().await, 0);
}

#[tokio::test]
async fn test_delete_guards() {
    let dir = TempDir::new().unwrap();
    let services = services(&dir, Arc::new(FakeMetadata::default()));
    services
        .catalog
        .add_book(Book::audio("Dune", "Frank Herbert", "42", 1260))
        .await
        .unwrap();
    services
        .members
        .add_member(Member::new("Ada", "M001", "ada@example.com"))
        .await
        .unwrap();
    services.loans.borrow("M001", "42").await.unwrap();

    let err = services.catalog.delete_book("42").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Cannot delete 'Dune' because it is currently borrowed"
    );
    let err = services.members.delete_member("M001").await.unwrap_err();
    assert!(matches!(err, AppError::MemberHasLoans(_)));

    services.loans.return_book("M001", "42").await.unwrap();
    services.catalog.delete_book("42").await.unwrap();
    services.members.delete_member("M001").await.unwrap();
    assert!(matches!(
        services.catalog.delete_book("42").await,
        Err(AppError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_member_loans_in_borrow_order() {
    let dir = TempDir::new().unwrap();
    let services = services(&dir, Arc::new(FakeMetadata::default()));
    for (title, isbn) in [("First", "111"), ("Second", "222"), ("Third", "333")] {
        services
            .catalog
            .add_book(Book::plain(title, "Author", isbn))
            .await
            .unwrap();
    }
    services
        .members
        .add_member(Member::new("Ada", "M001", "ada@example.com"))
        .await
        .unwrap();

    services.loans.borrow("M001", "333").await.unwrap();
    services.loans.borrow("M001", "111").await.unwrap();

    let titles: Vec<String> = services
        .loans
        .member_loans("M001")
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.title)
        .collect();
    assert_eq!(titles, ["Third", "First"]);

    assert!(matches!(
        services.loans.member_loans("M404").await,
        Err(AppError::MemberNotFound(_))
    ));
}
