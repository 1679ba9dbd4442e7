//! Catalog management service

use std::sync::Arc;

use super::{metadata::MetadataProvider, SharedStores};
use crate::{
    error::{AppError, AppResult},
    models::Book,
    repository::Record,
};

#[derive(Clone)]
pub struct CatalogService {
    stores: SharedStores,
    metadata: Arc<dyn MetadataProvider>,
}

impl CatalogService {
    pub fn new(stores: SharedStores, metadata: Arc<dyn MetadataProvider>) -> Self {
        Self { stores, metadata }
    }

    pub async fn list_books(&self) -> Vec<Book> {
        self.stores.lock().await.catalog.list()
    }

    pub async fn count_books(&self) -> usize {
        self.stores.lock().await.catalog.len()
    }

    /// Get a book by ISBN
    pub async fn get_book(&self, isbn: &str) -> AppResult<Book> {
        self.stores
            .lock()
            .await
            .catalog
            .find(isbn)
            .cloned()
            .ok_or_else(|| not_found(isbn))
    }

    /// Add a manually entered book of any kind
    pub async fn add_book(&self, book: Book) -> AppResult<Book> {
        if book.isbn.trim().is_empty() {
            return Err(AppError::Validation("ISBN cannot be empty".to_string()));
        }
        self.stores.lock().await.catalog.add(book.clone())?;
        tracing::info!("Added book {}", book.display());
        Ok(book)
    }

    /// Create a plain book from the metadata service's record for `isbn`
    pub async fn add_book_from_isbn(&self, isbn: &str) -> AppResult<Book> {
        let isbn = isbn.trim();
        if isbn.is_empty() {
            return Err(AppError::Validation("ISBN cannot be empty".to_string()));
        }

        // Checked before the lookup so a known ISBN never hits the network
        if self.stores.lock().await.catalog.find(isbn).is_some() {
            return Err(duplicate(isbn));
        }

        let metadata = self
            .metadata
            .lookup(isbn)
            .await
            .ok_or_else(|| AppError::MetadataNotFound(isbn.to_string()))?;

        let book = Book::plain(metadata.title, metadata.author, isbn);
        self.stores.lock().await.catalog.add(book.clone())?;
        tracing::info!("Imported book {}", book.display());
        Ok(book)
    }

    /// Delete a book; refused while it is lent out
    pub async fn delete_book(&self, isbn: &str) -> AppResult<Book> {
        let mut stores = self.stores.lock().await;
        let book = stores.catalog.find(isbn).ok_or_else(|| not_found(isbn))?;
        if book.is_borrowed() {
            return Err(AppError::BookBorrowed(book.title.clone()));
        }

        let key = book.isbn.clone();
        let removed = stores.catalog.remove(&key)?;
        tracing::info!("Removed book {}", removed.display());
        Ok(removed)
    }
}

fn not_found(isbn: &str) -> AppError {
    AppError::NotFound {
        kind: Book::KIND,
        key_label: Book::KEY_LABEL,
        key: isbn.trim().to_string(),
    }
}

fn duplicate(isbn: &str) -> AppError {
    AppError::DuplicateKey {
        kind: Book::KIND,
        key_label: Book::KEY_LABEL,
        key: isbn.to_string(),
    }
}
