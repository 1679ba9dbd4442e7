//! Catalog store: books keyed by ISBN

use super::{JsonStore, Record};
use crate::models::Book;

pub type CatalogStore = JsonStore<Book>;

impl Record for Book {
    const KIND: &'static str = "book";
    const KEY_LABEL: &'static str = "ISBN";

    fn key(&self) -> &str {
        &self.isbn
    }
}

impl CatalogStore {
    /// Books currently lent out
    pub fn borrowed(&self) -> Vec<Book> {
        self.records
            .iter()
            .filter(|b| b.is_borrowed())
            .cloned()
            .collect()
    }
}
