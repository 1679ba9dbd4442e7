//! Loan management service

use super::{circulation, SharedStores};
use crate::{
    error::{AppError, AppResult},
    models::Book,
    repository::CatalogStore,
};

#[derive(Clone)]
pub struct LoansService {
    stores: SharedStores,
}

impl LoansService {
    pub fn new(stores: SharedStores) -> Self {
        Self { stores }
    }

    /// Borrow a book on behalf of a member
    pub async fn borrow(&self, member_id: &str, isbn: &str) -> AppResult<Book> {
        let mut stores = self.stores.lock().await;
        let stores = &mut *stores;
        circulation::borrow(&mut stores.catalog, &mut stores.membership, member_id, isbn)?;
        current_book(&stores.catalog, isbn)
    }

    /// Return a borrowed book
    pub async fn return_book(&self, member_id: &str, isbn: &str) -> AppResult<Book> {
        let mut stores = self.stores.lock().await;
        let stores = &mut *stores;
        circulation::return_(&mut stores.catalog, &mut stores.membership, member_id, isbn)?;
        current_book(&stores.catalog, isbn)
    }

    /// Books a member currently holds, in borrow order
    pub async fn member_loans(&self, member_id: &str) -> AppResult<Vec<Book>> {
        let stores = self.stores.lock().await;
        let member = stores
            .membership
            .find(member_id)
            .ok_or_else(|| AppError::MemberNotFound(member_id.trim().to_string()))?;

        Ok(member
            .borrowed_books()
            .iter()
            .filter_map(|isbn| stores.catalog.find(isbn).cloned())
            .collect())
    }
}

fn current_book(catalog: &CatalogStore, isbn: &str) -> AppResult<Book> {
    catalog
        .find(isbn)
        .cloned()
        .ok_or_else(|| AppError::BookNotFound(isbn.trim().to_string()))
}
