//! Borrow/return workflow across the catalog and membership stores.
//!
//! Both record mutations happen in memory first; the stores are saved only
//! once both succeeded. If the member-side step fails, the book-side change
//! is undone before the error is returned, so nothing inconsistent is ever
//! written. If a save fails, both mutations are undone in memory and an
//! already written catalog file is rewritten, so a retry starts from the
//! state on disk.

use crate::{
    error::{AppError, AppResult},
    repository::{CatalogStore, MembershipStore},
};

/// Lend the book `isbn` to member `member_id`
pub fn borrow(
    catalog: &mut CatalogStore,
    membership: &mut MembershipStore,
    member_id: &str,
    isbn: &str,
) -> AppResult<()> {
    let member = membership
        .find_mut(member_id)
        .ok_or_else(|| AppError::MemberNotFound(member_id.trim().to_string()))?;
    let book = catalog
        .find_mut(isbn)
        .ok_or_else(|| AppError::BookNotFound(isbn.trim().to_string()))?;

    book.borrow()?;
    if let Err(e) = member.borrow_isbn(&book.isbn) {
        book.return_()?;
        return Err(e);
    }

    let (member_id, isbn) = (member.member_id.clone(), book.isbn.clone());
    commit(catalog, membership, |catalog, membership| {
        if let Some(book) = catalog.find_mut(&isbn) {
            let _ = book.return_();
        }
        if let Some(member) = membership.find_mut(&member_id) {
            let _ = member.return_isbn(&isbn);
        }
    })?;

    tracing::info!("Member {} borrowed {}", member_id, isbn);
    Ok(())
}

/// Take back the book `isbn` from member `member_id`
pub fn return_(
    catalog: &mut CatalogStore,
    membership: &mut MembershipStore,
    member_id: &str,
    isbn: &str,
) -> AppResult<()> {
    let member = membership
        .find_mut(member_id)
        .ok_or_else(|| AppError::MemberNotFound(member_id.trim().to_string()))?;
    let book = catalog
        .find_mut(isbn)
        .ok_or_else(|| AppError::BookNotFound(isbn.trim().to_string()))?;

    let snapshot = member.clone();
    book.return_()?;
    if let Err(e) = member.return_isbn(&book.isbn) {
        book.borrow()?;
        return Err(e);
    }

    let (member_id, isbn) = (member.member_id.clone(), book.isbn.clone());
    commit(catalog, membership, |catalog, membership| {
        if let Some(book) = catalog.find_mut(&isbn) {
            let _ = book.borrow();
        }
        // the snapshot keeps the original loan order
        if let Some(member) = membership.find_mut(&member_id) {
            *member = snapshot;
        }
    })?;

    tracing::info!("Member {} returned {}", member_id, isbn);
    Ok(())
}

/// Save both stores, running `undo` if either save fails
fn commit(
    catalog: &mut CatalogStore,
    membership: &mut MembershipStore,
    undo: impl FnOnce(&mut CatalogStore, &mut MembershipStore),
) -> AppResult<()> {
    if let Err(e) = catalog.save() {
        undo(catalog, membership);
        return Err(e);
    }
    if let Err(e) = membership.save() {
        undo(catalog, membership);
        if let Err(restore) = catalog.save() {
            tracing::error!(
                "Couldn't restore {} after a failed save: {}",
                catalog.path().display(),
                restore
            );
        }
        return Err(e);
    }
    Ok(())
}
