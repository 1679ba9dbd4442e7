//! Membership service

use super::SharedStores;
use crate::{
    error::{AppError, AppResult},
    models::Member,
    repository::Record,
};

#[derive(Clone)]
pub struct MembersService {
    stores: SharedStores,
}

impl MembersService {
    pub fn new(stores: SharedStores) -> Self {
        Self { stores }
    }

    pub async fn list_members(&self) -> Vec<Member> {
        self.stores.lock().await.membership.list()
    }

    pub async fn count_members(&self) -> usize {
        self.stores.lock().await.membership.len()
    }

    /// Get a member by ID
    pub async fn get_member(&self, member_id: &str) -> AppResult<Member> {
        self.stores
            .lock()
            .await
            .membership
            .find(member_id)
            .cloned()
            .ok_or_else(|| not_found(member_id))
    }

    /// Register a new member
    pub async fn add_member(&self, member: Member) -> AppResult<Member> {
        if member.member_id.trim().is_empty() {
            return Err(AppError::Validation("Member ID cannot be empty".to_string()));
        }
        self.stores.lock().await.membership.add(member.clone())?;
        tracing::info!("Added member {}", member.member_id);
        Ok(member)
    }

    /// Delete a member; refused while they still hold books
    pub async fn delete_member(&self, member_id: &str) -> AppResult<Member> {
        let mut stores = self.stores.lock().await;
        let member = stores
            .membership
            .find(member_id)
            .ok_or_else(|| not_found(member_id))?;
        if !member.borrowed_books().is_empty() {
            return Err(AppError::MemberHasLoans(member.member_id.clone()));
        }

        let key = member.member_id.clone();
        let removed = stores.membership.remove(&key)?;
        tracing::info!("Removed member {}", removed.member_id);
        Ok(removed)
    }
}

fn not_found(member_id: &str) -> AppError {
    AppError::NotFound {
        kind: Member::KIND,
        key_label: Member::KEY_LABEL,
        key: member_id.trim().to_string(),
    }
}
