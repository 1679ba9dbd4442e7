//! Membership store: members keyed by member ID

use super::{JsonStore, Record};
use crate::models::Member;

pub type MembershipStore = JsonStore<Member>;

impl Record for Member {
    const KIND: &'static str = "member";
    const KEY_LABEL: &'static str = "ID";

    fn key(&self) -> &str {
        &self.member_id
    }
}
