pub mod service;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::core::library::LibraryResult;
use crate::members::domain::model::MemberEntity;

// AddMemberRequest carries the unvalidated input of a registration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddMemberRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub member_type: String,
}

impl AddMemberRequest {
    pub fn new(first_name: &str, last_name: &str, email: &str, member_type: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            member_type: member_type.to_string(),
        }
    }
}

// DirectoryService owns member records. Lookups return None for unknown identities.
pub trait DirectoryService: Sync + Send {
    fn add_member(&mut self, req: &AddMemberRequest, now: NaiveDateTime) -> LibraryResult<String>;
    fn update_member(&mut self, member: &MemberEntity) -> LibraryResult<MemberEntity>;
    fn remove_member(&mut self, id: &str) -> LibraryResult<()>;
    fn find_member_by_id(&self, id: &str) -> Option<MemberEntity>;
    fn find_member_by_email(&self, email: &str) -> Option<MemberEntity>;
    fn list_members(&self) -> Vec<MemberEntity>;
}
