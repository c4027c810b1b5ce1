use std::collections::{BTreeMap, HashMap};
use crate::core::domain::Identifiable;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::{IdSequence, Repository};
use crate::members::domain::model::MemberEntity;
use crate::members::repository::MemberRepository;

// MemoryMemberRepository keeps members keyed by identity plus a unique email index.
#[derive(Debug)]
pub(crate) struct MemoryMemberRepository {
    members: BTreeMap<String, MemberEntity>,
    email_index: HashMap<String, String>,
    ids: IdSequence,
}

impl MemoryMemberRepository {
    pub(crate) fn new() -> Self {
        Self {
            members: BTreeMap::new(),
            email_index: HashMap::new(),
            ids: IdSequence::new('M'),
        }
    }
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

impl Repository<MemberEntity> for MemoryMemberRepository {
    fn next_id(&mut self) -> String {
        self.ids.next_id()
    }

    fn create(&mut self, entity: &MemberEntity) -> LibraryResult<usize> {
        if self.members.contains_key(entity.member_id.as_str()) {
            return Err(LibraryError::conflict(
                format!("member {} already exists", entity.member_id).as_str()));
        }
        let key = email_key(entity.email.as_str());
        if self.email_index.contains_key(key.as_str()) {
            return Err(LibraryError::conflict(
                format!("a member with email {} already exists", entity.email).as_str()));
        }
        self.email_index.insert(key, entity.member_id.to_string());
        self.members.insert(entity.id(), entity.clone());
        Ok(1)
    }

    fn update(&mut self, entity: &MemberEntity) -> LibraryResult<usize> {
        let existing = self.members.get(entity.member_id.as_str()).ok_or_else(|| LibraryError::not_found(
            format!("member {} not found", entity.member_id).as_str()))?;
        let old_key = email_key(existing.email.as_str());
        let new_key = email_key(entity.email.as_str());
        if old_key != new_key {
            if let Some(owner) = self.email_index.get(new_key.as_str()) {
                return Err(LibraryError::conflict(
                    format!("email {} already belongs to member {}", entity.email, owner).as_str()));
            }
            self.email_index.remove(old_key.as_str());
            self.email_index.insert(new_key, entity.member_id.to_string());
        }
        let mut updated = entity.clone();
        updated.version = existing.version + 1;
        self.members.insert(updated.member_id.to_string(), updated);
        Ok(1)
    }

    fn get(&self, id: &str) -> Option<MemberEntity> {
        self.members.get(id).cloned()
    }

    fn delete(&mut self, id: &str) -> LibraryResult<usize> {
        let removed = self.members.remove(id).ok_or_else(|| LibraryError::not_found(
            format!("member {} not found", id).as_str()))?;
        self.email_index.remove(email_key(removed.email.as_str()).as_str());
        Ok(1)
    }

    fn list(&self) -> Vec<MemberEntity> {
        self.members.values().cloned().collect()
    }
}

impl MemberRepository for MemoryMemberRepository {
    fn find_by_email(&self, email: &str) -> Option<MemberEntity> {
        self.email_index.get(email_key(email).as_str()).and_then(|id| self.members.get(id)).cloned()
    }
}
