pub mod memory_member_repository;

use crate::core::repository::Repository;
use crate::members::domain::model::MemberEntity;

pub trait MemberRepository: Repository<MemberEntity> {
    // lookup is case-insensitive on the address
    fn find_by_email(&self, email: &str) -> Option<MemberEntity>;
}
