use std::str::FromStr;
use chrono::NaiveDateTime;
use tracing::{debug, info};
use crate::core::domain::Configuration;
use crate::core::library::{LibraryError, LibraryResult, MemberType};
use crate::directory::domain::{AddMemberRequest, DirectoryService};
use crate::members::domain::model::MemberEntity;
use crate::members::repository::MemberRepository;
use crate::utils::validation;

pub(crate) struct DirectoryServiceImpl {
    branch_id: String,
    membership_days: i64,
    member_repository: Box<dyn MemberRepository>,
}

impl DirectoryServiceImpl {
    pub(crate) fn new(config: &Configuration, member_repository: Box<dyn MemberRepository>) -> Self {
        Self {
            branch_id: config.branch_id.to_string(),
            membership_days: config.membership_days,
            member_repository,
        }
    }
}

fn validate_member(first_name: &str, last_name: &str, email: &str) -> LibraryResult<()> {
    for (value, field) in [(first_name, "first_name"), (last_name, "last_name")] {
        if !validation::is_not_empty(Some(value)) {
            return Err(LibraryError::validation(validation::required_field_message(field).as_str(),
                                                Some("REQUIRED_FIELD".to_string())));
        }
    }
    if !validation::is_valid_email(Some(email)) {
        return Err(LibraryError::validation(validation::email_error_message(), Some("INVALID_EMAIL".to_string())));
    }
    Ok(())
}

impl DirectoryService for DirectoryServiceImpl {
    fn add_member(&mut self, req: &AddMemberRequest, now: NaiveDateTime) -> LibraryResult<String> {
        validate_member(req.first_name.as_str(), req.last_name.as_str(), req.email.as_str())?;
        let member_type = MemberType::from_str(req.member_type.as_str())?;
        if let Some(existing) = self.member_repository.find_by_email(req.email.as_str()) {
            return Err(LibraryError::conflict(
                format!("email {} is already registered to {}", req.email, existing.member_id).as_str()));
        }
        let member_id = self.member_repository.next_id();
        let member = MemberEntity::new(member_id.as_str(), req.first_name.trim(), req.last_name.trim(),
                                       req.email.trim(), member_type, self.membership_days, now);
        self.member_repository.create(&member)?;
        info!(branch = %self.branch_id, member_id = %member_id, member_type = %member_type, "member registered");
        Ok(member_id)
    }

    fn update_member(&mut self, member: &MemberEntity) -> LibraryResult<MemberEntity> {
        validate_member(member.first_name.as_str(), member.last_name.as_str(), member.email.as_str())?;
        self.member_repository.update(member)?;
        debug!(branch = %self.branch_id, member_id = %member.member_id, "member updated");
        self.member_repository.get(member.member_id.as_str()).ok_or_else(|| LibraryError::not_found(
            format!("member {} not found", member.member_id).as_str()))
    }

    fn remove_member(&mut self, id: &str) -> LibraryResult<()> {
        self.member_repository.delete(id)?;
        info!(branch = %self.branch_id, member_id = %id, "member removed");
        Ok(())
    }

    fn find_member_by_id(&self, id: &str) -> Option<MemberEntity> {
        self.member_repository.get(id)
    }

    fn find_member_by_email(&self, email: &str) -> Option<MemberEntity> {
        self.member_repository.find_by_email(email)
    }

    fn list_members(&self) -> Vec<MemberEntity> {
        self.member_repository.list()
    }
}


#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use crate::core::domain::Configuration;
    use crate::core::library::{LibraryError, MemberType};
    use crate::directory::domain::{AddMemberRequest, DirectoryService};
    use crate::directory::factory;

    fn sut() -> Box<dyn DirectoryService> {
        factory::create_directory_service(&Configuration::new("test"))
    }

    #[tokio::test]
    async fn test_should_add_member() {
        let mut directory_svc = sut();
        let now = Utc::now().naive_utc();
        let id = directory_svc.add_member(&AddMemberRequest::new("Grace", "Hopper", "grace@example.com", "teacher"), now)
            .expect("should add member");
        assert_eq!("M00001", id.as_str());

        let loaded = directory_svc.find_member_by_id(id.as_str()).expect("should return member");
        assert_eq!(MemberType::Teacher, loaded.member_type);
        assert_eq!(now + Duration::days(365), loaded.membership_expires_at);
        assert_eq!(Some(loaded), directory_svc.find_member_by_email("grace@example.com"));
    }

    #[tokio::test]
    async fn test_should_reject_invalid_members() {
        let mut directory_svc = sut();
        let now = Utc::now().naive_utc();
        let cases = vec![
            AddMemberRequest::new("", "Hopper", "grace@example.com", "STUDENT"),
            AddMemberRequest::new("Grace", "", "grace@example.com", "STUDENT"),
            AddMemberRequest::new("Grace", "Hopper", "not-an-email", "STUDENT"),
            AddMemberRequest::new("Grace", "Hopper", "grace@example.com", "ADMIRAL"),
        ];
        for req in cases {
            assert!(matches!(directory_svc.add_member(&req, now), Err(LibraryError::Validation{ .. })), "{:?}", req);
        }
        assert!(directory_svc.list_members().is_empty());
    }

    #[tokio::test]
    async fn test_should_reject_duplicate_email() {
        let mut directory_svc = sut();
        let now = Utc::now().naive_utc();
        let _ = directory_svc.add_member(&AddMemberRequest::new("Grace", "Hopper", "grace@example.com", "STAFF"), now)
            .expect("should add member");
        let res = directory_svc.add_member(&AddMemberRequest::new("Other", "Grace", "grace@example.com", "STUDENT"), now);
        assert!(matches!(res, Err(LibraryError::Conflict{ .. })));
    }

    #[tokio::test]
    async fn test_should_update_and_remove_member() {
        let mut directory_svc = sut();
        let id = directory_svc.add_member(&AddMemberRequest::new("Grace", "Hopper", "grace@example.com", "STAFF"),
                                          Utc::now().naive_utc()).expect("should add member");
        let mut member = directory_svc.find_member_by_id(id.as_str()).expect("should return member");
        member.last_name = "Brewster Hopper".to_string();
        let updated = directory_svc.update_member(&member).expect("should update member");
        assert_eq!("Grace Brewster Hopper", updated.full_name());

        member.email = "broken".to_string();
        assert!(matches!(directory_svc.update_member(&member), Err(LibraryError::Validation{ .. })));

        directory_svc.remove_member(id.as_str()).expect("should remove member");
        assert!(directory_svc.find_member_by_id(id.as_str()).is_none());
        assert!(directory_svc.find_member_by_email("grace@example.com").is_none());
    }
}
