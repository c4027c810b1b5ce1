use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::core::library::MemberType;
use crate::utils::date::serializer;

// MemberEntity abstracts a registered borrower. `current_loans` and `late_returns`
// are maintained by circulation only.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct MemberEntity {
    pub member_id: String,
    pub version: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub member_type: MemberType,
    pub active: bool,
    #[serde(with = "serializer")]
    pub membership_expires_at: NaiveDateTime,
    pub current_loans: u32,
    pub late_returns: u32,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl MemberEntity {
    pub fn new(member_id: &str, first_name: &str, last_name: &str, email: &str,
               member_type: MemberType, membership_days: i64, now: NaiveDateTime) -> Self {
        Self {
            member_id: member_id.to_string(),
            version: 0,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            member_type,
            active: true,
            membership_expires_at: now + Duration::days(membership_days),
            current_loans: 0,
            late_returns: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        self.membership_expires_at < now
    }
}

impl Identifiable for MemberEntity {
    fn id(&self) -> String {
        self.member_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}


#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use crate::core::library::MemberType;
    use crate::members::domain::model::MemberEntity;

    #[tokio::test]
    async fn test_should_build_member() {
        let now = Utc::now().naive_utc();
        let member = MemberEntity::new("M00001", "Ada", "Lovelace", "ada@example.com", MemberType::Staff, 365, now);
        assert_eq!("ada@example.com", member.email.as_str());
        assert_eq!("Ada Lovelace", member.full_name());
        assert_eq!(MemberType::Staff, member.member_type);
        assert_eq!(0, member.current_loans);
        assert!(member.active);
        assert_eq!(now + Duration::days(365), member.membership_expires_at);
    }

    #[tokio::test]
    async fn test_should_expire_membership() {
        let now = Utc::now().naive_utc();
        let member = MemberEntity::new("M00001", "Ada", "Lovelace", "ada@example.com", MemberType::Staff, 10, now);
        assert!(!member.is_expired(now));
        assert!(!member.is_expired(now + Duration::days(10)));
        assert!(member.is_expired(now + Duration::days(11)));
    }
}
