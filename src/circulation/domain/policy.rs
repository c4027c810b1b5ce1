use std::collections::HashMap;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use crate::core::library::MemberType;

// MemberPolicy holds the borrowing terms granted to a member type
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct MemberPolicy {
    pub quota: u32,
    pub penalty_rate: f64,
    pub penalty_cap: f64,
}

lazy_static! {
    static ref POLICIES: HashMap<MemberType, MemberPolicy> = HashMap::from([
        (MemberType::Student, MemberPolicy { quota: 3, penalty_rate: 0.25, penalty_cap: 10.0 }),
        (MemberType::Teacher, MemberPolicy { quota: 10, penalty_rate: 0.0, penalty_cap: 0.0 }),
        (MemberType::Staff, MemberPolicy { quota: 5, penalty_rate: 0.25, penalty_cap: 15.0 }),
        (MemberType::External, MemberPolicy { quota: 2, penalty_rate: 0.50, penalty_cap: 25.0 }),
    ]);
}

// falls back to the most restrictive terms for a type missing from the table
pub fn policy_for(member_type: MemberType) -> MemberPolicy {
    POLICIES.get(&member_type).copied().unwrap_or(MemberPolicy { quota: 0, penalty_rate: 0.0, penalty_cap: 0.0 })
}

pub fn calculate_penalty(member_type: MemberType, days_late: i64) -> f64 {
    if days_late <= 0 {
        return 0.0;
    }
    let policy = policy_for(member_type);
    (policy.penalty_rate * days_late as f64).min(policy.penalty_cap)
}

#[cfg(test)]
mod tests {
    use crate::circulation::domain::policy::{calculate_penalty, policy_for};
    use crate::core::library::MemberType;

    #[tokio::test]
    async fn test_should_define_policy_for_every_type() {
        assert_eq!(3, policy_for(MemberType::Student).quota);
        assert_eq!(10, policy_for(MemberType::Teacher).quota);
        assert_eq!(5, policy_for(MemberType::Staff).quota);
        assert_eq!(2, policy_for(MemberType::External).quota);
        for kind in MemberType::ALL {
            let policy = policy_for(kind);
            assert!(policy.penalty_rate >= 0.0);
            assert!(policy.penalty_cap >= 0.0);
        }
    }

    #[tokio::test]
    async fn test_should_calculate_penalty() {
        assert_eq!(1.0, calculate_penalty(MemberType::Student, 4));
        assert_eq!(10.0, calculate_penalty(MemberType::Student, 100));
        assert_eq!(0.0, calculate_penalty(MemberType::Teacher, 10));
        assert_eq!(2.0, calculate_penalty(MemberType::External, 4));
        assert_eq!(25.0, calculate_penalty(MemberType::External, 100));
        assert_eq!(1.25, calculate_penalty(MemberType::Staff, 5));
        assert_eq!(15.0, calculate_penalty(MemberType::Staff, 365));
    }

    #[tokio::test]
    async fn test_should_not_charge_when_on_time() {
        for kind in MemberType::ALL {
            assert_eq!(0.0, calculate_penalty(kind, 0));
            assert_eq!(0.0, calculate_penalty(kind, -1));
        }
    }
}
