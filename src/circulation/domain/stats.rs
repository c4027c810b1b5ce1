use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use crate::core::library::{BookCategory, MemberType};

// LoanStatistics aggregates the loan table for reporting
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct LoanStatistics {
    pub total_loans: usize,
    pub active_loans: usize,
    pub overdue_loans: usize,
    pub returned_loans: usize,
    // open loans past their due date, flagged by a sweep or not
    pub past_due_loans: usize,
    pub accrued_penalties: f64,
    pub unpaid_penalties: f64,
    pub open_loans_by_member_type: BTreeMap<MemberType, usize>,
}

// InventoryStatistics aggregates the catalog for reporting
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct InventoryStatistics {
    pub titles: usize,
    pub active_titles: usize,
    pub total_copies: u64,
    pub available_copies: u64,
    pub borrowed_copies: u64,
    pub titles_by_category: BTreeMap<BookCategory, usize>,
    pub pending_reservations: usize,
}

impl LoanStatistics {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

impl InventoryStatistics {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use crate::circulation::domain::stats::{InventoryStatistics, LoanStatistics};
    use crate::core::library::{BookCategory, MemberType};

    #[tokio::test]
    async fn test_should_serialize_statistics() {
        let mut loans = LoanStatistics { total_loans: 2, active_loans: 1, ..Default::default() };
        loans.open_loans_by_member_type.insert(MemberType::Student, 1);
        let json = loans.to_json();
        assert!(json.contains("\"total_loans\":2"));
        assert!(json.contains("Student"));

        let mut inventory = InventoryStatistics { titles: 1, ..Default::default() };
        inventory.titles_by_category.insert(BookCategory::Science, 1);
        assert!(inventory.to_json().contains("Science"));
    }
}
