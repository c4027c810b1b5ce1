use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::core::library::LoanStatus;
use crate::utils::date::{days_between, serializer};

// LoanEntity abstracts one copy of a book lent to a member. Loans are kept as history once returned.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct LoanEntity {
    pub loan_id: String,
    pub version: i64,
    pub member_id: String,
    pub book_id: String,
    pub status: LoanStatus,
    #[serde(with = "serializer")]
    pub loan_date: NaiveDateTime,
    #[serde(with = "serializer")]
    pub due_date: NaiveDateTime,
    pub return_date: Option<NaiveDateTime>,
    pub renewal_count: u32,
    pub penalty: f64,
    pub penalty_paid: bool,
    pub paid_amount: f64,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl LoanEntity {
    pub fn new(loan_id: &str, member_id: &str, book_id: &str, loan_date: NaiveDateTime, due_date: NaiveDateTime) -> Self {
        Self {
            loan_id: loan_id.to_string(),
            version: 0,
            member_id: member_id.to_string(),
            book_id: book_id.to_string(),
            status: LoanStatus::Active,
            loan_date,
            due_date,
            return_date: None,
            renewal_count: 0,
            penalty: 0.0,
            penalty_paid: false,
            paid_amount: 0.0,
            created_at: loan_date,
            updated_at: loan_date,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    pub fn is_past_due(&self, now: NaiveDateTime) -> bool {
        self.due_date < now
    }

    // whole days elapsed since the due date, 0 while not past due
    pub fn days_overdue(&self, now: NaiveDateTime) -> i64 {
        days_between(Some(self.due_date), Some(now)).max(0)
    }

    // what is still owed once earlier payments are credited
    pub fn unpaid_penalty(&self) -> f64 {
        (self.penalty - self.paid_amount).max(0.0)
    }

    // replaces the accrued penalty; payments already made stay credited
    pub fn assess_penalty(&mut self, amount: f64) {
        self.penalty = amount;
        self.penalty_paid = amount > 0.0 && self.paid_amount >= amount;
    }

    // settles the outstanding balance and returns the amount collected
    pub fn settle_penalty(&mut self) -> f64 {
        let collected = self.unpaid_penalty();
        self.paid_amount += collected;
        self.penalty_paid = self.penalty > 0.0;
        collected
    }
}

impl Identifiable for LoanEntity {
    fn id(&self) -> String {
        self.loan_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}


#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use crate::core::library::LoanStatus;
    use crate::loans::domain::model::LoanEntity;

    #[tokio::test]
    async fn test_should_build_loan() {
        let now = Utc::now().naive_utc();
        let loan = LoanEntity::new("L00001", "M00001", "B00001", now, now + Duration::days(14));
        assert_eq!(LoanStatus::Active, loan.status);
        assert_eq!(0, loan.renewal_count);
        assert_eq!(0.0, loan.penalty);
        assert!(loan.return_date.is_none());
        assert!(loan.is_open());
    }

    #[tokio::test]
    async fn test_should_count_days_overdue() {
        let now = Utc::now().naive_utc();
        let loan = LoanEntity::new("L00001", "M00001", "B00001", now, now + Duration::days(14));
        assert!(!loan.is_past_due(now));
        assert_eq!(0, loan.days_overdue(now));
        assert!(loan.is_past_due(now + Duration::days(14) + Duration::hours(1)));
        assert_eq!(0, loan.days_overdue(now + Duration::days(14) + Duration::hours(1)));
        assert_eq!(4, loan.days_overdue(now + Duration::days(18)));
    }

    #[tokio::test]
    async fn test_should_ignore_paid_penalty() {
        let now = Utc::now().naive_utc();
        let mut loan = LoanEntity::new("L00001", "M00001", "B00001", now, now);
        loan.assess_penalty(2.5);
        assert_eq!(2.5, loan.unpaid_penalty());
        assert!(!loan.penalty_paid);
        assert_eq!(2.5, loan.settle_penalty());
        assert_eq!(0.0, loan.unpaid_penalty());
        assert!(loan.penalty_paid);
    }

    #[tokio::test]
    async fn test_should_credit_earlier_payment_when_penalty_grows() {
        let now = Utc::now().naive_utc();
        let mut loan = LoanEntity::new("L00001", "M00001", "B00001", now, now);
        loan.assess_penalty(1.0);
        let _ = loan.settle_penalty();
        loan.assess_penalty(2.0);
        assert!(!loan.penalty_paid);
        assert_eq!(1.0, loan.unpaid_penalty());
        assert_eq!(1.0, loan.settle_penalty());
        assert_eq!(2.0, loan.paid_amount);
        assert_eq!(0.0, loan.settle_penalty());
    }
}
