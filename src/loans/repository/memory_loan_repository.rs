use std::collections::BTreeMap;
use crate::core::domain::Identifiable;
use crate::core::library::{LibraryError, LibraryResult, LoanStatus};
use crate::core::repository::{IdSequence, Repository};
use crate::loans::domain::model::LoanEntity;
use crate::loans::repository::LoanRepository;

#[derive(Debug)]
pub(crate) struct MemoryLoanRepository {
    loans: BTreeMap<String, LoanEntity>,
    ids: IdSequence,
}

impl MemoryLoanRepository {
    pub(crate) fn new() -> Self {
        Self {
            loans: BTreeMap::new(),
            ids: IdSequence::new('L'),
        }
    }

    fn filter<P: Fn(&LoanEntity) -> bool>(&self, predicate: P) -> Vec<LoanEntity> {
        self.loans.values().filter(|l| predicate(l)).cloned().collect()
    }
}

impl Repository<LoanEntity> for MemoryLoanRepository {
    fn next_id(&mut self) -> String {
        self.ids.next_id()
    }

    fn create(&mut self, entity: &LoanEntity) -> LibraryResult<usize> {
        if self.loans.contains_key(entity.loan_id.as_str()) {
            return Err(LibraryError::conflict(
                format!("loan {} already exists", entity.loan_id).as_str()));
        }
        self.loans.insert(entity.id(), entity.clone());
        Ok(1)
    }

    fn update(&mut self, entity: &LoanEntity) -> LibraryResult<usize> {
        let existing = self.loans.get(entity.loan_id.as_str()).ok_or_else(|| LibraryError::not_found(
            format!("loan {} not found", entity.loan_id).as_str()))?;
        let mut updated = entity.clone();
        updated.version = existing.version + 1;
        self.loans.insert(updated.loan_id.to_string(), updated);
        Ok(1)
    }

    fn get(&self, id: &str) -> Option<LoanEntity> {
        self.loans.get(id).cloned()
    }

    fn delete(&mut self, id: &str) -> LibraryResult<usize> {
        self.loans.remove(id).map(|_| 1).ok_or_else(|| LibraryError::not_found(
            format!("loan {} not found", id).as_str()))
    }

    fn list(&self) -> Vec<LoanEntity> {
        self.loans.values().cloned().collect()
    }
}

impl LoanRepository for MemoryLoanRepository {
    fn find_by_member(&self, member_id: &str) -> Vec<LoanEntity> {
        self.filter(|l| l.member_id == member_id)
    }

    fn find_by_status(&self, status: LoanStatus) -> Vec<LoanEntity> {
        self.filter(|l| l.status == status)
    }

    fn find_open_by_book(&self, book_id: &str) -> Vec<LoanEntity> {
        self.filter(|l| l.book_id == book_id && l.is_open())
    }

    fn find_open(&self, member_id: &str, book_id: &str) -> Option<LoanEntity> {
        self.loans.values()
            .find(|l| l.member_id == member_id && l.book_id == book_id && l.is_open())
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use crate::core::library::{LibraryError, LoanStatus};
    use crate::core::repository::Repository;
    use crate::loans::domain::model::LoanEntity;
    use crate::loans::repository::LoanRepository;
    use crate::loans::repository::memory_loan_repository::MemoryLoanRepository;

    fn new_loan(repo: &mut MemoryLoanRepository, member_id: &str, book_id: &str) -> LoanEntity {
        let id = repo.next_id();
        let now = Utc::now().naive_utc();
        LoanEntity::new(id.as_str(), member_id, book_id, now, now + Duration::days(14))
    }

    #[tokio::test]
    async fn test_should_create_and_query_loans() {
        let mut repo = MemoryLoanRepository::new();
        let first = new_loan(&mut repo, "M00001", "B00001");
        let second = new_loan(&mut repo, "M00001", "B00002");
        let third = new_loan(&mut repo, "M00002", "B00001");
        for loan in [&first, &second, &third] {
            let _ = repo.create(loan).expect("should create loan");
        }
        assert_eq!("L00001", first.loan_id.as_str());
        assert_eq!(2, repo.find_by_member("M00001").len());
        assert_eq!(2, repo.find_open_by_book("B00001").len());
        assert_eq!(Some(third.clone()), repo.find_open("M00002", "B00001"));
        assert_eq!(None, repo.find_open("M00002", "B00002"));
        assert!(matches!(repo.create(&third), Err(LibraryError::Conflict{ .. })));
    }

    #[tokio::test]
    async fn test_should_update_status() {
        let mut repo = MemoryLoanRepository::new();
        let mut loan = new_loan(&mut repo, "M00001", "B00001");
        let _ = repo.create(&loan).expect("should create loan");

        loan.status = LoanStatus::Returned;
        let _ = repo.update(&loan).expect("should update loan");
        assert_eq!(None, repo.find_open("M00001", "B00001"));
        assert_eq!(1, repo.find_by_status(LoanStatus::Returned).len());
        assert!(repo.find_by_status(LoanStatus::Active).is_empty());
        assert_eq!(1, repo.get(loan.loan_id.as_str()).expect("should get loan").version);
    }
}
