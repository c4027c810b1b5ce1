pub mod memory_loan_repository;

use crate::core::library::LoanStatus;
use crate::core::repository::Repository;
use crate::loans::domain::model::LoanEntity;

pub trait LoanRepository: Repository<LoanEntity> {
    fn find_by_member(&self, member_id: &str) -> Vec<LoanEntity>;

    fn find_by_status(&self, status: LoanStatus) -> Vec<LoanEntity>;

    // ACTIVE or OVERDUE loans of a book
    fn find_open_by_book(&self, book_id: &str) -> Vec<LoanEntity>;

    // the ACTIVE or OVERDUE loan of a (member, book) pair, at most one exists
    fn find_open(&self, member_id: &str, book_id: &str) -> Option<LoanEntity>;
}
