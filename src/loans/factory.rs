use crate::loans::repository::LoanRepository;
use crate::loans::repository::memory_loan_repository::MemoryLoanRepository;

pub fn create_loan_repository() -> Box<dyn LoanRepository> {
    Box::new(MemoryLoanRepository::new())
}
