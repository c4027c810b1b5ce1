pub mod policy;
pub mod service;
pub mod stats;

use chrono::NaiveDateTime;
use crate::books::domain::model::BookEntity;
use crate::catalog::domain::AddBookRequest;
use crate::circulation::domain::stats::{InventoryStatistics, LoanStatistics};
use crate::core::events::DomainEvent;
use crate::core::library::LibraryResult;
use crate::directory::domain::AddMemberRequest;
use crate::loans::domain::model::LoanEntity;
use crate::members::domain::model::MemberEntity;
use crate::reservations::domain::model::ReservationEntity;

// LoanFilter selects which loans `list_loans` returns
#[derive(Debug, PartialEq, Clone)]
pub enum LoanFilter {
    All,
    Active,
    // OVERDUE loans and ACTIVE loans already past due
    Overdue,
    Member(String),
}

// CirculationService owns catalog, directory, loans and reservations and applies the
// borrowing rules across them. Each call is one unit of work; `now` is supplied by the caller.
// Notifications produced along the way are buffered until `drain_events`.
pub trait CirculationService: Sync + Send {
    // catalog
    fn add_book(&mut self, req: &AddBookRequest, now: NaiveDateTime) -> LibraryResult<String>;
    fn get_book(&self, id: &str) -> Option<BookEntity>;
    fn get_book_by_isbn(&self, isbn: &str) -> Option<BookEntity>;
    fn search_books(&self, text: &str) -> Vec<BookEntity>;
    fn list_books(&self) -> Vec<BookEntity>;
    fn update_book(&mut self, book: &BookEntity, now: NaiveDateTime) -> LibraryResult<BookEntity>;
    fn delete_book(&mut self, id: &str, now: NaiveDateTime) -> LibraryResult<()>;

    // directory
    fn add_member(&mut self, req: &AddMemberRequest, now: NaiveDateTime) -> LibraryResult<String>;
    fn get_member(&self, id: &str) -> Option<MemberEntity>;
    fn get_member_by_email(&self, email: &str) -> Option<MemberEntity>;
    fn list_members(&self) -> Vec<MemberEntity>;
    fn update_member(&mut self, member: &MemberEntity, now: NaiveDateTime) -> LibraryResult<MemberEntity>;
    fn delete_member(&mut self, id: &str, now: NaiveDateTime) -> LibraryResult<()>;

    // loans
    fn create_loan(&mut self, member_id: &str, book_id: &str, now: NaiveDateTime) -> LibraryResult<LoanEntity>;
    fn return_loan(&mut self, loan_id: &str, now: NaiveDateTime) -> LibraryResult<LoanEntity>;
    fn renew_loan(&mut self, loan_id: &str, now: NaiveDateTime) -> LibraryResult<LoanEntity>;
    fn pay_penalty(&mut self, loan_id: &str, now: NaiveDateTime) -> LibraryResult<LoanEntity>;
    fn get_loan(&self, id: &str) -> Option<LoanEntity>;
    fn list_loans(&self, filter: &LoanFilter, now: NaiveDateTime) -> Vec<LoanEntity>;

    // reservations
    fn create_reservation(&mut self, member_id: &str, book_id: &str, now: NaiveDateTime) -> LibraryResult<String>;
    fn cancel_reservation(&mut self, reservation_id: &str, now: NaiveDateTime) -> LibraryResult<ReservationEntity>;
    fn get_reservation(&self, id: &str) -> Option<ReservationEntity>;
    fn reservation_queue(&self, book_id: &str) -> Vec<ReservationEntity>;
    fn queue_position(&self, reservation_id: &str) -> Option<usize>;

    // sweeps, each returns the number of notifications produced
    fn send_due_reminders(&mut self, now: NaiveDateTime) -> LibraryResult<usize>;
    fn send_overdue_notifications(&mut self, now: NaiveDateTime) -> LibraryResult<usize>;

    // report data
    fn loan_statistics(&self, now: NaiveDateTime) -> LoanStatistics;
    fn inventory_statistics(&self) -> InventoryStatistics;

    fn drain_events(&mut self) -> Vec<DomainEvent>;
}
