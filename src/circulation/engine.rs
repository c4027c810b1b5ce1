use std::sync::Arc;
use chrono::NaiveDateTime;
use tokio::sync::RwLock;
use tracing::{info, warn};
use crate::books::domain::model::BookEntity;
use crate::catalog::domain::AddBookRequest;
use crate::circulation::domain::{CirculationService, LoanFilter};
use crate::circulation::domain::policy::calculate_penalty;
use crate::circulation::domain::stats::{InventoryStatistics, LoanStatistics};
use crate::circulation::factory::create_circulation_service;
use crate::core::domain::Configuration;
use crate::core::events::DomainEvent;
use crate::core::library::LibraryResult;
use crate::directory::domain::AddMemberRequest;
use crate::gateway::events::EventPublisher;
use crate::loans::domain::model::LoanEntity;
use crate::members::domain::model::MemberEntity;
use crate::reservations::domain::model::ReservationEntity;
use crate::utils::date::Clock;

/// Entry point of the library: owns all circulation state behind a single reader/writer lock.
///
/// Every mutating call runs as one unit of work under the write guard. Notifications raised
/// by that work are delivered to the publisher only after the guard is released, and a failed
/// delivery is logged without undoing the state change.
pub struct CirculationEngine {
    config: Configuration,
    clock: Arc<dyn Clock>,
    publisher: Box<dyn EventPublisher>,
    state: RwLock<Box<dyn CirculationService>>,
}

impl CirculationEngine {
    pub fn new(config: &Configuration, clock: Arc<dyn Clock>, publisher: Box<dyn EventPublisher>) -> Self {
        Self {
            config: config.clone(),
            clock,
            publisher,
            state: RwLock::new(create_circulation_service(config)),
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Drops every book, member, loan and reservation and starts over with empty tables.
    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        *state = create_circulation_service(&self.config);
        info!(branch = %self.config.branch_id, "circulation state reset");
    }

    async fn mutate<T, F>(&self, op: F) -> LibraryResult<T>
        where F: FnOnce(&mut dyn CirculationService, NaiveDateTime) -> LibraryResult<T> {
        let (res, events) = {
            let mut state = self.state.write().await;
            // read after the guard so queued writers never commit an older instant
            let now = self.clock.now();
            let res = op(&mut **state, now);
            (res, state.drain_events())
        };
        self.dispatch(events).await;
        res
    }

    async fn query<T, F>(&self, op: F) -> T
        where F: FnOnce(&dyn CirculationService, NaiveDateTime) -> T {
        let state = self.state.read().await;
        let now = self.clock.now();
        op(&**state, now)
    }

    async fn dispatch(&self, events: Vec<DomainEvent>) -> usize {
        let mut delivered = 0;
        for event in events {
            match self.publisher.publish(&event).await {
                Ok(_) => delivered += 1,
                Err(err) => {
                    warn!(branch = %self.config.branch_id, event = %event.name, key = %event.key,
                        member_id = %event.member_id, error = %err, "notification not delivered");
                }
            }
        }
        delivered
    }

    pub async fn add_book(&self, req: &AddBookRequest) -> LibraryResult<String> {
        self.mutate(|state, now| state.add_book(req, now)).await
    }

    pub async fn get_book(&self, id: &str) -> Option<BookEntity> {
        self.query(|state, _| state.get_book(id)).await
    }

    pub async fn get_book_by_isbn(&self, isbn: &str) -> Option<BookEntity> {
        self.query(|state, _| state.get_book_by_isbn(isbn)).await
    }

    pub async fn search_books(&self, text: &str) -> Vec<BookEntity> {
        self.query(|state, _| state.search_books(text)).await
    }

    pub async fn list_books(&self) -> Vec<BookEntity> {
        self.query(|state, _| state.list_books()).await
    }

    pub async fn update_book(&self, book: &BookEntity) -> LibraryResult<BookEntity> {
        self.mutate(|state, now| state.update_book(book, now)).await
    }

    pub async fn delete_book(&self, id: &str) -> LibraryResult<()> {
        self.mutate(|state, now| state.delete_book(id, now)).await
    }

    pub async fn add_member(&self, req: &AddMemberRequest) -> LibraryResult<String> {
        self.mutate(|state, now| state.add_member(req, now)).await
    }

    pub async fn get_member(&self, id: &str) -> Option<MemberEntity> {
        self.query(|state, _| state.get_member(id)).await
    }

    pub async fn get_member_by_email(&self, email: &str) -> Option<MemberEntity> {
        self.query(|state, _| state.get_member_by_email(email)).await
    }

    pub async fn list_members(&self) -> Vec<MemberEntity> {
        self.query(|state, _| state.list_members()).await
    }

    pub async fn update_member(&self, member: &MemberEntity) -> LibraryResult<MemberEntity> {
        self.mutate(|state, now| state.update_member(member, now)).await
    }

    pub async fn delete_member(&self, id: &str) -> LibraryResult<()> {
        self.mutate(|state, now| state.delete_member(id, now)).await
    }

    pub async fn create_loan(&self, member_id: &str, book_id: &str) -> LibraryResult<LoanEntity> {
        self.mutate(|state, now| state.create_loan(member_id, book_id, now)).await
    }

    pub async fn return_loan(&self, loan_id: &str) -> LibraryResult<LoanEntity> {
        self.mutate(|state, now| state.return_loan(loan_id, now)).await
    }

    pub async fn renew_loan(&self, loan_id: &str) -> LibraryResult<LoanEntity> {
        self.mutate(|state, now| state.renew_loan(loan_id, now)).await
    }

    pub async fn pay_penalty(&self, loan_id: &str) -> LibraryResult<LoanEntity> {
        self.mutate(|state, now| state.pay_penalty(loan_id, now)).await
    }

    pub async fn get_loan(&self, id: &str) -> Option<LoanEntity> {
        self.query(|state, _| state.get_loan(id)).await
    }

    pub async fn list_loans(&self, filter: &LoanFilter) -> Vec<LoanEntity> {
        self.query(|state, now| state.list_loans(filter, now)).await
    }

    pub async fn list_all_loans(&self) -> Vec<LoanEntity> {
        self.list_loans(&LoanFilter::All).await
    }

    pub async fn list_active_loans(&self) -> Vec<LoanEntity> {
        self.list_loans(&LoanFilter::Active).await
    }

    pub async fn list_overdue_loans(&self) -> Vec<LoanEntity> {
        self.list_loans(&LoanFilter::Overdue).await
    }

    pub async fn list_member_loans(&self, member_id: &str) -> Vec<LoanEntity> {
        self.list_loans(&LoanFilter::Member(member_id.to_string())).await
    }

    pub async fn create_reservation(&self, member_id: &str, book_id: &str) -> LibraryResult<String> {
        self.mutate(|state, now| state.create_reservation(member_id, book_id, now)).await
    }

    pub async fn cancel_reservation(&self, reservation_id: &str) -> LibraryResult<ReservationEntity> {
        self.mutate(|state, now| state.cancel_reservation(reservation_id, now)).await
    }

    pub async fn get_reservation(&self, id: &str) -> Option<ReservationEntity> {
        self.query(|state, _| state.get_reservation(id)).await
    }

    pub async fn reservation_queue(&self, book_id: &str) -> Vec<ReservationEntity> {
        self.query(|state, _| state.reservation_queue(book_id)).await
    }

    pub async fn queue_position(&self, reservation_id: &str) -> Option<usize> {
        self.query(|state, _| state.queue_position(reservation_id)).await
    }

    pub fn calculate_penalty(&self, member: &MemberEntity, days_late: i64) -> f64 {
        calculate_penalty(member.member_type, days_late)
    }

    pub async fn send_due_reminders(&self) -> LibraryResult<usize> {
        self.mutate(|state, now| state.send_due_reminders(now)).await
    }

    pub async fn send_overdue_notifications(&self) -> LibraryResult<usize> {
        self.mutate(|state, now| state.send_overdue_notifications(now)).await
    }

    pub async fn loan_statistics(&self) -> LoanStatistics {
        self.query(|state, now| state.loan_statistics(now)).await
    }

    pub async fn inventory_statistics(&self) -> InventoryStatistics {
        self.query(|state, _| state.inventory_statistics()).await
    }
}
