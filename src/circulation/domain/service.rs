use std::mem;
use chrono::{Duration, NaiveDateTime};
use tracing::{debug, info};
use crate::books::domain::model::BookEntity;
use crate::catalog::domain::{AddBookRequest, CatalogService};
use crate::circulation::domain::{CirculationService, LoanFilter};
use crate::circulation::domain::policy::{calculate_penalty, policy_for};
use crate::circulation::domain::stats::{InventoryStatistics, LoanStatistics};
use crate::core::domain::Configuration;
use crate::core::events::DomainEvent;
use crate::core::library::{LibraryError, LibraryResult, LoanStatus, ReservationStatus, RuleViolation};
use crate::directory::domain::{AddMemberRequest, DirectoryService};
use crate::loans::domain::model::LoanEntity;
use crate::loans::repository::LoanRepository;
use crate::members::domain::model::MemberEntity;
use crate::reservations::domain::model::ReservationEntity;
use crate::reservations::repository::ReservationRepository;
use crate::utils::date::is_within_days;

pub(crate) struct CirculationServiceImpl {
    config: Configuration,
    catalog_service: Box<dyn CatalogService>,
    directory_service: Box<dyn DirectoryService>,
    loan_repository: Box<dyn LoanRepository>,
    reservation_repository: Box<dyn ReservationRepository>,
    outbox: Vec<DomainEvent>,
}

impl CirculationServiceImpl {
    pub(crate) fn new(config: &Configuration, catalog_service: Box<dyn CatalogService>,
                      directory_service: Box<dyn DirectoryService>, loan_repository: Box<dyn LoanRepository>,
                      reservation_repository: Box<dyn ReservationRepository>) -> Self {
        Self {
            config: config.clone(),
            catalog_service,
            directory_service,
            loan_repository,
            reservation_repository,
            outbox: vec![],
        }
    }

    fn member(&self, id: &str) -> LibraryResult<MemberEntity> {
        self.directory_service.find_member_by_id(id).ok_or_else(|| LibraryError::rule(
            RuleViolation::MemberNotFound, format!("member {} not found", id).as_str()))
    }

    fn book(&self, id: &str) -> LibraryResult<BookEntity> {
        self.catalog_service.find_book_by_id(id).ok_or_else(|| LibraryError::rule(
            RuleViolation::BookNotFound, format!("book {} not found", id).as_str()))
    }

    fn loan(&self, id: &str) -> LibraryResult<LoanEntity> {
        self.loan_repository.get(id).ok_or_else(|| LibraryError::rule(
            RuleViolation::LoanNotFound, format!("loan {} not found", id).as_str()))
    }

    fn open_loan(&self, id: &str) -> LibraryResult<LoanEntity> {
        let loan = self.loan(id)?;
        if !loan.is_open() {
            return Err(LibraryError::rule(RuleViolation::AlreadyReturned,
                                          format!("loan {} was returned", id).as_str()));
        }
        Ok(loan)
    }

    fn unpaid_penalties(&self, member_id: &str) -> f64 {
        self.loan_repository.find_by_member(member_id).iter().map(|l| l.unpaid_penalty()).sum()
    }

    fn cancel_pending(&mut self, pending: Vec<ReservationEntity>, now: NaiveDateTime) -> LibraryResult<usize> {
        let count = pending.len();
        for mut reservation in pending {
            reservation.status = ReservationStatus::Cancelled;
            reservation.updated_at = now;
            self.reservation_repository.update(&reservation)?;
        }
        Ok(count)
    }
}

impl CirculationService for CirculationServiceImpl {
    fn add_book(&mut self, req: &AddBookRequest, now: NaiveDateTime) -> LibraryResult<String> {
        self.catalog_service.add_book(req, now)
    }

    fn get_book(&self, id: &str) -> Option<BookEntity> {
        self.catalog_service.find_book_by_id(id)
    }

    fn get_book_by_isbn(&self, isbn: &str) -> Option<BookEntity> {
        self.catalog_service.find_book_by_isbn(isbn)
    }

    fn search_books(&self, text: &str) -> Vec<BookEntity> {
        self.catalog_service.search_books(text)
    }

    fn list_books(&self) -> Vec<BookEntity> {
        self.catalog_service.list_books()
    }

    fn update_book(&mut self, book: &BookEntity, now: NaiveDateTime) -> LibraryResult<BookEntity> {
        let _ = self.book(book.book_id.as_str())?;
        let open = self.loan_repository.find_open_by_book(book.book_id.as_str()).len() as u32;
        if book.total_copies < open {
            return Err(LibraryError::validation(
                format!("book {} has {} copies on loan, total cannot drop to {}",
                        book.book_id, open, book.total_copies).as_str(), Some("INVALID_COPIES".to_string())));
        }
        let mut updated = book.clone();
        updated.available_copies = book.total_copies - open;
        updated.updated_at = now;
        self.catalog_service.update_book(&updated)
    }

    fn delete_book(&mut self, id: &str, now: NaiveDateTime) -> LibraryResult<()> {
        let _ = self.book(id)?;
        let open = self.loan_repository.find_open_by_book(id);
        if !open.is_empty() {
            return Err(LibraryError::rule(RuleViolation::ActiveLoansExist,
                                          format!("book {} has {} loans outstanding", id, open.len()).as_str()));
        }
        let pending = self.reservation_repository.queue(id);
        let cancelled = self.cancel_pending(pending, now)?;
        self.catalog_service.remove_book(id)?;
        info!(branch = %self.config.branch_id, book_id = %id, cancelled, "book deleted");
        Ok(())
    }

    fn add_member(&mut self, req: &AddMemberRequest, now: NaiveDateTime) -> LibraryResult<String> {
        self.directory_service.add_member(req, now)
    }

    fn get_member(&self, id: &str) -> Option<MemberEntity> {
        self.directory_service.find_member_by_id(id)
    }

    fn get_member_by_email(&self, email: &str) -> Option<MemberEntity> {
        self.directory_service.find_member_by_email(email)
    }

    fn list_members(&self) -> Vec<MemberEntity> {
        self.directory_service.list_members()
    }

    fn update_member(&mut self, member: &MemberEntity, now: NaiveDateTime) -> LibraryResult<MemberEntity> {
        let existing = self.member(member.member_id.as_str())?;
        let mut updated = member.clone();
        updated.current_loans = existing.current_loans;
        updated.late_returns = existing.late_returns;
        updated.updated_at = now;
        self.directory_service.update_member(&updated)
    }

    fn delete_member(&mut self, id: &str, now: NaiveDateTime) -> LibraryResult<()> {
        let _ = self.member(id)?;
        let open = self.loan_repository.find_by_member(id).iter().filter(|l| l.is_open()).count();
        if open > 0 {
            return Err(LibraryError::rule(RuleViolation::ActiveLoansExist,
                                          format!("member {} has {} loans outstanding", id, open).as_str()));
        }
        let pending: Vec<ReservationEntity> = self.reservation_repository.list().into_iter()
            .filter(|r| r.member_id == id && r.is_pending())
            .collect();
        let cancelled = self.cancel_pending(pending, now)?;
        self.directory_service.remove_member(id)?;
        info!(branch = %self.config.branch_id, member_id = %id, cancelled, "member deleted");
        Ok(())
    }

    fn create_loan(&mut self, member_id: &str, book_id: &str, now: NaiveDateTime) -> LibraryResult<LoanEntity> {
        let mut member = self.member(member_id)?;
        let mut book = self.book(book_id)?;
        if !member.active {
            return Err(LibraryError::rule(RuleViolation::MemberInactive,
                                          format!("member {} is not active", member_id).as_str()));
        }
        if member.is_expired(now) {
            return Err(LibraryError::rule(RuleViolation::MembershipExpired,
                                          format!("membership of {} expired on {}", member_id,
                                                  member.membership_expires_at).as_str()));
        }
        let unpaid = self.unpaid_penalties(member_id);
        if unpaid > self.config.max_unpaid_penalties {
            return Err(LibraryError::rule(RuleViolation::PenaltiesTooHigh,
                                          format!("member {} owes {:.2} in penalties", member_id, unpaid).as_str()));
        }
        if member.late_returns > self.config.max_late_returns {
            return Err(LibraryError::rule(RuleViolation::TooManyLateReturns,
                                          format!("member {} returned {} loans late", member_id,
                                                  member.late_returns).as_str()));
        }
        if !book.active {
            return Err(LibraryError::rule(RuleViolation::BookUnavailable,
                                          format!("book {} is withdrawn", book_id).as_str()));
        }
        if self.loan_repository.find_open(member_id, book_id).is_some() {
            return Err(LibraryError::rule(RuleViolation::AlreadyBorrowed,
                                          format!("member {} already holds book {}", member_id, book_id).as_str()));
        }
        let own_reservation = match self.reservation_repository.head(book_id) {
            Some(head) if head.member_id != member_id => {
                return Err(LibraryError::rule(RuleViolation::ReservedByOther,
                                              format!("book {} is reserved by {}", book_id, head.member_id).as_str()));
            }
            head => head,
        };
        if book.available_copies == 0 {
            return Err(LibraryError::rule(RuleViolation::NoCopiesAvailable,
                                          format!("no copy of book {} is available", book_id).as_str()));
        }
        let quota = policy_for(member.member_type).quota;
        if member.current_loans >= quota {
            return Err(LibraryError::rule(RuleViolation::QuotaExceeded,
                                          format!("member {} reached the {} quota of {} loans", member_id,
                                                  member.member_type, quota).as_str()));
        }

        book.take_copy();
        book.updated_at = now;
        self.catalog_service.update_book(&book)?;
        member.current_loans += 1;
        member.updated_at = now;
        self.directory_service.update_member(&member)?;
        let loan_id = self.loan_repository.next_id();
        let loan = LoanEntity::new(loan_id.as_str(), member_id, book_id, now, now + Duration::days(self.config.loan_days));
        self.loan_repository.create(&loan)?;
        if let Some(mut reservation) = own_reservation {
            reservation.status = ReservationStatus::Fulfilled;
            reservation.updated_at = now;
            self.reservation_repository.update(&reservation)?;
            info!(branch = %self.config.branch_id, reservation_id = %reservation.reservation_id,
                member_id = %member_id, book_id = %book_id, "reservation fulfilled");
        }
        info!(branch = %self.config.branch_id, loan_id = %loan_id, member_id = %member_id, book_id = %book_id,
            due_date = %loan.due_date, "loan created");
        Ok(loan)
    }

    fn return_loan(&mut self, loan_id: &str, now: NaiveDateTime) -> LibraryResult<LoanEntity> {
        let mut loan = self.open_loan(loan_id)?;
        let mut member = self.member(loan.member_id.as_str())?;
        let mut book = self.book(loan.book_id.as_str())?;

        let late = loan.is_past_due(now);
        let penalty = if late {
            calculate_penalty(member.member_type, loan.days_overdue(now))
        } else {
            0.0
        };
        loan.assess_penalty(penalty);
        loan.status = LoanStatus::Returned;
        loan.return_date = Some(now);
        loan.updated_at = now;
        self.loan_repository.update(&loan)?;

        book.restore_copy();
        book.updated_at = now;
        self.catalog_service.update_book(&book)?;
        member.current_loans = member.current_loans.saturating_sub(1);
        if late {
            member.late_returns += 1;
        }
        member.updated_at = now;
        self.directory_service.update_member(&member)?;

        if let Some(head) = self.reservation_repository.head(loan.book_id.as_str()) {
            self.outbox.push(DomainEvent::reservation_ready(&head, now)?);
            debug!(branch = %self.config.branch_id, reservation_id = %head.reservation_id,
                member_id = %head.member_id, "reservation holder notified");
        }
        info!(branch = %self.config.branch_id, loan_id = %loan_id, member_id = %loan.member_id,
            book_id = %loan.book_id, late, penalty, "loan returned");
        self.loan(loan_id)
    }

    fn renew_loan(&mut self, loan_id: &str, now: NaiveDateTime) -> LibraryResult<LoanEntity> {
        let mut loan = self.open_loan(loan_id)?;
        if loan.renewal_count >= self.config.max_renewals {
            return Err(LibraryError::rule(RuleViolation::MaxRenewalsReached,
                                          format!("loan {} was renewed {} times", loan_id,
                                                  loan.renewal_count).as_str()));
        }
        loan.due_date += Duration::days(self.config.renewal_days);
        loan.renewal_count += 1;
        if loan.status == LoanStatus::Overdue && !loan.is_past_due(now) {
            loan.status = LoanStatus::Active;
            loan.assess_penalty(0.0);
        }
        loan.updated_at = now;
        self.loan_repository.update(&loan)?;
        info!(branch = %self.config.branch_id, loan_id = %loan_id, renewal_count = loan.renewal_count,
            due_date = %loan.due_date, "loan renewed");
        self.loan(loan_id)
    }

    fn pay_penalty(&mut self, loan_id: &str, now: NaiveDateTime) -> LibraryResult<LoanEntity> {
        let mut loan = self.loan(loan_id)?;
        let collected = loan.settle_penalty();
        loan.updated_at = now;
        self.loan_repository.update(&loan)?;
        info!(branch = %self.config.branch_id, loan_id = %loan_id, penalty = loan.penalty, collected, "penalty paid");
        self.loan(loan_id)
    }

    fn get_loan(&self, id: &str) -> Option<LoanEntity> {
        self.loan_repository.get(id)
    }

    fn list_loans(&self, filter: &LoanFilter, now: NaiveDateTime) -> Vec<LoanEntity> {
        match filter {
            LoanFilter::All => self.loan_repository.list(),
            LoanFilter::Active => self.loan_repository.find_by_status(LoanStatus::Active),
            LoanFilter::Overdue => self.loan_repository.list().into_iter()
                .filter(|l| l.status == LoanStatus::Overdue || (l.status == LoanStatus::Active && l.is_past_due(now)))
                .collect(),
            LoanFilter::Member(member_id) => self.loan_repository.find_by_member(member_id.as_str()),
        }
    }

    fn create_reservation(&mut self, member_id: &str, book_id: &str, now: NaiveDateTime) -> LibraryResult<String> {
        let _ = self.member(member_id)?;
        let _ = self.book(book_id)?;
        if let Some(existing) = self.reservation_repository.find_pending(member_id, book_id) {
            return Err(LibraryError::rule(RuleViolation::DuplicateReservation,
                                          format!("member {} already reserved book {} as {}", member_id, book_id,
                                                  existing.reservation_id).as_str()));
        }
        let reservation_id = self.reservation_repository.next_id();
        self.reservation_repository.create(&ReservationEntity::new(reservation_id.as_str(), member_id, book_id, now))?;
        info!(branch = %self.config.branch_id, reservation_id = %reservation_id, member_id = %member_id,
            book_id = %book_id, position = ?self.reservation_repository.position(reservation_id.as_str()),
            "reservation queued");
        Ok(reservation_id)
    }

    fn cancel_reservation(&mut self, reservation_id: &str, now: NaiveDateTime) -> LibraryResult<ReservationEntity> {
        let mut reservation = self.reservation_repository.get(reservation_id).ok_or_else(|| LibraryError::rule(
            RuleViolation::ReservationNotFound, format!("reservation {} not found", reservation_id).as_str()))?;
        if !reservation.is_pending() {
            return Err(LibraryError::rule(RuleViolation::ReservationClosed,
                                          format!("reservation {} is already {}", reservation_id,
                                                  reservation.status).as_str()));
        }
        reservation.status = ReservationStatus::Cancelled;
        reservation.updated_at = now;
        self.reservation_repository.update(&reservation)?;
        info!(branch = %self.config.branch_id, reservation_id = %reservation_id,
            book_id = %reservation.book_id, "reservation cancelled");
        self.reservation_repository.get(reservation_id).ok_or_else(|| LibraryError::rule(
            RuleViolation::ReservationNotFound, format!("reservation {} not found", reservation_id).as_str()))
    }

    fn get_reservation(&self, id: &str) -> Option<ReservationEntity> {
        self.reservation_repository.get(id)
    }

    fn reservation_queue(&self, book_id: &str) -> Vec<ReservationEntity> {
        self.reservation_repository.queue(book_id)
    }

    fn queue_position(&self, reservation_id: &str) -> Option<usize> {
        self.reservation_repository.position(reservation_id)
    }

    fn send_due_reminders(&mut self, now: NaiveDateTime) -> LibraryResult<usize> {
        let mut sent = 0;
        for loan in self.loan_repository.find_by_status(LoanStatus::Active) {
            if !loan.is_past_due(now) && is_within_days(Some(loan.due_date), self.config.due_soon_days, now) {
                self.outbox.push(DomainEvent::due_soon(&loan, now)?);
                sent += 1;
            }
        }
        info!(branch = %self.config.branch_id, sent, "due reminders swept");
        Ok(sent)
    }

    fn send_overdue_notifications(&mut self, now: NaiveDateTime) -> LibraryResult<usize> {
        let mut flagged = 0;
        for mut loan in self.loan_repository.find_by_status(LoanStatus::Active) {
            if !loan.is_past_due(now) {
                continue;
            }
            let member_type = self.directory_service.find_member_by_id(loan.member_id.as_str()).map(|m| m.member_type);
            loan.status = LoanStatus::Overdue;
            loan.assess_penalty(member_type.map(|t| calculate_penalty(t, loan.days_overdue(now))).unwrap_or(0.0));
            loan.updated_at = now;
            self.loan_repository.update(&loan)?;
            self.outbox.push(DomainEvent::overdue(&loan, now)?);
            flagged += 1;
        }
        info!(branch = %self.config.branch_id, flagged, "overdue loans swept");
        Ok(flagged)
    }

    fn loan_statistics(&self, now: NaiveDateTime) -> LoanStatistics {
        let mut stats = LoanStatistics::default();
        for loan in self.loan_repository.list() {
            stats.total_loans += 1;
            match loan.status {
                LoanStatus::Active => stats.active_loans += 1,
                LoanStatus::Overdue => stats.overdue_loans += 1,
                LoanStatus::Returned => stats.returned_loans += 1,
            }
            if loan.is_open() {
                if loan.is_past_due(now) {
                    stats.past_due_loans += 1;
                }
                if let Some(member) = self.directory_service.find_member_by_id(loan.member_id.as_str()) {
                    *stats.open_loans_by_member_type.entry(member.member_type).or_insert(0) += 1;
                }
            }
            stats.accrued_penalties += loan.penalty;
            stats.unpaid_penalties += loan.unpaid_penalty();
        }
        stats
    }

    fn inventory_statistics(&self) -> InventoryStatistics {
        let mut stats = InventoryStatistics::default();
        for book in self.catalog_service.list_books() {
            stats.titles += 1;
            if book.active {
                stats.active_titles += 1;
            }
            stats.total_copies += u64::from(book.total_copies);
            stats.available_copies += u64::from(book.available_copies);
            stats.borrowed_copies += u64::from(book.borrowed_copies());
            *stats.titles_by_category.entry(book.category).or_insert(0) += 1;
        }
        stats.pending_reservations = self.reservation_repository.count_pending();
        stats
    }

    fn drain_events(&mut self) -> Vec<DomainEvent> {
        mem::take(&mut self.outbox)
    }
}
