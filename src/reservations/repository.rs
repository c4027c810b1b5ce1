pub mod memory_reservation_repository;

use crate::core::repository::Repository;
use crate::reservations::domain::model::ReservationEntity;

// ReservationRepository keeps one FIFO queue of PENDING reservations per book. A reservation
// leaves its queue as soon as it is stored with any other status.
pub trait ReservationRepository: Repository<ReservationEntity> {
    fn find_pending(&self, member_id: &str, book_id: &str) -> Option<ReservationEntity>;

    // PENDING reservations of a book, oldest first
    fn queue(&self, book_id: &str) -> Vec<ReservationEntity>;

    fn head(&self, book_id: &str) -> Option<ReservationEntity>;

    // 1-based place in the queue, None unless PENDING
    fn position(&self, reservation_id: &str) -> Option<usize>;

    fn count_pending(&self) -> usize;
}
