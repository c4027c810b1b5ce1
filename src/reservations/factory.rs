use crate::reservations::repository::ReservationRepository;
use crate::reservations::repository::memory_reservation_repository::MemoryReservationRepository;

pub fn create_reservation_repository() -> Box<dyn ReservationRepository> {
    Box::new(MemoryReservationRepository::new())
}
