use std::collections::{BTreeMap, HashMap, VecDeque};
use crate::core::domain::Identifiable;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::{IdSequence, Repository};
use crate::reservations::domain::model::ReservationEntity;
use crate::reservations::repository::ReservationRepository;

#[derive(Debug)]
pub(crate) struct MemoryReservationRepository {
    reservations: BTreeMap<String, ReservationEntity>,
    queues: HashMap<String, VecDeque<String>>,
    ids: IdSequence,
}

impl MemoryReservationRepository {
    pub(crate) fn new() -> Self {
        Self {
            reservations: BTreeMap::new(),
            queues: HashMap::new(),
            ids: IdSequence::new('R'),
        }
    }

    fn dequeue(&mut self, book_id: &str, reservation_id: &str) {
        if let Some(queue) = self.queues.get_mut(book_id) {
            queue.retain(|id| id != reservation_id);
            if queue.is_empty() {
                self.queues.remove(book_id);
            }
        }
    }
}

impl Repository<ReservationEntity> for MemoryReservationRepository {
    fn next_id(&mut self) -> String {
        self.ids.next_id()
    }

    fn create(&mut self, entity: &ReservationEntity) -> LibraryResult<usize> {
        if self.reservations.contains_key(entity.reservation_id.as_str()) {
            return Err(LibraryError::conflict(
                format!("reservation {} already exists", entity.reservation_id).as_str()));
        }
        if entity.is_pending() {
            self.queues.entry(entity.book_id.to_string()).or_default()
                .push_back(entity.reservation_id.to_string());
        }
        self.reservations.insert(entity.id(), entity.clone());
        Ok(1)
    }

    fn update(&mut self, entity: &ReservationEntity) -> LibraryResult<usize> {
        let existing = self.reservations.get(entity.reservation_id.as_str()).ok_or_else(|| LibraryError::not_found(
            format!("reservation {} not found", entity.reservation_id).as_str()))?;
        if existing.book_id != entity.book_id {
            return Err(LibraryError::validation(
                format!("reservation {} cannot move to book {}", entity.reservation_id, entity.book_id).as_str(), None));
        }
        if !existing.is_pending() && entity.is_pending() {
            return Err(LibraryError::validation(
                format!("reservation {} is already {}", entity.reservation_id, existing.status).as_str(), None));
        }
        let leaves_queue = existing.is_pending() && !entity.is_pending();
        let mut updated = entity.clone();
        updated.version = existing.version + 1;
        if leaves_queue {
            self.dequeue(entity.book_id.as_str(), entity.reservation_id.as_str());
        }
        self.reservations.insert(updated.reservation_id.to_string(), updated);
        Ok(1)
    }

    fn get(&self, id: &str) -> Option<ReservationEntity> {
        self.reservations.get(id).cloned()
    }

    fn delete(&mut self, id: &str) -> LibraryResult<usize> {
        let removed = self.reservations.remove(id).ok_or_else(|| LibraryError::not_found(
            format!("reservation {} not found", id).as_str()))?;
        self.dequeue(removed.book_id.as_str(), id);
        Ok(1)
    }

    fn list(&self) -> Vec<ReservationEntity> {
        self.reservations.values().cloned().collect()
    }
}

impl ReservationRepository for MemoryReservationRepository {
    fn find_pending(&self, member_id: &str, book_id: &str) -> Option<ReservationEntity> {
        self.queue(book_id).into_iter().find(|r| r.member_id == member_id)
    }

    fn queue(&self, book_id: &str) -> Vec<ReservationEntity> {
        self.queues.get(book_id)
            .map(|queue| queue.iter().filter_map(|id| self.reservations.get(id)).cloned().collect())
            .unwrap_or_default()
    }

    fn head(&self, book_id: &str) -> Option<ReservationEntity> {
        self.queues.get(book_id)
            .and_then(|queue| queue.front())
            .and_then(|id| self.reservations.get(id))
            .cloned()
    }

    fn position(&self, reservation_id: &str) -> Option<usize> {
        let reservation = self.reservations.get(reservation_id)?;
        self.queues.get(reservation.book_id.as_str())
            .and_then(|queue| queue.iter().position(|id| id == reservation_id))
            .map(|ndx| ndx + 1)
    }

    fn count_pending(&self) -> usize {
        self.queues.values().map(|queue| queue.len()).sum()
    }
}
