use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::core::library::ReservationStatus;
use crate::utils::date::serializer;

// ReservationEntity abstracts a member's hold on a book. The queue order lives in the repository.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ReservationEntity {
    pub reservation_id: String,
    pub version: i64,
    pub member_id: String,
    pub book_id: String,
    pub status: ReservationStatus,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl ReservationEntity {
    pub fn new(reservation_id: &str, member_id: &str, book_id: &str, now: NaiveDateTime) -> Self {
        Self {
            reservation_id: reservation_id.to_string(),
            version: 0,
            member_id: member_id.to_string(),
            book_id: book_id.to_string(),
            status: ReservationStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == ReservationStatus::Pending
    }
}

impl Identifiable for ReservationEntity {
    fn id(&self) -> String {
        self.reservation_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}


#[cfg(test)]
mod tests {
    use chrono::Utc;
    use crate::core::library::ReservationStatus;
    use crate::reservations::domain::model::ReservationEntity;

    #[tokio::test]
    async fn test_should_build_reservation() {
        let reservation = ReservationEntity::new("R00001", "M00001", "B00001", Utc::now().naive_utc());
        assert_eq!("R00001", reservation.reservation_id.as_str());
        assert_eq!(ReservationStatus::Pending, reservation.status);
        assert!(reservation.is_pending());
    }
}
