use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::loans::domain::model::LoanEntity;
use crate::reservations::domain::model::ReservationEntity;
use crate::utils::date::serializer;

// DomainEventType defines the notifications circulation emits to members
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum DomainEventType {
    DueSoon,
    Overdue,
    ReservationReady,
}

// DomainEvent carries one notification for the notifier sink. `key` is the loan or
// reservation identity the event is about.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    pub event_id: String,
    pub name: String,
    pub group: String,
    pub key: String,
    pub kind: DomainEventType,
    pub member_id: String,
    pub book_id: String,
    pub json_data: String,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
}

impl DomainEvent {
    pub fn due_soon(loan: &LoanEntity, now: NaiveDateTime) -> serde_json::Result<Self> {
        let json = serde_json::to_string(loan)?;
        Ok(Self::build("loan_due_soon", "loans", loan.loan_id.as_str(), DomainEventType::DueSoon,
                       loan.member_id.as_str(), loan.book_id.as_str(), json, now))
    }

    pub fn overdue(loan: &LoanEntity, now: NaiveDateTime) -> serde_json::Result<Self> {
        let json = serde_json::to_string(loan)?;
        Ok(Self::build("loan_overdue", "loans", loan.loan_id.as_str(), DomainEventType::Overdue,
                       loan.member_id.as_str(), loan.book_id.as_str(), json, now))
    }

    pub fn reservation_ready(reservation: &ReservationEntity, now: NaiveDateTime) -> serde_json::Result<Self> {
        let json = serde_json::to_string(reservation)?;
        Ok(Self::build("reservation_ready", "reservations", reservation.reservation_id.as_str(),
                       DomainEventType::ReservationReady, reservation.member_id.as_str(),
                       reservation.book_id.as_str(), json, now))
    }

    #[allow(clippy::too_many_arguments)]
    fn build(name: &str, group: &str, key: &str, kind: DomainEventType, member_id: &str,
             book_id: &str, json: String, now: NaiveDateTime) -> DomainEvent {
        DomainEvent {
            event_id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            group: group.to_string(),
            key: key.to_string(),
            kind,
            member_id: member_id.to_string(),
            book_id: book_id.to_string(),
            json_data: json,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use crate::core::events::{DomainEvent, DomainEventType};
    use crate::loans::domain::model::LoanEntity;
    use crate::reservations::domain::model::ReservationEntity;

    #[tokio::test]
    async fn test_should_build_due_soon() {
        let now = Utc::now().naive_utc();
        let loan = LoanEntity::new("L00001", "M00001", "B00001", now, now + Duration::days(1));
        let event = DomainEvent::due_soon(&loan, now).expect("build event");
        assert_eq!("loan_due_soon", event.name.as_str());
        assert_eq!("L00001", event.key.as_str());
        assert_eq!("M00001", event.member_id.as_str());
        assert_eq!(DomainEventType::DueSoon, event.kind);
    }

    #[tokio::test]
    async fn test_should_build_overdue() {
        let now = Utc::now().naive_utc();
        let loan = LoanEntity::new("L00002", "M00001", "B00001", now, now);
        let event = DomainEvent::overdue(&loan, now).expect("build event");
        assert_eq!("L00002", event.key.as_str());
        assert_eq!(DomainEventType::Overdue, event.kind);
        assert!(event.json_data.contains("L00002"));
    }

    #[tokio::test]
    async fn test_should_build_reservation_ready() {
        let now = Utc::now().naive_utc();
        let reservation = ReservationEntity::new("R00001", "M00002", "B00003", now);
        let event = DomainEvent::reservation_ready(&reservation, now).expect("build event");
        assert_eq!("R00001", event.key.as_str());
        assert_eq!("M00002", event.member_id.as_str());
        assert_eq!("B00003", event.book_id.as_str());
        assert_eq!(DomainEventType::ReservationReady, event.kind);
    }
}
