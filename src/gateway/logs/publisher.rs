use async_trait::async_trait;
use tracing::info;
use crate::core::events::{DomainEvent, DomainEventType};
use crate::core::library::LibraryError;
use crate::gateway::events::EventPublisher;

// LogPublisher delivers notifications as structured tracing records.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogPublisher;

impl LogPublisher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventPublisher for LogPublisher {
    async fn publish(&self, event: &DomainEvent) -> Result<(), LibraryError> {
        match event.kind {
            DomainEventType::DueSoon => {
                info!(event_id = %event.event_id, member_id = %event.member_id, loan_id = %event.key,
                    book_id = %event.book_id, "loan due soon");
            }
            DomainEventType::Overdue => {
                info!(event_id = %event.event_id, member_id = %event.member_id, loan_id = %event.key,
                    book_id = %event.book_id, "loan overdue");
            }
            DomainEventType::ReservationReady => {
                info!(event_id = %event.event_id, member_id = %event.member_id, reservation_id = %event.key,
                    book_id = %event.book_id, "reservation ready");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use crate::core::events::DomainEvent;
    use crate::gateway::events::EventPublisher;
    use crate::gateway::logs::publisher::LogPublisher;
    use crate::reservations::domain::model::ReservationEntity;

    #[tokio::test]
    async fn test_should_publish() {
        let now = Utc::now().naive_utc();
        let reservation = ReservationEntity::new("R00001", "M00001", "B00001", now);
        let event = DomainEvent::reservation_ready(&reservation, now).expect("build event");
        let publisher = LogPublisher::new();
        let _ = publisher.publish(&event).await.expect("should publish");
    }
}
